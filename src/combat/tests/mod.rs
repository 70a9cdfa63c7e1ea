pub mod common;



#[cfg(test)]
mod test_intents;


#[cfg(test)]
mod test_heal_consume;
