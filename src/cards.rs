use schema::CardDefinition;
use serde::{Deserialize, Serialize};

/// A card copy in play. The template is immutable; the instance id is what
/// moves between piles, so two copies of the same card stay distinguishable
/// for pile tracking and event streams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardInstance {
    pub instance_id: u32,
    pub definition: CardDefinition,
}

impl CardInstance {
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn cost(&self) -> u32 {
        self.definition.cost
    }
}

/// Instantiate a deck from templates, assigning sequential instance ids.
/// Duplicated templates are fine; each copy gets its own id.
pub fn build_deck(definitions: &[CardDefinition]) -> Vec<CardInstance> {
    definitions
        .iter()
        .enumerate()
        .map(|(index, definition)| CardInstance {
            instance_id: index as u32 + 1,
            definition: definition.clone(),
        })
        .collect()
}
