//! Scripted demo driver: one seeded combat against the Greater Demon, played
//! through the engine's public operations with the log printed as it goes.
//! All combat logic lives in the library; this binary only consumes it.

use std::cell::Cell;
use std::rc::Rc;

use grimhollow::{
    build_deck, catalog, CombatEngine, CombatRng, MinionRegistry, PlayerState,
};

fn main() {
    let seed = 7;
    let mut registry = MinionRegistry::new();
    for minion in catalog::minion_catalog() {
        registry.register(minion);
    }

    let deck = build_deck(&catalog::starter_deck());
    let player = PlayerState::new(70, 3, deck);
    let mut engine = CombatEngine::new(
        player,
        vec![catalog::greater_demon()],
        registry,
        CombatRng::seeded(seed),
    );

    // Count every event through the subscription channel, the same interface
    // a renderer would use.
    let event_count = Rc::new(Cell::new(0usize));
    let counter = event_count.clone();
    engine.subscribe(move |_event| counter.set(counter.get() + 1));

    engine.start_combat();
    println!("Seed {} -- fighting the Greater Demon.", seed);

    for _ in 0..30 {
        if engine.is_game_over() {
            break;
        }

        // Play every affordable card, always aiming at the first enemy.
        loop {
            let choice = engine
                .state()
                .player
                .hand
                .iter()
                .position(|card| card.cost() <= engine.state().player.resolve);
            let Some(index) = choice else { break };
            let result = engine.play_card(index, Some(0));
            for line in &result.log {
                println!("  {}", line);
            }
            if !result.success {
                break;
            }
            if engine.is_game_over() {
                break;
            }
        }
        if engine.is_game_over() {
            break;
        }

        let report = engine.end_turn();
        for line in &report.log {
            println!("  {}", line);
        }
    }

    let state = engine.state();
    println!(
        "Done after {} turns: {:?}, player at {}/{} hp, {} events emitted.",
        state.turn_number,
        state.game_state,
        state.player.hp,
        state.player.max_hp,
        event_count.get()
    );
}
