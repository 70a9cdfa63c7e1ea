//! The consume-heal and lifesteal rules, staged exactly as the design's
//! reference scenarios describe them.

use pretty_assertions::assert_eq;
use schema::MoveAction;

use crate::combat::state::CombatEvent;
use crate::combat::tests::common::{guard_card, imp, make_engine_with_minions, simple_move, TestEnemyBuilder};
use crate::enemies::Enemy;

fn consume_demon() -> schema::EnemyDefinition {
    TestEnemyBuilder::new("greater_demon", 120)
        .with_moves(vec![simple_move(
            "consume_minion",
            MoveAction::Heal {
                amount: 20,
                consumes: Some("imp".to_string()),
            },
        )])
        .build()
}

/// Demon at `hp`, with or without a living imp at its side.
fn demon_engine(hp: u32, with_imp: bool) -> crate::combat::engine::CombatEngine {
    let mut engine =
        make_engine_with_minions(vec![consume_demon()], vec![guard_card(5)], vec![imp()], 3);
    engine.start_combat();
    {
        let state = engine.state_mut();
        if with_imp {
            let minion = Enemy::from_minion(50, &imp(), 1);
            state.enemies.push(minion);
        }
        state.enemy_mut(1).unwrap().hp = hp;
    }
    engine
}

#[test]
fn consume_kills_the_minion_and_heals_the_demon() {
    // Demon at 80 with a living 15 hp imp: the imp dies, the demon reaches
    // exactly 100.
    let mut engine = demon_engine(80, true);

    engine.end_turn();

    assert_eq!(engine.state().enemy(1).unwrap().hp, 100);
    assert!(engine.state().enemy(50).is_none(), "the imp must be gone");
    assert!(engine
        .events()
        .iter()
        .any(|e| matches!(e, CombatEvent::EnemyDied { enemy: 50, .. })));
    assert!(engine
        .state()
        .graveyard
        .iter()
        .any(|e| e.id == 50));
}

#[test]
fn consume_heal_is_capped_at_max_hp() {
    // Demon at 110: the 20-point heal clamps at 120, and the event reports
    // the clamped 10, not the requested 20.
    let mut engine = demon_engine(110, true);

    engine.end_turn();

    assert_eq!(engine.state().enemy(1).unwrap().hp, 120);
    assert!(engine.events().iter().any(|e| matches!(
        e,
        CombatEvent::EnemyHealed {
            enemy: 1,
            amount: 10,
            new_hp: 120
        }
    )));
}

#[test]
fn consume_without_a_minion_does_nothing() {
    // Demon alone: no heal, no death event, no error.
    let mut engine = demon_engine(80, false);

    engine.end_turn();

    assert_eq!(engine.state().enemy(1).unwrap().hp, 80);
    assert!(engine
        .events()
        .iter()
        .all(|e| !matches!(e, CombatEvent::EnemyDied { .. })));
    assert!(engine
        .events()
        .iter()
        .all(|e| !matches!(e, CombatEvent::EnemyHealed { .. })));
    assert!(engine.events().iter().any(|e| matches!(
        e,
        CombatEvent::CombatLog { line } if line.contains("nothing to consume")
    )));
}

#[test]
fn lifesteal_heals_a_fixed_amount_independent_of_damage() {
    // Soul Harvest: 10 damage, 18 lifesteal. Player at 50, demon at 80:
    // player ends at 40, demon at 98.
    let soul_harvest = simple_move(
        "soul_harvest",
        MoveAction::Attack {
            damage: 10,
            lifesteal: Some(18),
            self_damage: None,
        },
    );
    let demon = TestEnemyBuilder::new("greater_demon", 120)
        .with_moves(vec![soul_harvest])
        .build();
    let mut engine = make_engine_with_minions(vec![demon], vec![guard_card(5)], vec![], 3);
    engine.start_combat();
    {
        let state = engine.state_mut();
        state.enemy_mut(1).unwrap().hp = 80;
        state.player.hp = 50;
    }

    engine.end_turn();

    assert_eq!(engine.state().player.hp, 40);
    assert_eq!(engine.state().enemy(1).unwrap().hp, 98);
    assert!(engine.events().iter().any(|e| matches!(
        e,
        CombatEvent::EnemyHealed {
            enemy: 1,
            amount: 18,
            ..
        }
    )));
}

#[test]
fn lifesteal_is_still_capped_at_max_hp() {
    let drain = simple_move(
        "drain",
        MoveAction::Attack {
            damage: 5,
            lifesteal: Some(18),
            self_damage: None,
        },
    );
    let demon = TestEnemyBuilder::new("greater_demon", 120)
        .with_moves(vec![drain])
        .build();
    let mut engine = make_engine_with_minions(vec![demon], vec![guard_card(5)], vec![], 3);
    engine.start_combat();
    engine.state_mut().enemy_mut(1).unwrap().hp = 115;

    engine.end_turn();

    assert_eq!(engine.state().enemy(1).unwrap().hp, 120);
}

#[test]
fn plain_heal_move_applies_to_the_actor() {
    let mend = simple_move(
        "knit_bone",
        MoveAction::Heal {
            amount: 12,
            consumes: None,
        },
    );
    let warden = TestEnemyBuilder::new("warden", 60)
        .with_moves(vec![mend])
        .build();
    let mut engine = make_engine_with_minions(vec![warden], vec![guard_card(5)], vec![], 3);
    engine.start_combat();
    engine.state_mut().enemy_mut(1).unwrap().hp = 30;

    engine.end_turn();

    assert_eq!(engine.state().enemy(1).unwrap().hp, 42);
}
