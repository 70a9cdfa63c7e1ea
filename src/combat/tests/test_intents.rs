use pretty_assertions::assert_eq;
use schema::{IntentKind, MoveAction};

use crate::combat::intents::{select_intent, FALLBACK_ATTACK_ID};
use crate::combat::state::{CombatEvent, CombatRng, EventBus};
use crate::combat::tests::common::{attack_move, simple_move, TestEnemyBuilder};
use crate::enemies::Enemy;

fn gated_executioner() -> schema::EnemyDefinition {
    let mut execution = attack_move("execution", 25);
    execution.hp_threshold = Some(0.3);
    TestEnemyBuilder::new("executioner", 100)
        .with_moves(vec![execution])
        .build()
}

#[test]
fn hp_gated_move_is_hidden_above_its_threshold() {
    // Scenario: a move gated at 0.3 on a 100 max hp enemy.
    let definition = gated_executioner();
    let mut enemy = Enemy::from_definition(1, &definition);
    let mut rng = CombatRng::seeded(1);
    let mut bus = EventBus::new();

    select_intent(&mut enemy, &definition, &mut rng, &mut bus);

    let intent = enemy.intent.as_ref().expect("intent must always be set");
    assert_eq!(intent.move_id, FALLBACK_ATTACK_ID);
    assert_eq!(intent.kind, IntentKind::Attack);
}

#[test]
fn hp_gated_move_appears_once_hp_drops() {
    let definition = gated_executioner();
    let mut enemy = Enemy::from_definition(1, &definition);
    enemy.hp = 30;
    let mut rng = CombatRng::seeded(1);
    let mut bus = EventBus::new();

    select_intent(&mut enemy, &definition, &mut rng, &mut bus);

    assert_eq!(enemy.intent.as_ref().unwrap().move_id, "execution");
}

#[test]
fn used_once_only_moves_are_excluded() {
    let mut opener = attack_move("opener", 12);
    opener.once_only = true;
    let definition = TestEnemyBuilder::new("grunt", 40)
        .with_moves(vec![opener])
        .build();
    let mut enemy = Enemy::from_definition(1, &definition);
    enemy.used_abilities.insert("opener".to_string());
    let mut rng = CombatRng::seeded(1);
    let mut bus = EventBus::new();

    select_intent(&mut enemy, &definition, &mut rng, &mut bus);

    assert_eq!(enemy.intent.as_ref().unwrap().move_id, FALLBACK_ATTACK_ID);
}

#[test]
fn summoning_moves_are_blocked_while_on_cooldown() {
    let definition = TestEnemyBuilder::new("caller", 40)
        .with_moves(vec![simple_move(
            "call",
            MoveAction::Spawn {
                minion: "imp".to_string(),
            },
        )])
        .build();
    let mut enemy = Enemy::from_definition(1, &definition);
    enemy.summon_cooldown = 2;
    let mut rng = CombatRng::seeded(1);
    let mut bus = EventBus::new();

    select_intent(&mut enemy, &definition, &mut rng, &mut bus);
    assert_eq!(enemy.intent.as_ref().unwrap().move_id, FALLBACK_ATTACK_ID);

    enemy.summon_cooldown = 0;
    select_intent(&mut enemy, &definition, &mut rng, &mut bus);
    assert_eq!(enemy.intent.as_ref().unwrap().move_id, "call");
}

#[test]
fn weighted_selection_is_reproducible_across_seeded_generators() {
    let definition = TestEnemyBuilder::new("brute", 60)
        .with_moves(vec![
            attack_move("jab", 4),
            attack_move("hook", 7),
            attack_move("slam", 11),
        ])
        .build();

    for seed in [3, 17, 1234, 99999] {
        let mut first = Enemy::from_definition(1, &definition);
        let mut second = Enemy::from_definition(1, &definition);
        let mut rng_a = CombatRng::seeded(seed);
        let mut rng_b = CombatRng::seeded(seed);
        let mut bus_a = EventBus::new();
        let mut bus_b = EventBus::new();

        for _ in 0..10 {
            select_intent(&mut first, &definition, &mut rng_a, &mut bus_a);
            select_intent(&mut second, &definition, &mut rng_b, &mut bus_b);
            assert_eq!(first.intent, second.intent);
        }
    }
}

#[test]
fn zero_weight_moves_remain_selectable() {
    let mut only = attack_move("only", 5);
    only.weight = 0;
    let definition = TestEnemyBuilder::new("grunt", 20)
        .with_moves(vec![only])
        .build();
    let mut enemy = Enemy::from_definition(1, &definition);
    let mut rng = CombatRng::seeded(5);
    let mut bus = EventBus::new();

    select_intent(&mut enemy, &definition, &mut rng, &mut bus);

    assert_eq!(enemy.intent.as_ref().unwrap().move_id, "only");
}

#[test]
fn crossing_a_threshold_changes_phase_and_move_pool() {
    let definition = TestEnemyBuilder::new("warden", 100)
        .with_phases(
            vec![
                ("calm", vec![attack_move("slap", 5)]),
                ("furious", vec![attack_move("rend", 14)]),
            ],
            vec![0.5],
        )
        .build();
    let mut enemy = Enemy::from_definition(1, &definition);
    enemy.hp = 40;
    let mut rng = CombatRng::seeded(1);
    let mut bus = EventBus::new();

    select_intent(&mut enemy, &definition, &mut rng, &mut bus);

    assert_eq!(enemy.phase_index, 1);
    assert_eq!(enemy.intent.as_ref().unwrap().move_id, "rend");
    assert_eq!(enemy.intent.as_ref().unwrap().phase, 1);
    // The transition is announced before the new intent.
    assert!(matches!(
        bus.events()[0],
        CombatEvent::PhaseChanged { enemy: 1, phase: 1 }
    ));
    assert!(matches!(bus.events()[1], CombatEvent::IntentSet { .. }));
}

#[test]
fn phase_never_regresses_after_healing() {
    let definition = TestEnemyBuilder::new("warden", 100)
        .with_phases(
            vec![
                ("calm", vec![attack_move("slap", 5)]),
                ("furious", vec![attack_move("rend", 14)]),
            ],
            vec![0.5],
        )
        .build();
    let mut enemy = Enemy::from_definition(1, &definition);
    enemy.hp = 40;
    let mut rng = CombatRng::seeded(1);
    let mut bus = EventBus::new();

    select_intent(&mut enemy, &definition, &mut rng, &mut bus);
    assert_eq!(enemy.phase_index, 1);

    // Healed back above the threshold it already crossed.
    enemy.hp = 90;
    select_intent(&mut enemy, &definition, &mut rng, &mut bus);

    assert_eq!(enemy.phase_index, 1);
    assert_eq!(enemy.intent.as_ref().unwrap().move_id, "rend");
    let transitions = bus
        .events()
        .iter()
        .filter(|e| matches!(e, CombatEvent::PhaseChanged { .. }))
        .count();
    assert_eq!(transitions, 1, "the ratchet must fire exactly once");
}

#[test]
fn flat_pools_always_sit_in_phase_zero() {
    let definition = TestEnemyBuilder::new("grunt", 30).build();
    let mut enemy = Enemy::from_definition(1, &definition);
    enemy.hp = 1;
    let mut rng = CombatRng::seeded(1);
    let mut bus = EventBus::new();

    select_intent(&mut enemy, &definition, &mut rng, &mut bus);

    assert_eq!(enemy.phase_index, 0);
    assert_eq!(enemy.intent.as_ref().unwrap().phase, 0);
}
