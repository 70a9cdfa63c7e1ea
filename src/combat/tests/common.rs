use schema::{
    CardDefinition, CardEffect, CardKind, EnemyDefinition, EnemyMove, MinionDefinition,
    MoveAction, MovePhase, MovePool,
};

use crate::cards::build_deck;
use crate::combat::engine::CombatEngine;
use crate::combat::state::CombatRng;
use crate::combat::summons::MinionRegistry;
use crate::player::PlayerState;

/// A builder for creating test enemy definitions with common defaults.
///
/// # Example
/// ```rust,ignore
/// let grunt = TestEnemyBuilder::new("grunt", 30)
///     .with_moves(vec![attack_move("swipe", 6)])
///     .build();
/// ```
pub struct TestEnemyBuilder {
    definition: EnemyDefinition,
}

impl TestEnemyBuilder {
    /// Creates a builder for an enemy with a single default attack move.
    pub fn new(id: &str, max_hp: u32) -> Self {
        Self {
            definition: EnemyDefinition {
                id: id.to_string(),
                name: title_case(id),
                max_hp,
                pool: MovePool::Flat(vec![attack_move("swipe", 6)]),
                is_elite: false,
                is_boss: false,
            },
        }
    }

    /// Replaces the flat move pool.
    pub fn with_moves(mut self, moves: Vec<EnemyMove>) -> Self {
        self.definition.pool = MovePool::Flat(moves);
        self
    }

    /// Replaces the pool with named phases and descending-health thresholds.
    pub fn with_phases(mut self, phases: Vec<(&str, Vec<EnemyMove>)>, thresholds: Vec<f32>) -> Self {
        self.definition.pool = MovePool::Phased {
            phases: phases
                .into_iter()
                .map(|(name, moves)| MovePhase {
                    name: name.to_string(),
                    moves,
                })
                .collect(),
            thresholds,
        };
        self
    }

    pub fn build(self) -> EnemyDefinition {
        self.definition
    }
}

fn title_case(id: &str) -> String {
    id.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// A plain attack move with weight 1 and no gates.
pub fn attack_move(id: &str, damage: u32) -> EnemyMove {
    simple_move(
        id,
        MoveAction::Attack {
            damage,
            lifesteal: None,
            self_damage: None,
        },
    )
}

/// Wrap any action as an ungated, weight-1 move.
pub fn simple_move(id: &str, action: MoveAction) -> EnemyMove {
    EnemyMove {
        id: id.to_string(),
        name: title_case(id),
        action,
        hp_threshold: None,
        once_only: false,
        weight: 1,
    }
}

/// A one-effect attack card costing 1 resolve.
pub fn strike_card(amount: u32) -> CardDefinition {
    CardDefinition {
        id: "test_strike".to_string(),
        name: "Test Strike".to_string(),
        kind: CardKind::Attack,
        cost: 1,
        effects: vec![CardEffect::Strike { amount }],
        exhaust: false,
        devotion_surge: None,
    }
}

/// A one-effect block card costing 1 resolve.
pub fn guard_card(amount: u32) -> CardDefinition {
    CardDefinition {
        id: "test_guard".to_string(),
        name: "Test Guard".to_string(),
        kind: CardKind::Skill,
        cost: 1,
        effects: vec![CardEffect::Guard { amount }],
        exhaust: false,
        devotion_surge: None,
    }
}

/// The standard test minion; matches the catalog imp.
pub fn imp() -> MinionDefinition {
    MinionDefinition {
        id: "imp".to_string(),
        name: "Imp".to_string(),
        max_hp: 15,
        attack_damage: 4,
    }
}

/// A 70 hp / 3 resolve player, the given deck, no registered minions, and a
/// fixed seed. Combat is not yet started.
pub fn make_engine(
    enemies: Vec<EnemyDefinition>,
    deck: Vec<CardDefinition>,
    seed: u64,
) -> CombatEngine {
    make_engine_with_minions(enemies, deck, Vec::new(), seed)
}

/// Like `make_engine`, with minion definitions pre-registered.
pub fn make_engine_with_minions(
    enemies: Vec<EnemyDefinition>,
    deck: Vec<CardDefinition>,
    minions: Vec<MinionDefinition>,
    seed: u64,
) -> CombatEngine {
    let mut registry = MinionRegistry::new();
    for minion in minions {
        registry.register(minion);
    }
    let player = PlayerState::new(70, 3, build_deck(&deck));
    CombatEngine::new(player, enemies, registry, CombatRng::seeded(seed))
}
