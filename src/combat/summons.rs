use std::collections::HashMap;

use schema::{EnemyDefinition, EnemyMove, MinionDefinition, MoveAction, MovePool};

/// Hard cap on concurrently alive summoned units; attempts beyond it no-op
/// per unit, leaving existing units untouched.
pub const MINION_CAP: usize = 3;

/// Turns an enemy's summon cooldown is armed for after a successful Spawn or
/// a Summon that created at least one unit. While above zero, Summon/Spawn
/// moves are filtered out of that enemy's eligible pool.
pub const SUMMON_COOLDOWN_TURNS: u32 = 5;

/// Process-scoped lookup of minion definitions, passed to the engine as an
/// explicit constructor dependency rather than ambient state, so independent
/// combats cannot cross-contaminate.
///
/// Enemy data and minion registration may be authored independently: a
/// summon naming an unregistered id must no-op with a log entry, never crash
/// a run.
#[derive(Debug, Clone, Default)]
pub struct MinionRegistry {
    minions: HashMap<String, MinionDefinition>,
}

impl MinionRegistry {
    pub fn new() -> Self {
        MinionRegistry {
            minions: HashMap::new(),
        }
    }

    /// Register a minion definition. Must happen before any combat whose
    /// enemies may summon it. Re-registering an id replaces the entry.
    pub fn register(&mut self, definition: MinionDefinition) {
        self.minions.insert(definition.id.clone(), definition);
    }

    pub fn get(&self, id: &str) -> Option<&MinionDefinition> {
        self.minions.get(id)
    }

    pub fn len(&self) -> usize {
        self.minions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.minions.is_empty()
    }
}

/// The enemy-definition shape of a minion: one flat Attack move, so a freshly
/// summoned unit drops straight into the normal intent machinery.
pub fn minion_enemy_definition(definition: &MinionDefinition) -> EnemyDefinition {
    EnemyDefinition {
        id: definition.id.clone(),
        name: definition.name.clone(),
        max_hp: definition.max_hp,
        pool: MovePool::Flat(vec![EnemyMove {
            id: format!("{}_attack", definition.id),
            name: "Attack".to_string(),
            action: MoveAction::Attack {
                damage: definition.attack_damage,
                lifesteal: None,
                self_damage: None,
            },
            hp_threshold: None,
            once_only: false,
            weight: 1,
        }]),
        is_elite: false,
        is_boss: false,
    }
}

/// The basic attack a Command-kind intent forces out of a minion, read back
/// off its definition's flat pool.
pub fn minion_basic_attack(definition: &EnemyDefinition) -> Option<MoveAction> {
    match &definition.pool {
        MovePool::Flat(moves) => moves
            .iter()
            .find(|m| matches!(m.action, MoveAction::Attack { .. }))
            .map(|m| m.action.clone()),
        MovePool::Phased { .. } => None,
    }
}
