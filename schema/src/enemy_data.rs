use serde::{Deserialize, Serialize};
use strum::Display;

use crate::status_types::StatusKind;

/// Intent kind shown to the player before the move executes. This is the tag
/// half of `MoveAction`; front ends key icons off it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum IntentKind {
    Attack,
    MultiAttack,
    Defend,
    Buff,
    BuffAlly,
    Debuff,
    Heal,
    Summon,
    Spawn,
    Charging,
    Command,
    Unknown,
}

/// What an enemy move actually does when it executes. Each variant carries
/// exactly the fields its kind needs, so illegal combinations (a Defend move
/// with a summon list, say) cannot be authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MoveAction {
    Attack {
        damage: u32,
        /// Fixed lifesteal: the source heals this amount regardless of damage
        /// actually dealt, clamped at max hp.
        #[serde(default)]
        lifesteal: Option<u32>,
        #[serde(default)]
        self_damage: Option<u32>,
    },
    MultiAttack {
        damage: u32,
        times: u32,
    },
    Defend {
        block: u32,
    },
    /// Buff self. `Might` feeds the enemy's accumulated might bonus; other
    /// kinds land in its status list.
    Buff {
        status: StatusKind,
        magnitude: u32,
        duration: Option<u32>,
    },
    /// Buff every other living ally.
    BuffAlly {
        status: StatusKind,
        magnitude: u32,
        duration: Option<u32>,
    },
    /// Debuff the player.
    Debuff {
        status: StatusKind,
        magnitude: u32,
        duration: Option<u32>,
    },
    Heal {
        amount: u32,
        /// Consume pattern: a living ally with this definition id is destroyed
        /// to fuel the heal. No matching ally means the move does nothing.
        #[serde(default)]
        consumes: Option<String>,
    },
    Summon {
        minions: Vec<String>,
        /// Restore this enemy's previously-dead roster minions to full hp
        /// instead of creating new instances.
        #[serde(default)]
        resurrect: bool,
    },
    Spawn {
        minion: String,
    },
    /// Wait `turns` enemy turns, then execute `unleash`.
    Charging {
        turns: u32,
        unleash: Box<MoveAction>,
    },
    /// Force all living allied minions to attack immediately, out of turn
    /// order.
    Command,
    /// Telegraphs nothing; executes nothing.
    Unknown,
}

impl MoveAction {
    pub fn kind(&self) -> IntentKind {
        match self {
            MoveAction::Attack { .. } => IntentKind::Attack,
            MoveAction::MultiAttack { .. } => IntentKind::MultiAttack,
            MoveAction::Defend { .. } => IntentKind::Defend,
            MoveAction::Buff { .. } => IntentKind::Buff,
            MoveAction::BuffAlly { .. } => IntentKind::BuffAlly,
            MoveAction::Debuff { .. } => IntentKind::Debuff,
            MoveAction::Heal { .. } => IntentKind::Heal,
            MoveAction::Summon { .. } => IntentKind::Summon,
            MoveAction::Spawn { .. } => IntentKind::Spawn,
            MoveAction::Charging { .. } => IntentKind::Charging,
            MoveAction::Command => IntentKind::Command,
            MoveAction::Unknown => IntentKind::Unknown,
        }
    }

    /// Summon and Spawn moves are gated by the summoner's cooldown counter.
    pub fn is_summoning(&self) -> bool {
        matches!(self, MoveAction::Summon { .. } | MoveAction::Spawn { .. })
    }
}

fn default_weight() -> u32 {
    1
}

/// One entry in an enemy's move pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyMove {
    pub id: String,
    pub name: String,
    pub action: MoveAction,
    /// Eligible only while current hp / max hp is at or below this fraction.
    #[serde(default)]
    pub hp_threshold: Option<f32>,
    /// Usable at most once per combat, tracked by move id.
    #[serde(default)]
    pub once_only: bool,
    /// Unnormalized probability mass for weighted selection.
    #[serde(default = "default_weight")]
    pub weight: u32,
}

/// A named behavior set activated once hp drops below its threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovePhase {
    pub name: String,
    pub moves: Vec<EnemyMove>,
}

/// An enemy either draws from one flat move list for the whole combat, or
/// walks an ordered phase list keyed by descending-health hp thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MovePool {
    Flat(Vec<EnemyMove>),
    Phased {
        phases: Vec<MovePhase>,
        /// Fractions of max hp in descending-health order; crossing the n-th
        /// threshold activates phase n+1. Must hold `phases.len() ==
        /// thresholds.len() + 1`.
        thresholds: Vec<f32>,
    },
}

impl MovePool {
    /// Number of phases this pool can ever be in.
    pub fn phase_count(&self) -> usize {
        match self {
            MovePool::Flat(_) => 1,
            MovePool::Phased { phases, .. } => phases.len(),
        }
    }

    /// The move list for a given phase index, clamped to the last phase.
    pub fn moves_for_phase(&self, phase: usize) -> &[EnemyMove] {
        match self {
            MovePool::Flat(moves) => moves,
            MovePool::Phased { phases, .. } => {
                let index = phase.min(phases.len().saturating_sub(1));
                &phases[index].moves
            }
        }
    }
}

/// Static enemy template, consumed at combat start and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyDefinition {
    pub id: String,
    pub name: String,
    pub max_hp: u32,
    pub pool: MovePool,
    /// Reward gates for external systems; no mechanical effect in combat.
    #[serde(default)]
    pub is_elite: bool,
    #[serde(default)]
    pub is_boss: bool,
}

/// Static minion template. Must be registered with the minion registry before
/// any combat whose enemies may summon it; unregistered ids make summon
/// attempts no-op.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinionDefinition {
    pub id: String,
    pub name: String,
    pub max_hp: u32,
    pub attack_damage: u32,
}
