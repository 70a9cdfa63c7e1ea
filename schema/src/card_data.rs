use serde::{Deserialize, Serialize};
use strum::Display;

use crate::status_types::{CounterKind, StatusKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum CardKind {
    Attack,
    Skill,
    Power,
    /// Unplayable filler; clogs the hand until fractured or exhausted.
    Curse,
}

/// A single step of a card's effect list, applied in order when the card is
/// played. Each variant carries exactly the fields its kind needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CardEffect {
    /// Deal damage to the chosen enemy through the damage pipeline.
    Strike { amount: u32 },
    /// Deal damage to every living, targetable enemy.
    StrikeAll { amount: u32 },
    /// Gain block.
    Guard { amount: u32 },
    /// Apply a status to the chosen enemy, or to all living enemies.
    Afflict {
        status: StatusKind,
        magnitude: u32,
        duration: Option<u32>,
        #[serde(default)]
        all: bool,
    },
    /// Apply a status to the player.
    Bolster {
        status: StatusKind,
        magnitude: u32,
        duration: Option<u32>,
    },
    /// Draw cards from the draw pile (reshuffling the discard pile if needed).
    Draw { count: u32 },
    /// Gain resolve this turn, on top of the per-turn refill.
    ChannelResolve { amount: u32 },
    /// Heal the player, clamped at max hp.
    Mend { amount: u32 },
    /// Strip a status from the player outright, ahead of its natural expiry.
    Cleanse { status: StatusKind },
    /// Gain a class counter, clamped at that counter's maximum.
    GainCounter { counter: CounterKind, amount: u32 },
    /// Pay hp (bypasses block) and accrue the same amount of soul debt.
    PayHp { amount: u32 },
}

impl CardEffect {
    /// Whether this effect needs a single enemy chosen at play time.
    pub fn needs_target(&self) -> bool {
        matches!(
            self,
            CardEffect::Strike { .. } | CardEffect::Afflict { all: false, .. }
        )
    }
}

/// Alternate effect list unlocked by spending devotion when the card is played.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevotionSurge {
    pub cost: u32,
    pub effects: Vec<CardEffect>,
}

/// Immutable card template. A played copy is tracked by the engine's
/// `CardInstance`, which pairs the template with a unique instance id for
/// pile bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub id: String,
    pub name: String,
    pub kind: CardKind,
    pub cost: u32,
    pub effects: Vec<CardEffect>,
    #[serde(default)]
    pub exhaust: bool,
    #[serde(default)]
    pub devotion_surge: Option<DevotionSurge>,
}

impl CardDefinition {
    /// Whether playing this card requires a single enemy target, considering
    /// the base effect list only (a surge variant never changes targeting).
    pub fn needs_target(&self) -> bool {
        self.effects.iter().any(CardEffect::needs_target)
    }
}
