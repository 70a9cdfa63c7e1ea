use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Closed set of status effects recognized by the combat engine.
///
/// Each kind has a fixed, documented interaction with the damage pipeline and
/// a fixed stacking rule (implemented in the engine's `combat::statuses`
/// module). The multipliers here are part of the data contract: authored
/// content relies on them staying put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum StatusKind {
    /// Incoming damage x1.5 (multiplicative, rounded down). Duration-bearing;
    /// stacking adds duration.
    Sundered,
    /// Outgoing damage x0.75 (multiplicative, rounded down). Duration-bearing;
    /// stacking adds duration.
    Weakened,
    /// Takes `magnitude` damage at the owner's turn-end. Stacking adds
    /// magnitude and refreshes duration.
    Burning,
    /// Takes `magnitude` damage at the owner's turn-end, then magnitude decays
    /// by one. No duration; expires when magnitude reaches zero. Stacking adds
    /// magnitude up to a cap.
    Venom,
    /// Heals `magnitude` at the owner's turn-end. Duration-bearing; stacking
    /// adds magnitude.
    Regrowth,
    /// Permanent +magnitude to outgoing attack damage. Stacking adds magnitude
    /// up to a cap.
    Might,
}

impl StatusKind {
    /// Whether the status carries a remaining-turns duration at all.
    /// Venom expires by magnitude decay and Might never expires.
    pub fn is_duration_bearing(self) -> bool {
        !matches!(self, StatusKind::Venom | StatusKind::Might)
    }
}

/// Class-specific player counters, each bounded by an explicit maximum the
/// engine enforces on every gain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum CounterKind {
    /// Spent to unlock a card's devotion-surge variant.
    Devotion,
    /// Block up to this amount is retained through the enemy turn.
    Fortify,
    /// Each point adds +1 to the next strike's base damage, then is consumed.
    Luck,
    /// At player turn-end, deals its value in damage to every living enemy,
    /// then halves (rounded down).
    Radiance,
    /// Accumulated hp paid for cards; settled by the run layer after combat.
    SoulDebt,
}

impl CounterKind {
    pub fn max(self) -> u32 {
        match self {
            CounterKind::Devotion => 10,
            CounterKind::Fortify => 30,
            CounterKind::Luck => 10,
            CounterKind::Radiance => 10,
            CounterKind::SoulDebt => 15,
        }
    }
}
