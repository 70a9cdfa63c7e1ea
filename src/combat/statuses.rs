use schema::StatusKind;
use serde::{Deserialize, Serialize};

/// Venom magnitude never stacks past this.
pub const VENOM_CAP: u32 = 15;
/// Might magnitude never stacks past this (shared with the enemy might field).
pub const MIGHT_CAP: u32 = 99;

/// A live status on a combatant. Magnitude and duration are unsigned on
/// purpose: the invariant that neither goes negative is enforced by the type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: StatusKind,
    pub magnitude: u32,
    pub duration: Option<u32>,
}

impl StatusEffect {
    pub fn new(kind: StatusKind, magnitude: u32, duration: Option<u32>) -> Self {
        StatusEffect {
            kind,
            magnitude,
            duration,
        }
    }
}

/// Whether the list currently carries a status of the given kind.
pub fn has_status(statuses: &[StatusEffect], kind: StatusKind) -> bool {
    statuses.iter().any(|s| s.kind == kind)
}

/// Current magnitude of the given kind, zero if absent.
pub fn magnitude_of(statuses: &[StatusEffect], kind: StatusKind) -> u32 {
    statuses
        .iter()
        .find(|s| s.kind == kind)
        .map(|s| s.magnitude)
        .unwrap_or(0)
}

/// Apply a status with its kind's stacking rule and return the resulting
/// (magnitude, duration) pair for event payloads.
///
/// Stacking rules:
/// - Sundered/Weakened: turn-counted, magnitude pinned to 1; stacking adds
///   turns. The turn count comes from `duration`, falling back to `magnitude`
///   so authored data can express "2 turns" either way.
/// - Burning: stacking adds magnitude and refreshes duration to the longer.
/// - Regrowth: stacking adds magnitude and refreshes duration to the longer.
/// - Venom: stacking adds magnitude, capped at VENOM_CAP; never has duration.
/// - Might: stacking adds magnitude, capped at MIGHT_CAP; never expires.
pub fn apply_status(
    statuses: &mut Vec<StatusEffect>,
    kind: StatusKind,
    magnitude: u32,
    duration: Option<u32>,
) -> (u32, Option<u32>) {
    match kind {
        StatusKind::Sundered | StatusKind::Weakened => {
            let turns = duration.unwrap_or(magnitude).max(1);
            if let Some(existing) = statuses.iter_mut().find(|s| s.kind == kind) {
                let total = existing.duration.unwrap_or(0) + turns;
                existing.duration = Some(total);
                (existing.magnitude, existing.duration)
            } else {
                statuses.push(StatusEffect::new(kind, 1, Some(turns)));
                (1, Some(turns))
            }
        }
        StatusKind::Burning | StatusKind::Regrowth => {
            let turns = duration.unwrap_or(1).max(1);
            if let Some(existing) = statuses.iter_mut().find(|s| s.kind == kind) {
                existing.magnitude += magnitude;
                let refreshed = existing.duration.unwrap_or(0).max(turns);
                existing.duration = Some(refreshed);
                (existing.magnitude, existing.duration)
            } else {
                statuses.push(StatusEffect::new(kind, magnitude, Some(turns)));
                (magnitude, Some(turns))
            }
        }
        StatusKind::Venom => {
            if let Some(existing) = statuses.iter_mut().find(|s| s.kind == kind) {
                existing.magnitude = (existing.magnitude + magnitude).min(VENOM_CAP);
                (existing.magnitude, None)
            } else {
                statuses.push(StatusEffect::new(kind, magnitude.min(VENOM_CAP), None));
                (magnitude.min(VENOM_CAP), None)
            }
        }
        StatusKind::Might => {
            if let Some(existing) = statuses.iter_mut().find(|s| s.kind == kind) {
                existing.magnitude = (existing.magnitude + magnitude).min(MIGHT_CAP);
                (existing.magnitude, None)
            } else {
                statuses.push(StatusEffect::new(kind, magnitude.min(MIGHT_CAP), None));
                (magnitude.min(MIGHT_CAP), None)
            }
        }
    }
}

/// Remove a status outright, returning whether anything was removed.
/// Used for cleanse/consume paths; expiry goes through `tick_statuses`.
pub fn remove_status(statuses: &mut Vec<StatusEffect>, kind: StatusKind) -> bool {
    let before = statuses.len();
    statuses.retain(|s| s.kind != kind);
    statuses.len() != before
}

/// What a turn-end tick produced, for the engine to apply and announce.
/// Damage and healing are flat amounts against hp (status damage ignores
/// block); `expired` lists kinds whose duration or magnitude ran out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub damage: Vec<(StatusKind, u32)>,
    pub healing: Vec<(StatusKind, u32)>,
    pub expired: Vec<StatusKind>,
}

/// Run one owner's turn-end tick over its status list.
///
/// Tick effects are computed first, then expired statuses are pruned, in that
/// order: a Burning status on its last turn still burns before it falls off.
pub fn tick_statuses(statuses: &mut Vec<StatusEffect>) -> TickReport {
    let mut report = TickReport::default();

    for status in statuses.iter_mut() {
        match status.kind {
            StatusKind::Burning => {
                report.damage.push((StatusKind::Burning, status.magnitude));
                status.duration = status.duration.map(|d| d.saturating_sub(1));
            }
            StatusKind::Venom => {
                report.damage.push((StatusKind::Venom, status.magnitude));
                status.magnitude = status.magnitude.saturating_sub(1);
            }
            StatusKind::Regrowth => {
                report.healing.push((StatusKind::Regrowth, status.magnitude));
                status.duration = status.duration.map(|d| d.saturating_sub(1));
            }
            StatusKind::Sundered | StatusKind::Weakened => {
                status.duration = status.duration.map(|d| d.saturating_sub(1));
            }
            StatusKind::Might => {}
        }
    }

    statuses.retain(|status| {
        let expired = match status.kind {
            StatusKind::Venom => status.magnitude == 0,
            StatusKind::Might => false,
            _ => status.duration == Some(0),
        };
        if expired {
            report.expired.push(status.kind);
        }
        !expired
    });

    report
}
