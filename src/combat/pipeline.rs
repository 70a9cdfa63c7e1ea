use schema::StatusKind;
use serde::{Deserialize, Serialize};

use crate::combat::state::{CombatEvent, EventBus, TargetRef};
use crate::combat::statuses::{has_status, StatusEffect};

/// Damage amplification while Sundered: x3/2, rounded down.
const SUNDERED_NUM: u32 = 3;
const SUNDERED_DEN: u32 = 2;
/// Damage reduction while Weakened: x3/4, rounded down.
const WEAKENED_NUM: u32 = 3;
const WEAKENED_DEN: u32 = 4;

/// Anything that can take damage, gain block, and be healed. The pipeline
/// only sees this seam, so player and enemies share one damage/heal path.
pub trait Combatant {
    fn hp(&self) -> u32;
    fn max_hp(&self) -> u32;
    fn set_hp(&mut self, hp: u32);
    fn block(&self) -> u32;
    fn set_block(&mut self, block: u32);
    fn statuses(&self) -> &[StatusEffect];
}

/// One modifier applied on the way to the final damage number, kept for
/// observability: every damage event carries the whole chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageModifier {
    pub description: String,
    pub before: u32,
    pub after: u32,
}

/// Full account of a single damage resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageBreakdown {
    pub base: u32,
    pub modifiers: Vec<DamageModifier>,
    pub final_amount: u32,
    pub blocked: u32,
    pub hp_damage: u32,
}

impl DamageBreakdown {
    fn flat(amount: u32) -> Self {
        DamageBreakdown {
            base: amount,
            modifiers: Vec::new(),
            final_amount: amount,
            blocked: 0,
            hp_damage: 0,
        }
    }
}

/// The attacker-side inputs to the pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceMods {
    /// Additive bonus applied before multiplicative modifiers.
    pub might: u32,
    pub weakened: bool,
}

impl SourceMods {
    /// Read might and weakened straight off a status list. Enemies add their
    /// accumulated might field on top of this.
    pub fn from_statuses(statuses: &[StatusEffect]) -> Self {
        SourceMods {
            might: crate::combat::statuses::magnitude_of(statuses, StatusKind::Might),
            weakened: has_status(statuses, StatusKind::Weakened),
        }
    }
}

/// Compute final damage from a base amount: additive might first, then the
/// attacker's Weakened penalty, then the target's Sundered amplification.
/// Damage can legally resolve to zero; this never fails.
pub fn compute_attack(
    base: u32,
    source: &SourceMods,
    target_statuses: &[StatusEffect],
) -> DamageBreakdown {
    let mut amount = base;
    let mut modifiers = Vec::new();

    if source.might > 0 {
        let after = amount + source.might;
        modifiers.push(DamageModifier {
            description: format!("might +{}", source.might),
            before: amount,
            after,
        });
        amount = after;
    }

    if source.weakened {
        let after = amount * WEAKENED_NUM / WEAKENED_DEN;
        modifiers.push(DamageModifier {
            description: "weakened x0.75".to_string(),
            before: amount,
            after,
        });
        amount = after;
    }

    if has_status(target_statuses, StatusKind::Sundered) {
        let after = amount * SUNDERED_NUM / SUNDERED_DEN;
        modifiers.push(DamageModifier {
            description: "sundered x1.5".to_string(),
            before: amount,
            after,
        });
        amount = after;
    }

    DamageBreakdown {
        base,
        modifiers,
        final_amount: amount,
        blocked: 0,
        hp_damage: 0,
    }
}

/// Spend the target's block, then its hp, filling in the breakdown's
/// blocked/hp_damage split and emitting the matching damage event.
pub fn resolve_attack(
    base: u32,
    source: &SourceMods,
    target: &mut dyn Combatant,
    target_ref: TargetRef,
    bus: &mut EventBus,
) -> DamageBreakdown {
    let mut breakdown = compute_attack(base, source, target.statuses());
    apply_breakdown(target, &mut breakdown);
    emit_damaged(target, target_ref, breakdown.clone(), bus);
    breakdown
}

fn apply_breakdown(target: &mut dyn Combatant, breakdown: &mut DamageBreakdown) {
    let blocked = breakdown.final_amount.min(target.block());
    let hp_damage = (breakdown.final_amount - blocked).min(target.hp());
    target.set_block(target.block() - blocked);
    target.set_hp(target.hp() - hp_damage);
    breakdown.blocked = blocked;
    breakdown.hp_damage = hp_damage;
}

/// Flat hp loss that ignores block: status ticks, hp costs, consume kills.
/// Returns the hp actually lost after clamping at zero.
pub fn lose_hp(target: &mut dyn Combatant, amount: u32) -> u32 {
    let lost = amount.min(target.hp());
    target.set_hp(target.hp() - lost);
    lost
}

/// Heal clamped at max hp: applied in place, returned for event logging and
/// lifesteal bookkeeping, never negative. Emits a heal event only when
/// something was actually restored.
pub fn resolve_heal(
    target: &mut dyn Combatant,
    amount: u32,
    target_ref: TargetRef,
    bus: &mut EventBus,
) -> u32 {
    let applied = amount.min(target.max_hp() - target.hp());
    if applied == 0 {
        return 0;
    }
    target.set_hp(target.hp() + applied);
    match target_ref {
        TargetRef::Player => bus.push(CombatEvent::PlayerHealed {
            amount: applied,
            new_hp: target.hp(),
        }),
        TargetRef::Enemy { id } => bus.push(CombatEvent::EnemyHealed {
            enemy: id,
            amount: applied,
            new_hp: target.hp(),
        }),
    }
    applied
}

/// Emit the right damage event for a flat, unmodified hit (status damage and
/// hp costs reuse the breakdown shape so renderers have one format).
pub fn flat_breakdown(amount: u32, blocked: u32, hp_damage: u32) -> DamageBreakdown {
    let mut breakdown = DamageBreakdown::flat(amount);
    breakdown.blocked = blocked;
    breakdown.hp_damage = hp_damage;
    breakdown
}

fn emit_damaged(
    target: &dyn Combatant,
    target_ref: TargetRef,
    breakdown: DamageBreakdown,
    bus: &mut EventBus,
) {
    match target_ref {
        TargetRef::Player => bus.push(CombatEvent::PlayerDamaged {
            breakdown,
            remaining_hp: target.hp(),
        }),
        TargetRef::Enemy { id } => bus.push(CombatEvent::EnemyDamaged {
            enemy: id,
            breakdown,
            remaining_hp: target.hp(),
        }),
    }
}
