use schema::{EnemyDefinition, EnemyMove, MoveAction, MovePool};

use crate::combat::state::{CombatEvent, CombatRng, EventBus};
use crate::enemies::{Enemy, EnemyIntent};

/// Damage of the synthetic Attack an enemy falls back to when its eligible
/// move set is empty; guarantees every enemy always acts.
pub const FALLBACK_ATTACK_DAMAGE: u32 = 5;
pub const FALLBACK_ATTACK_ID: &str = "desperate_swipe";

/// The phase the definition's thresholds put this hp at, ignoring the
/// ratchet. Thresholds are descending-health fractions of max hp; the phase
/// index is the count of thresholds the current hp fraction sits at or below.
pub fn computed_phase(definition: &EnemyDefinition, hp: u32, max_hp: u32) -> usize {
    match &definition.pool {
        MovePool::Flat(_) => 0,
        MovePool::Phased { thresholds, .. } => {
            if max_hp == 0 {
                return thresholds.len();
            }
            let fraction = hp as f32 / max_hp as f32;
            thresholds.iter().filter(|t| fraction <= **t).count()
        }
    }
}

/// Ratchet the enemy's phase index forward if its hp has crossed a new
/// threshold, emitting the transition event on the first crossing. The index
/// never decreases within a combat, even if the enemy is healed back above a
/// threshold it crossed earlier.
pub fn refresh_phase(enemy: &mut Enemy, definition: &EnemyDefinition, bus: &mut EventBus) {
    let computed = computed_phase(definition, enemy.hp, enemy.max_hp);
    if computed > enemy.phase_index {
        enemy.phase_index = computed.min(definition.pool.phase_count().saturating_sub(1));
        bus.push(CombatEvent::PhaseChanged {
            enemy: enemy.id,
            phase: enemy.phase_index,
        });
    }
}

fn is_eligible(enemy: &Enemy, candidate: &EnemyMove) -> bool {
    if let Some(threshold) = candidate.hp_threshold {
        if enemy.hp_fraction() > threshold {
            return false;
        }
    }
    if candidate.once_only && enemy.used_abilities.contains(&candidate.id) {
        return false;
    }
    if candidate.action.is_summoning() && enemy.summon_cooldown > 0 {
        return false;
    }
    true
}

/// Deterministically select the enemy's next intent from its current phase's
/// move pool: filter ineligible moves, weighted-pick among the rest, snapshot
/// the choice, and announce it. Falls back to a synthetic Attack when nothing
/// is eligible.
pub fn select_intent(
    enemy: &mut Enemy,
    definition: &EnemyDefinition,
    rng: &mut CombatRng,
    bus: &mut EventBus,
) {
    refresh_phase(enemy, definition, bus);
    let phase = enemy.phase_index;

    let pool = definition.pool.moves_for_phase(phase);
    let eligible: Vec<&EnemyMove> = pool.iter().filter(|m| is_eligible(enemy, m)).collect();

    let intent = if eligible.is_empty() {
        EnemyIntent {
            move_id: FALLBACK_ATTACK_ID.to_string(),
            name: "Attack".to_string(),
            kind: schema::IntentKind::Attack,
            action: MoveAction::Attack {
                damage: FALLBACK_ATTACK_DAMAGE,
                lifesteal: None,
                self_damage: None,
            },
            phase,
        }
    } else {
        let chosen = weighted_pick(&eligible, rng);
        EnemyIntent {
            move_id: chosen.id.clone(),
            name: chosen.name.clone(),
            kind: chosen.action.kind(),
            action: chosen.action.clone(),
            phase,
        }
    };

    enemy.intent = Some(intent.clone());
    bus.push(CombatEvent::IntentSet {
        enemy: enemy.id,
        intent,
    });
}

/// Weighted selection over unnormalized weights by cumulative subtraction.
/// Zero-weight entries are treated as weight one so they stay selectable.
fn weighted_pick<'a>(eligible: &[&'a EnemyMove], rng: &mut CombatRng) -> &'a EnemyMove {
    let total: u32 = eligible.iter().map(|m| m.weight.max(1)).sum();
    let mut roll = rng.pick_weight(total);
    for candidate in eligible {
        let weight = candidate.weight.max(1);
        if roll < weight {
            return candidate;
        }
        roll -= weight;
    }
    eligible[eligible.len() - 1]
}
