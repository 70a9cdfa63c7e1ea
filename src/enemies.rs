use std::collections::HashSet;

use schema::{EnemyDefinition, IntentKind, MinionDefinition, MoveAction};
use serde::{Deserialize, Serialize};

use crate::combat::pipeline::Combatant;
use crate::combat::statuses::StatusEffect;

/// A concrete snapshot of the move an enemy will take on its next action.
/// Snapshotting (rather than re-reading the definition at execution time)
/// keeps the displayed intent and the executed move identical even if hp
/// moves around in between.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyIntent {
    /// Move id, kept for once-only tracking.
    pub move_id: String,
    pub name: String,
    pub kind: IntentKind,
    pub action: MoveAction,
    /// Phase the move was selected in.
    pub phase: usize,
}

/// A charge in progress: the armed move fires when the countdown hits zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeState {
    pub turns_remaining: u32,
    pub move_name: String,
    pub unleash: MoveAction,
}

/// Runtime state of one enemy-side combatant, created from an
/// `EnemyDefinition` at combat start or from a `MinionDefinition` when a
/// summon executes. Removed from the combat (into the graveyard) at zero hp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    /// Instance id, unique within one combat.
    pub id: u32,
    /// Key back into the definition table.
    pub definition_id: String,
    pub name: String,
    pub hp: u32,
    pub max_hp: u32,
    pub block: u32,
    pub intent: Option<EnemyIntent>,
    pub statuses: Vec<StatusEffect>,
    /// Accumulated might bonus, fed by Buff(Might) moves.
    pub might: u32,
    pub untargetable: bool,
    /// Monotonic within one combat; never regresses on heal.
    pub phase_index: usize,
    /// Ids of once-only moves already executed this combat.
    pub used_abilities: HashSet<String>,
    pub charge: Option<ChargeState>,
    /// While above zero, Summon/Spawn moves are ineligible for this enemy.
    pub summon_cooldown: u32,
    pub is_minion: bool,
    /// Instance id of the enemy that summoned this one.
    pub summoner: Option<u32>,
}

impl Enemy {
    pub fn from_definition(id: u32, definition: &EnemyDefinition) -> Self {
        Enemy {
            id,
            definition_id: definition.id.clone(),
            name: definition.name.clone(),
            hp: definition.max_hp,
            max_hp: definition.max_hp,
            block: 0,
            intent: None,
            statuses: Vec::new(),
            might: 0,
            untargetable: false,
            phase_index: 0,
            used_abilities: HashSet::new(),
            charge: None,
            summon_cooldown: 0,
            is_minion: false,
            summoner: None,
        }
    }

    pub fn from_minion(id: u32, definition: &MinionDefinition, summoner: u32) -> Self {
        Enemy {
            id,
            definition_id: definition.id.clone(),
            name: definition.name.clone(),
            hp: definition.max_hp,
            max_hp: definition.max_hp,
            block: 0,
            intent: None,
            statuses: Vec::new(),
            might: 0,
            untargetable: false,
            phase_index: 0,
            used_abilities: HashSet::new(),
            charge: None,
            summon_cooldown: 0,
            is_minion: true,
            summoner: Some(summoner),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn hp_fraction(&self) -> f32 {
        if self.max_hp == 0 {
            return 0.0;
        }
        self.hp as f32 / self.max_hp as f32
    }
}

impl Combatant for Enemy {
    fn hp(&self) -> u32 {
        self.hp
    }

    fn max_hp(&self) -> u32 {
        self.max_hp
    }

    fn set_hp(&mut self, hp: u32) {
        self.hp = hp.min(self.max_hp);
    }

    fn block(&self) -> u32 {
        self.block
    }

    fn set_block(&mut self, block: u32) {
        self.block = block;
    }

    fn statuses(&self) -> &[StatusEffect] {
        &self.statuses
    }
}
