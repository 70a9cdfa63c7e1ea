use schema::CounterKind;
use serde::{Deserialize, Serialize};

use crate::cards::CardInstance;
use crate::combat::pipeline::Combatant;
use crate::combat::statuses::StatusEffect;

/// Class-specific counters, each clamped at its kind's maximum on every gain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    devotion: u32,
    fortify: u32,
    luck: u32,
    radiance: u32,
    soul_debt: u32,
}

impl Counters {
    pub fn get(&self, kind: CounterKind) -> u32 {
        match kind {
            CounterKind::Devotion => self.devotion,
            CounterKind::Fortify => self.fortify,
            CounterKind::Luck => self.luck,
            CounterKind::Radiance => self.radiance,
            CounterKind::SoulDebt => self.soul_debt,
        }
    }

    /// Add to a counter, clamped at the kind's maximum. Returns the new value.
    pub fn gain(&mut self, kind: CounterKind, amount: u32) -> u32 {
        let value = (self.get(kind) + amount).min(kind.max());
        self.set(kind, value);
        value
    }

    /// Spend from a counter. Returns false (and changes nothing) if the
    /// counter cannot cover the amount.
    pub fn spend(&mut self, kind: CounterKind, amount: u32) -> bool {
        let current = self.get(kind);
        if current < amount {
            return false;
        }
        self.set(kind, current - amount);
        true
    }

    pub fn set(&mut self, kind: CounterKind, value: u32) {
        let value = value.min(kind.max());
        match kind {
            CounterKind::Devotion => self.devotion = value,
            CounterKind::Fortify => self.fortify = value,
            CounterKind::Luck => self.luck = value,
            CounterKind::Radiance => self.radiance = value,
            CounterKind::SoulDebt => self.soul_debt = value,
        }
    }
}

/// The player's runtime state. Created once per run; combat-only fields
/// (block, resolve, statuses, pile layout) are reset when a combat starts,
/// while hp, the deck, and soul debt persist across encounters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub hp: u32,
    pub max_hp: u32,
    /// Ablative; cleared at the block-retention point unless fortified.
    pub block: u32,
    pub resolve: u32,
    pub max_resolve: u32,
    pub draw_pile: Vec<CardInstance>,
    pub hand: Vec<CardInstance>,
    pub discard_pile: Vec<CardInstance>,
    pub exhaust_pile: Vec<CardInstance>,
    pub fracture_pile: Vec<CardInstance>,
    pub statuses: Vec<StatusEffect>,
    pub counters: Counters,
}

impl PlayerState {
    /// Create a player with a full deck in the draw pile.
    pub fn new(max_hp: u32, max_resolve: u32, deck: Vec<CardInstance>) -> Self {
        PlayerState {
            hp: max_hp,
            max_hp,
            block: 0,
            resolve: max_resolve,
            max_resolve,
            draw_pile: deck,
            hand: Vec::new(),
            discard_pile: Vec::new(),
            exhaust_pile: Vec::new(),
            fracture_pile: Vec::new(),
            statuses: Vec::new(),
            counters: Counters::default(),
        }
    }

    pub fn is_defeated(&self) -> bool {
        self.hp == 0
    }

    /// Pull every pile back into the draw pile and clear combat-only state.
    /// Used when a combat (re-)initializes.
    pub fn reset_for_combat(&mut self) {
        let mut deck = std::mem::take(&mut self.draw_pile);
        deck.append(&mut self.hand);
        deck.append(&mut self.discard_pile);
        deck.append(&mut self.exhaust_pile);
        self.draw_pile = deck;
        self.block = 0;
        self.resolve = self.max_resolve;
        self.statuses.clear();
    }
}

impl Combatant for PlayerState {
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
