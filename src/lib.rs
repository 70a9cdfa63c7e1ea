//! Grimhollow Combat Engine
//!
//! A deterministic, turn-based combat simulator for a deck-building dungeon
//! crawler: a player with a card deck against AI-controlled enemies, resolved
//! as a synchronous state machine that emits an auditable event stream for
//! any front end to render.

// --- MODULE DECLARATIONS ---
// This declares the module hierarchy for the crate.
pub mod cards;
pub mod catalog;
pub mod combat;
pub mod enemies;
pub mod errors;
pub mod player;

// --- PUBLIC API RE-EXPORTS ---
// This section defines the public-facing API of the `grimhollow` crate,
// making it easy for users to import the most important types directly.

// --- From the `schema` crate ---
// Re-export the static data model consumed at combat start and summon time.
pub use schema::{
    CardDefinition,
    CardEffect,
    CardKind,
    CounterKind,
    DevotionSurge,
    EnemyDefinition,
    EnemyMove,
    IntentKind,
    MinionDefinition,
    MoveAction,
    MovePhase,
    MovePool,
    StatusKind,
};

// --- From this crate's modules (`src/`) ---

// The engine and its public operation results.
pub use combat::engine::{CombatEngine, PlayResult, TurnReport, HAND_SIZE};
pub use combat::state::{
    CombatEvent, CombatRng, CombatState, EventBus, GameState, StatusRemovalReason, TargetRef,
};

// The leaf components, usable on their own for simulation or testing.
pub use combat::pipeline::{Combatant, DamageBreakdown, DamageModifier, SourceMods};
pub use combat::statuses::{StatusEffect, TickReport, MIGHT_CAP, VENOM_CAP};
pub use combat::summons::{MinionRegistry, MINION_CAP, SUMMON_COOLDOWN_TURNS};

// Core runtime types for a combat.
pub use cards::{build_deck, CardInstance};
pub use enemies::{ChargeState, Enemy, EnemyIntent};
pub use player::{Counters, PlayerState};

// Crate-specific error and result types (catalog surface only).
pub use errors::{CatalogError, CatalogResult};
