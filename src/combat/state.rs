use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use schema::{CounterKind, StatusKind};
use serde::{Deserialize, Serialize};

use crate::combat::pipeline::DamageBreakdown;
use crate::enemies::{Enemy, EnemyIntent};
use crate::player::PlayerState;

/// Where the combat state machine currently sits. `Victory` and `Defeat` are
/// terminal; the engine checks for them after every hp-changing operation,
/// not only at turn boundaries.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Copy)]
pub enum GameState {
    NotStarted,
    Draw,
    PlayerAction,
    EndTurn,
    EnemyAction,
    Cleanup,
    Victory,
    Defeat,
}

impl GameState {
    pub fn is_terminal(self) -> bool {
        matches!(self, GameState::Victory | GameState::Defeat)
    }
}

/// Which combatant an event is about.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetRef {
    Player,
    Enemy { id: u32 },
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusRemovalReason {
    Expired,
    Cleansed,
    Consumed,
}

/// The closed event set: the sole contract the rendering layer depends on.
/// Every meaningful mutation emits one of these synchronously, in order, so a
/// UI or test harness can reconstruct exactly what happened without diffing
/// state.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum CombatEvent {
    // Flow
    CombatStarted {
        enemies: Vec<String>,
    },
    TurnStarted {
        turn: u32,
    },

    // Cards
    CardDrawn {
        card: u32,
        name: String,
    },
    CardPlayed {
        card: u32,
        name: String,
        cost: u32,
    },
    CardExhausted {
        card: u32,
        name: String,
    },
    DeckReshuffled {
        count: usize,
    },

    // Player
    PlayerDamaged {
        breakdown: DamageBreakdown,
        remaining_hp: u32,
    },
    PlayerHealed {
        amount: u32,
        new_hp: u32,
    },
    PlayerBlockChanged {
        block: u32,
    },
    ResolveChanged {
        resolve: u32,
    },
    CounterChanged {
        counter: CounterKind,
        value: u32,
    },

    // Statuses
    StatusApplied {
        target: TargetRef,
        status: StatusKind,
        magnitude: u32,
        duration: Option<u32>,
    },
    StatusRemoved {
        target: TargetRef,
        status: StatusKind,
        reason: StatusRemovalReason,
    },
    StatusDamage {
        target: TargetRef,
        status: StatusKind,
        damage: u32,
    },

    // Enemies
    EnemyDamaged {
        enemy: u32,
        breakdown: DamageBreakdown,
        remaining_hp: u32,
    },
    EnemyHealed {
        enemy: u32,
        amount: u32,
        new_hp: u32,
    },
    EnemyBlockChanged {
        enemy: u32,
        block: u32,
    },
    EnemyDied {
        enemy: u32,
        name: String,
    },
    EnemySummoned {
        enemy: u32,
        name: String,
        summoner: u32,
    },
    IntentSet {
        enemy: u32,
        intent: EnemyIntent,
    },
    PhaseChanged {
        enemy: u32,
        phase: usize,
    },

    // Narration & end
    CombatLog {
        line: String,
    },
    GameOver {
        victory: bool,
    },
}

impl CombatEvent {
    /// Formats the event into a human-readable string using combat context.
    /// Returns None for silent events that should not produce user-visible
    /// text; those still reach subscribers as structured data.
    pub fn format(&self, state: &CombatState) -> Option<String> {
        match self {
            CombatEvent::CombatStarted { enemies } => {
                Some(format!("Combat begins against {}.", enemies.join(", ")))
            }
            CombatEvent::TurnStarted { turn } => Some(format!("=== Turn {} ===", turn)),

            CombatEvent::CardDrawn { .. } => None,
            CombatEvent::CardPlayed { name, cost, .. } => {
                Some(format!("You play {} ({} resolve).", name, cost))
            }
            CombatEvent::CardExhausted { name, .. } => Some(format!("{} is exhausted.", name)),
            CombatEvent::DeckReshuffled { count } => Some(format!(
                "The discard pile ({} cards) is shuffled back into the draw pile.",
                count
            )),

            CombatEvent::PlayerDamaged {
                breakdown,
                remaining_hp,
            } => Some(format!(
                "You take {} damage ({} blocked), {} hp left.",
                breakdown.hp_damage, breakdown.blocked, remaining_hp
            )),
            CombatEvent::PlayerHealed { amount, new_hp } => {
                Some(format!("You recover {} hp ({} hp).", amount, new_hp))
            }
            CombatEvent::PlayerBlockChanged { block } => {
                Some(format!("Your block is now {}.", block))
            }
            CombatEvent::ResolveChanged { .. } => None,
            CombatEvent::CounterChanged { counter, value } => {
                Some(format!("{} is now {}.", counter, value))
            }

            CombatEvent::StatusApplied {
                target,
                status,
                magnitude,
                ..
            } => Some(format!(
                "{} gains {} {}.",
                state.describe_target(*target),
                status,
                magnitude
            )),
            CombatEvent::StatusRemoved { target, status, .. } => Some(format!(
                "{} is no longer affected by {}.",
                state.describe_target(*target),
                status
            )),
            CombatEvent::StatusDamage {
                target,
                status,
                damage,
            } => Some(format!(
                "{} takes {} damage from {}.",
                state.describe_target(*target),
                damage,
                status
            )),

            CombatEvent::EnemyDamaged {
                enemy,
                breakdown,
                remaining_hp,
            } => Some(format!(
                "{} takes {} damage ({} blocked), {} hp left.",
                state.enemy_label(*enemy),
                breakdown.hp_damage,
                breakdown.blocked,
                remaining_hp
            )),
            CombatEvent::EnemyHealed { enemy, amount, new_hp } => Some(format!(
                "{} recovers {} hp ({} hp).",
                state.enemy_label(*enemy),
                amount,
                new_hp
            )),
            CombatEvent::EnemyBlockChanged { .. } => None,
            CombatEvent::EnemyDied { name, .. } => Some(format!("{} is slain.", name)),
            CombatEvent::EnemySummoned { name, summoner, .. } => Some(format!(
                "{} calls {} into the fight.",
                state.enemy_label(*summoner),
                name
            )),
            CombatEvent::IntentSet { enemy, intent } => Some(format!(
                "{} intends: {} ({}).",
                state.enemy_label(*enemy),
                intent.name,
                intent.kind
            )),
            CombatEvent::PhaseChanged { enemy, phase } => Some(format!(
                "{} enters phase {}.",
                state.enemy_label(*enemy),
                phase + 1
            )),

            CombatEvent::CombatLog { line } => Some(line.clone()),
            CombatEvent::GameOver { victory } => Some(if *victory {
                "Victory! The field is yours.".to_string()
            } else {
                "You have fallen.".to_string()
            }),
        }
    }
}

type Listener = Box<dyn FnMut(&CombatEvent)>;

/// Collects every event of a combat and fans each one out, synchronously and
/// in emission order, to the registered listeners. Listeners therefore
/// observe state exactly as it existed at emission time.
pub struct EventBus {
    events: Vec<CombatEvent>,
    listeners: Vec<Listener>,
}

impl EventBus {
    pub fn new() -> Self {
        EventBus {
            events: Vec::new(),
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&CombatEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn push(&mut self, event: CombatEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
        self.events.push(event);
    }

    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        EventBus::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("events", &self.events.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// The engine's only source of non-determinism, isolated behind one seedable
/// generator: identical seed plus identical operation sequence reproduces the
/// event stream bit for bit.
#[derive(Debug, Clone)]
pub struct CombatRng {
    rng: StdRng,
    seed: u64,
}

impl CombatRng {
    pub fn seeded(seed: u64) -> Self {
        CombatRng {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// A fresh seed from the OS, for live play. The seed stays readable so a
    /// session can still be replayed afterwards.
    pub fn from_entropy() -> Self {
        let seed = rand::rng().random();
        CombatRng::seeded(seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// A roll in `0..total` for weighted selection by cumulative subtraction.
    pub fn pick_weight(&mut self, total: u32) -> u32 {
        self.rng.random_range(0..total)
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

/// The full mutable state of one combat. Snapshots of this are what
/// `CombatEngine::state()` exposes read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatState {
    pub game_state: GameState,
    pub turn_number: u32,
    pub player: PlayerState,
    /// Living enemies, in stable action order.
    pub enemies: Vec<Enemy>,
    /// Dead enemies, retained for resurrect moves and late event formatting.
    pub graveyard: Vec<Enemy>,
    pub(crate) next_instance_id: u32,
}

impl CombatState {
    pub fn new(player: PlayerState) -> Self {
        CombatState {
            game_state: GameState::NotStarted,
            turn_number: 0,
            player,
            enemies: Vec::new(),
            graveyard: Vec::new(),
            next_instance_id: 1,
        }
    }

    pub fn enemy(&self, id: u32) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn enemy_mut(&mut self, id: u32) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    pub fn living_enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.is_alive())
    }

    pub fn all_enemies_dead(&self) -> bool {
        self.living_enemies().next().is_none()
    }

    /// Concurrently-alive summoned units, the quantity the population cap
    /// limits.
    pub fn living_minion_count(&self) -> usize {
        self.living_enemies().filter(|e| e.is_minion).count()
    }

    /// Name for an enemy id, falling back to the graveyard so events about
    /// dead enemies still format.
    pub fn enemy_label(&self, id: u32) -> String {
        self.enemy(id)
            .or_else(|| self.graveyard.iter().find(|e| e.id == id))
            .map(|e| e.name.clone())
            .unwrap_or_else(|| format!("Enemy #{}", id))
    }

    fn describe_target(&self, target: TargetRef) -> String {
        match target {
            TargetRef::Player => "You".to_string(),
            TargetRef::Enemy { id } => self.enemy_label(id),
        }
    }
}
