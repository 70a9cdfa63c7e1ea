use std::collections::HashMap;

use schema::{CardEffect, CardKind, CounterKind, EnemyDefinition, MinionDefinition, MoveAction, StatusKind};

use crate::combat::intents::{refresh_phase, select_intent};
use crate::combat::pipeline::{
    flat_breakdown, lose_hp, resolve_attack, resolve_heal, SourceMods,
};
use crate::combat::state::{
    CombatEvent, CombatRng, CombatState, EventBus, GameState, StatusRemovalReason, TargetRef,
};
use crate::combat::statuses::{
    apply_status, has_status, magnitude_of, remove_status, tick_statuses, MIGHT_CAP,
};
use crate::combat::summons::{
    minion_basic_attack, minion_enemy_definition, MinionRegistry, MINION_CAP,
    SUMMON_COOLDOWN_TURNS,
};
use crate::enemies::{ChargeState, Enemy};
use crate::player::PlayerState;

/// Cards drawn for the opening hand and at the start of every turn.
pub const HAND_SIZE: usize = 5;

/// Outcome of a `play_card` call. User errors (bad index, unaffordable card,
/// no legal target) come back as `success: false` with a message and no state
/// mutation; they are never panics or `Err`s.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayResult {
    pub success: bool,
    pub message: Option<String>,
    pub log: Vec<String>,
}

impl PlayResult {
    fn failure(message: impl Into<String>) -> Self {
        PlayResult {
            success: false,
            message: Some(message.into()),
            log: Vec::new(),
        }
    }
}

/// Aggregated human-readable log of everything an `end_turn` call resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    pub log: Vec<String>,
}

/// The orchestrating state machine. Owns the player and enemy runtime state
/// and drives the damage pipeline, status model, intent resolver, and summon
/// registry each turn.
///
/// Everything nondeterministic or process-scoped comes in through the
/// constructor (definitions, minion registry, seeded rng), so independent
/// combats can run side by side without cross-contamination, and two engines
/// given the same seed and the same `play_card`/`end_turn` sequence produce
/// identical event streams and final state.
pub struct CombatEngine {
    state: CombatState,
    definitions: HashMap<String, EnemyDefinition>,
    /// Definition ids in encounter order, kept so `start_combat` can
    /// re-instantiate from scratch.
    roster: Vec<String>,
    registry: MinionRegistry,
    rng: CombatRng,
    bus: EventBus,
}

impl CombatEngine {
    pub fn new(
        player: PlayerState,
        enemies: Vec<EnemyDefinition>,
        registry: MinionRegistry,
        rng: CombatRng,
    ) -> Self {
        let roster: Vec<String> = enemies.iter().map(|d| d.id.clone()).collect();
        let definitions = enemies.into_iter().map(|d| (d.id.clone(), d)).collect();
        CombatEngine {
            state: CombatState::new(player),
            definitions,
            roster,
            registry,
            rng,
            bus: EventBus::new(),
        }
    }

    /// Register a listener invoked synchronously for every event, in emission
    /// order.
    pub fn subscribe(&mut self, listener: impl FnMut(&CombatEvent) + 'static) {
        self.bus.subscribe(listener);
    }

    /// Late minion registration; must happen before the combat that needs it.
    pub fn register_minion(&mut self, definition: MinionDefinition) {
        self.registry.register(definition);
    }

    /// Read-only snapshot of the full combat state.
    pub fn state(&self) -> &CombatState {
        &self.state
    }

    /// Every event emitted so far, in order.
    pub fn events(&self) -> &[CombatEvent] {
        self.bus.events()
    }

    pub fn is_game_over(&self) -> bool {
        self.state.game_state.is_terminal()
    }

    /// Mutable state access for tests that need to stage a precise position.
    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut CombatState {
        &mut self.state
    }

    /// Instantiate enemies from their definitions, compute initial intents,
    /// draw the opening hand, and hand control to the player. Calling this a
    /// second time re-initializes the combat from the same roster.
    pub fn start_combat(&mut self) {
        let Self {
            state,
            definitions,
            roster,
            rng,
            bus,
            ..
        } = self;

        state.game_state = GameState::Draw;
        state.turn_number = 1;
        state.enemies.clear();
        state.graveyard.clear();
        state.next_instance_id = 1;
        state.player.reset_for_combat();

        let mut names = Vec::new();
        for definition_id in roster.iter() {
            if let Some(definition) = definitions.get(definition_id) {
                let enemy = Enemy::from_definition(state.next_instance_id, definition);
                state.next_instance_id += 1;
                names.push(enemy.name.clone());
                state.enemies.push(enemy);
            }
        }
        bus.push(CombatEvent::CombatStarted { enemies: names });
        bus.push(CombatEvent::TurnStarted { turn: 1 });

        let ids: Vec<u32> = state.enemies.iter().map(|e| e.id).collect();
        for id in ids {
            set_enemy_intent(state, definitions, rng, bus, id);
        }

        rng.shuffle(&mut state.player.draw_pile);
        draw_cards(state, rng, bus, HAND_SIZE);
        state.player.resolve = state.player.max_resolve;
        bus.push(CombatEvent::ResolveChanged {
            resolve: state.player.resolve,
        });
        state.game_state = GameState::PlayerAction;
    }

    /// Play the card at `card_index` in the hand against the enemy at
    /// `target_index` (an index into the current living, targetable enemies;
    /// optional when the card needs no target or only one candidate exists).
    ///
    /// Validation happens before any mutation, so a failed play leaves the
    /// combat untouched.
    pub fn play_card(&mut self, card_index: usize, target_index: Option<usize>) -> PlayResult {
        let mark = self.bus.len();

        if self.state.game_state != GameState::PlayerAction {
            return PlayResult::failure("combat is not waiting for a card");
        }
        if card_index >= self.state.player.hand.len() {
            return PlayResult::failure("no card at that position");
        }
        let definition = self.state.player.hand[card_index].definition.clone();
        if definition.kind == CardKind::Curse {
            return PlayResult::failure(format!("{} cannot be played", definition.name));
        }
        if definition.cost > self.state.player.resolve {
            return PlayResult::failure(format!(
                "not enough resolve for {} (need {}, have {})",
                definition.name, definition.cost, self.state.player.resolve
            ));
        }
        let target_id = if definition.needs_target() {
            match resolve_target(&self.state, target_index) {
                Ok(id) => Some(id),
                Err(message) => return PlayResult::failure(message),
            }
        } else {
            None
        };

        let Self {
            state,
            definitions,
            rng,
            bus,
            ..
        } = self;

        state.player.resolve -= definition.cost;
        bus.push(CombatEvent::ResolveChanged {
            resolve: state.player.resolve,
        });

        let card = state.player.hand.remove(card_index);
        bus.push(CombatEvent::CardPlayed {
            card: card.instance_id,
            name: card.name().to_string(),
            cost: definition.cost,
        });

        // Devotion surge: spend the surge cost and swap in the surge effects
        // when the player can afford it.
        let effects = match &definition.devotion_surge {
            Some(surge) if state.player.counters.get(CounterKind::Devotion) >= surge.cost => {
                state.player.counters.spend(CounterKind::Devotion, surge.cost);
                bus.push(CombatEvent::CounterChanged {
                    counter: CounterKind::Devotion,
                    value: state.player.counters.get(CounterKind::Devotion),
                });
                bus.push(CombatEvent::CombatLog {
                    line: format!("{} surges with devotion!", definition.name),
                });
                surge.effects.clone()
            }
            _ => definition.effects.clone(),
        };

        for effect in &effects {
            if state.game_state.is_terminal() {
                break;
            }
            apply_card_effect(state, definitions, rng, bus, effect, target_id);
        }

        if definition.exhaust {
            bus.push(CombatEvent::CardExhausted {
                card: card.instance_id,
                name: card.name().to_string(),
            });
            state.player.exhaust_pile.push(card);
        } else {
            state.player.discard_pile.push(card);
        }

        PlayResult {
            success: true,
            message: None,
            log: collect_log(state, bus, mark),
        }
    }

    /// Resolve the player's turn-end, run every living enemy's action, pick
    /// next intents, and draw into the next player turn (or a terminal
    /// state). Returns the aggregated log of everything that happened.
    pub fn end_turn(&mut self) -> TurnReport {
        let mark = self.bus.len();

        if self.state.game_state != GameState::PlayerAction {
            self.bus.push(CombatEvent::CombatLog {
                line: "No player turn to end.".to_string(),
            });
            return TurnReport {
                log: collect_log(&self.state, &self.bus, mark),
            };
        }

        let Self {
            state,
            definitions,
            registry,
            rng,
            bus,
            ..
        } = self;

        state.game_state = GameState::EndTurn;

        // Radiance flares at the player's turn-end, then fades by half.
        let radiance = state.player.counters.get(CounterKind::Radiance);
        if radiance > 0 {
            bus.push(CombatEvent::CombatLog {
                line: format!("Radiance flares for {}.", radiance),
            });
            let ids: Vec<u32> = state
                .living_enemies()
                .filter(|e| !e.untargetable)
                .map(|e| e.id)
                .collect();
            for id in ids {
                if state.game_state.is_terminal() {
                    break;
                }
                if let Some(enemy) = state.enemy_mut(id) {
                    resolve_attack(
                        radiance,
                        &SourceMods::default(),
                        enemy,
                        TargetRef::Enemy { id },
                        bus,
                    );
                }
                after_enemy_hp_change(state, definitions, bus, id);
            }
            let faded = radiance / 2;
            state.player.counters.set(CounterKind::Radiance, faded);
            bus.push(CombatEvent::CounterChanged {
                counter: CounterKind::Radiance,
                value: faded,
            });
            if state.game_state.is_terminal() {
                return TurnReport {
                    log: collect_log(state, bus, mark),
                };
            }
        }

        tick_player_statuses(state, bus);
        check_defeat(state, bus);
        if state.game_state.is_terminal() {
            return TurnReport {
                log: collect_log(state, bus, mark),
            };
        }

        let mut hand = std::mem::take(&mut state.player.hand);
        state.player.discard_pile.append(&mut hand);

        state.game_state = GameState::EnemyAction;
        let acting: Vec<u32> = state.enemies.iter().map(|e| e.id).collect();
        for enemy_id in acting {
            if state.game_state.is_terminal() {
                break;
            }
            if state.enemy(enemy_id).map(|e| e.is_alive()) != Some(true) {
                continue;
            }
            take_enemy_turn(state, definitions, registry, rng, bus, enemy_id);
        }

        if state.game_state.is_terminal() {
            return TurnReport {
                log: collect_log(state, bus, mark),
            };
        }

        state.game_state = GameState::Cleanup;
        let survivors: Vec<u32> = state.enemies.iter().map(|e| e.id).collect();
        for id in survivors {
            set_enemy_intent(state, definitions, rng, bus, id);
        }

        // Block retention: leftover block fades at the turn boundary, except
        // what the fortify counter props up.
        let retained = state
            .player
            .block
            .min(state.player.counters.get(CounterKind::Fortify));
        if retained != state.player.block {
            state.player.block = retained;
            bus.push(CombatEvent::PlayerBlockChanged { block: retained });
        }

        state.game_state = GameState::Draw;
        state.turn_number += 1;
        bus.push(CombatEvent::TurnStarted {
            turn: state.turn_number,
        });
        state.player.resolve = state.player.max_resolve;
        bus.push(CombatEvent::ResolveChanged {
            resolve: state.player.resolve,
        });
        draw_cards(state, rng, bus, HAND_SIZE);
        state.game_state = GameState::PlayerAction;

        TurnReport {
            log: collect_log(state, bus, mark),
        }
    }
}

fn collect_log(state: &CombatState, bus: &EventBus, mark: usize) -> Vec<String> {
    bus.events()[mark..]
        .iter()
        .filter_map(|event| event.format(state))
        .collect()
}

/// Map an optional player-chosen index onto a living, targetable enemy id.
fn resolve_target(state: &CombatState, target_index: Option<usize>) -> Result<u32, String> {
    let candidates: Vec<u32> = state
        .living_enemies()
        .filter(|e| !e.untargetable)
        .map(|e| e.id)
        .collect();
    if candidates.is_empty() {
        return Err("no legal target".to_string());
    }
    match target_index {
        Some(index) => candidates
            .get(index)
            .copied()
            .ok_or_else(|| "no enemy at that position".to_string()),
        None if candidates.len() == 1 => Ok(candidates[0]),
        None => Err("a target must be chosen".to_string()),
    }
}

fn set_enemy_intent(
    state: &mut CombatState,
    definitions: &HashMap<String, EnemyDefinition>,
    rng: &mut CombatRng,
    bus: &mut EventBus,
    enemy_id: u32,
) {
    if let Some(enemy) = state.enemy_mut(enemy_id) {
        if let Some(definition) = definitions.get(&enemy.definition_id) {
            select_intent(enemy, definition, rng, bus);
        }
    }
}

fn apply_card_effect(
    state: &mut CombatState,
    definitions: &mut HashMap<String, EnemyDefinition>,
    rng: &mut CombatRng,
    bus: &mut EventBus,
    effect: &CardEffect,
    target_id: Option<u32>,
) {
    match effect {
        CardEffect::Strike { amount } => {
            if let Some(enemy_id) = target_id {
                let base = amount + spend_luck(state, bus);
                strike_enemy(state, definitions, bus, enemy_id, base);
            }
        }
        CardEffect::StrikeAll { amount } => {
            let base = amount + spend_luck(state, bus);
            let ids: Vec<u32> = state
                .living_enemies()
                .filter(|e| !e.untargetable)
                .map(|e| e.id)
                .collect();
            for enemy_id in ids {
                if state.game_state.is_terminal() {
                    break;
                }
                strike_enemy(state, definitions, bus, enemy_id, base);
            }
        }
        CardEffect::Guard { amount } => {
            state.player.block += amount;
            bus.push(CombatEvent::PlayerBlockChanged {
                block: state.player.block,
            });
        }
        CardEffect::Afflict {
            status,
            magnitude,
            duration,
            all,
        } => {
            let ids: Vec<u32> = if *all {
                state.living_enemies().map(|e| e.id).collect()
            } else {
                target_id.into_iter().collect()
            };
            for enemy_id in ids {
                if let Some(enemy) = state.enemy_mut(enemy_id) {
                    let (magnitude, duration) =
                        apply_status(&mut enemy.statuses, *status, *magnitude, *duration);
                    bus.push(CombatEvent::StatusApplied {
                        target: TargetRef::Enemy { id: enemy_id },
                        status: *status,
                        magnitude,
                        duration,
                    });
                }
            }
        }
        CardEffect::Bolster {
            status,
            magnitude,
            duration,
        } => {
            let (magnitude, duration) =
                apply_status(&mut state.player.statuses, *status, *magnitude, *duration);
            bus.push(CombatEvent::StatusApplied {
                target: TargetRef::Player,
                status: *status,
                magnitude,
                duration,
            });
        }
        CardEffect::Draw { count } => {
            draw_cards(state, rng, bus, *count as usize);
        }
        CardEffect::ChannelResolve { amount } => {
            state.player.resolve += amount;
            bus.push(CombatEvent::ResolveChanged {
                resolve: state.player.resolve,
            });
        }
        CardEffect::Mend { amount } => {
            resolve_heal(&mut state.player, *amount, TargetRef::Player, bus);
        }
        CardEffect::Cleanse { status } => {
            if remove_status(&mut state.player.statuses, *status) {
                bus.push(CombatEvent::StatusRemoved {
                    target: TargetRef::Player,
                    status: *status,
                    reason: StatusRemovalReason::Cleansed,
                });
            }
        }
        CardEffect::GainCounter { counter, amount } => {
            let value = state.player.counters.gain(*counter, *amount);
            bus.push(CombatEvent::CounterChanged {
                counter: *counter,
                value,
            });
        }
        CardEffect::PayHp { amount } => {
            let lost = lose_hp(&mut state.player, *amount);
            bus.push(CombatEvent::PlayerDamaged {
                breakdown: flat_breakdown(*amount, 0, lost),
                remaining_hp: state.player.hp,
            });
            let value = state.player.counters.gain(CounterKind::SoulDebt, *amount);
            bus.push(CombatEvent::CounterChanged {
                counter: CounterKind::SoulDebt,
                value,
            });
            check_defeat(state, bus);
        }
    }
}

/// Luck empties into the next strike: +1 base damage per point.
fn spend_luck(state: &mut CombatState, bus: &mut EventBus) -> u32 {
    let luck = state.player.counters.get(CounterKind::Luck);
    if luck > 0 {
        state.player.counters.set(CounterKind::Luck, 0);
        bus.push(CombatEvent::CounterChanged {
            counter: CounterKind::Luck,
            value: 0,
        });
    }
    luck
}

fn strike_enemy(
    state: &mut CombatState,
    definitions: &HashMap<String, EnemyDefinition>,
    bus: &mut EventBus,
    enemy_id: u32,
    base: u32,
) {
    let source = SourceMods::from_statuses(&state.player.statuses);
    if let Some(enemy) = state.enemy_mut(enemy_id) {
        resolve_attack(base, &source, enemy, TargetRef::Enemy { id: enemy_id }, bus);
    }
    after_enemy_hp_change(state, definitions, bus, enemy_id);
}

/// Death removal, victory checks, and phase ratcheting, run after anything
/// that can move an enemy's hp.
fn after_enemy_hp_change(
    state: &mut CombatState,
    definitions: &HashMap<String, EnemyDefinition>,
    bus: &mut EventBus,
    enemy_id: u32,
) {
    let dead = match state.enemy(enemy_id) {
        Some(enemy) => !enemy.is_alive(),
        None => return,
    };
    if dead {
        handle_enemy_death(state, bus, enemy_id);
        check_victory(state, bus);
    } else if let Some(enemy) = state.enemy_mut(enemy_id) {
        if let Some(definition) = definitions.get(&enemy.definition_id) {
            refresh_phase(enemy, definition, bus);
        }
    }
}

fn handle_enemy_death(state: &mut CombatState, bus: &mut EventBus, enemy_id: u32) {
    if let Some(position) = state.enemies.iter().position(|e| e.id == enemy_id) {
        let enemy = state.enemies.remove(position);
        let name = enemy.name.clone();
        state.graveyard.push(enemy);
        bus.push(CombatEvent::EnemyDied {
            enemy: enemy_id,
            name,
        });
    }
}

fn check_victory(state: &mut CombatState, bus: &mut EventBus) {
    if state.game_state.is_terminal() {
        return;
    }
    if state.all_enemies_dead() {
        state.game_state = GameState::Victory;
        bus.push(CombatEvent::GameOver { victory: true });
    }
}

fn check_defeat(state: &mut CombatState, bus: &mut EventBus) {
    if state.game_state.is_terminal() {
        return;
    }
    if state.player.is_defeated() {
        state.game_state = GameState::Defeat;
        bus.push(CombatEvent::GameOver { victory: false });
    }
}

fn draw_cards(state: &mut CombatState, rng: &mut CombatRng, bus: &mut EventBus, count: usize) {
    for _ in 0..count {
        if state.player.draw_pile.is_empty() {
            if state.player.discard_pile.is_empty() {
                break;
            }
            let reshuffled = state.player.discard_pile.len();
            let mut pile = std::mem::take(&mut state.player.discard_pile);
            rng.shuffle(&mut pile);
            state.player.draw_pile = pile;
            bus.push(CombatEvent::DeckReshuffled { count: reshuffled });
        }
        if let Some(card) = state.player.draw_pile.pop() {
            bus.push(CombatEvent::CardDrawn {
                card: card.instance_id,
                name: card.name().to_string(),
            });
            state.player.hand.push(card);
        }
    }
}

fn tick_player_statuses(state: &mut CombatState, bus: &mut EventBus) {
    let report = tick_statuses(&mut state.player.statuses);
    for (kind, damage) in report.damage {
        let lost = lose_hp(&mut state.player, damage);
        bus.push(CombatEvent::StatusDamage {
            target: TargetRef::Player,
            status: kind,
            damage: lost,
        });
    }
    for (_, heal) in report.healing {
        resolve_heal(&mut state.player, heal, TargetRef::Player, bus);
    }
    for kind in report.expired {
        bus.push(CombatEvent::StatusRemoved {
            target: TargetRef::Player,
            status: kind,
            reason: StatusRemovalReason::Expired,
        });
    }
}

fn tick_enemy_statuses(
    state: &mut CombatState,
    definitions: &HashMap<String, EnemyDefinition>,
    bus: &mut EventBus,
    enemy_id: u32,
) {
    let report = match state.enemy_mut(enemy_id) {
        Some(enemy) => tick_statuses(&mut enemy.statuses),
        None => return,
    };
    for (kind, damage) in report.damage {
        if let Some(enemy) = state.enemy_mut(enemy_id) {
            let lost = lose_hp(enemy, damage);
            bus.push(CombatEvent::StatusDamage {
                target: TargetRef::Enemy { id: enemy_id },
                status: kind,
                damage: lost,
            });
        }
    }
    for (_, heal) in report.healing {
        if let Some(enemy) = state.enemy_mut(enemy_id) {
            resolve_heal(enemy, heal, TargetRef::Enemy { id: enemy_id }, bus);
        }
    }
    for kind in report.expired {
        bus.push(CombatEvent::StatusRemoved {
            target: TargetRef::Enemy { id: enemy_id },
            status: kind,
            reason: StatusRemovalReason::Expired,
        });
    }
    after_enemy_hp_change(state, definitions, bus, enemy_id);
}

/// One enemy's full action: clear stale block, step the summon cooldown,
/// advance or fire a charge, otherwise execute the telegraphed intent, then
/// tick this enemy's own statuses.
fn take_enemy_turn(
    state: &mut CombatState,
    definitions: &mut HashMap<String, EnemyDefinition>,
    registry: &MinionRegistry,
    rng: &mut CombatRng,
    bus: &mut EventBus,
    enemy_id: u32,
) {
    if let Some(enemy) = state.enemy_mut(enemy_id) {
        if enemy.block > 0 {
            enemy.block = 0;
            bus.push(CombatEvent::EnemyBlockChanged {
                enemy: enemy_id,
                block: 0,
            });
        }
        if enemy.summon_cooldown > 0 {
            enemy.summon_cooldown -= 1;
        }
    }

    let mut firing: Option<ChargeState> = None;
    let mut still_charging = false;
    if let Some(enemy) = state.enemy_mut(enemy_id) {
        if let Some(charge) = enemy.charge.as_mut() {
            charge.turns_remaining = charge.turns_remaining.saturating_sub(1);
            if charge.turns_remaining == 0 {
                firing = enemy.charge.take();
            } else {
                still_charging = true;
            }
        }
    }

    if let Some(charge) = firing {
        bus.push(CombatEvent::CombatLog {
            line: format!(
                "{} unleashes {}!",
                state.enemy_label(enemy_id),
                charge.move_name
            ),
        });
        execute_move_action(
            state,
            definitions,
            registry,
            rng,
            bus,
            enemy_id,
            &charge.unleash,
            &charge.move_name,
        );
    } else if still_charging {
        bus.push(CombatEvent::CombatLog {
            line: format!("{} continues charging...", state.enemy_label(enemy_id)),
        });
    } else if let Some(intent) = state.enemy(enemy_id).and_then(|e| e.intent.clone()) {
        if let Some(enemy) = state.enemy_mut(enemy_id) {
            enemy.used_abilities.insert(intent.move_id.clone());
        }
        bus.push(CombatEvent::CombatLog {
            line: format!("{} uses {}.", state.enemy_label(enemy_id), intent.name),
        });
        execute_move_action(
            state,
            definitions,
            registry,
            rng,
            bus,
            enemy_id,
            &intent.action,
            &intent.name,
        );
    }

    if state.game_state.is_terminal() {
        return;
    }
    tick_enemy_statuses(state, definitions, bus, enemy_id);
}

#[allow(clippy::too_many_arguments)]
fn execute_move_action(
    state: &mut CombatState,
    definitions: &mut HashMap<String, EnemyDefinition>,
    registry: &MinionRegistry,
    rng: &mut CombatRng,
    bus: &mut EventBus,
    actor_id: u32,
    action: &MoveAction,
    label: &str,
) {
    match action {
        MoveAction::Attack {
            damage,
            lifesteal,
            self_damage,
        } => {
            enemy_attack_player(state, bus, actor_id, *damage);
            // Lifesteal is a fixed amount, not tied to damage dealt.
            if let Some(heal) = lifesteal {
                if let Some(enemy) = state.enemy_mut(actor_id) {
                    resolve_heal(enemy, *heal, TargetRef::Enemy { id: actor_id }, bus);
                }
            }
            if let Some(hurt) = self_damage {
                if let Some(enemy) = state.enemy_mut(actor_id) {
                    let lost = lose_hp(enemy, *hurt);
                    let remaining = enemy.hp;
                    bus.push(CombatEvent::EnemyDamaged {
                        enemy: actor_id,
                        breakdown: flat_breakdown(*hurt, 0, lost),
                        remaining_hp: remaining,
                    });
                }
                after_enemy_hp_change(state, definitions, bus, actor_id);
            }
        }
        MoveAction::MultiAttack { damage, times } => {
            for _ in 0..*times {
                if state.game_state.is_terminal() {
                    break;
                }
                enemy_attack_player(state, bus, actor_id, *damage);
            }
        }
        MoveAction::Defend { block } => {
            if let Some(enemy) = state.enemy_mut(actor_id) {
                enemy.block += block;
                bus.push(CombatEvent::EnemyBlockChanged {
                    enemy: actor_id,
                    block: enemy.block,
                });
            }
        }
        MoveAction::Buff {
            status,
            magnitude,
            duration,
        } => {
            buff_enemy(state, bus, actor_id, *status, *magnitude, *duration);
        }
        MoveAction::BuffAlly {
            status,
            magnitude,
            duration,
        } => {
            let allies: Vec<u32> = state
                .living_enemies()
                .filter(|e| e.id != actor_id)
                .map(|e| e.id)
                .collect();
            if allies.is_empty() {
                bus.push(CombatEvent::CombatLog {
                    line: format!("{} has no allies to bolster.", state.enemy_label(actor_id)),
                });
            }
            for ally_id in allies {
                buff_enemy(state, bus, ally_id, *status, *magnitude, *duration);
            }
        }
        MoveAction::Debuff {
            status,
            magnitude,
            duration,
        } => {
            let (magnitude, duration) =
                apply_status(&mut state.player.statuses, *status, *magnitude, *duration);
            bus.push(CombatEvent::StatusApplied {
                target: TargetRef::Player,
                status: *status,
                magnitude,
                duration,
            });
        }
        MoveAction::Heal { amount, consumes } => {
            execute_heal(state, bus, actor_id, *amount, consumes.as_deref());
        }
        MoveAction::Summon { minions, resurrect } => {
            let created =
                execute_summon(state, definitions, registry, rng, bus, actor_id, minions, *resurrect);
            if created > 0 {
                arm_summon_cooldown(state, actor_id);
            }
        }
        MoveAction::Spawn { minion } => {
            let created = execute_summon(
                state,
                definitions,
                registry,
                rng,
                bus,
                actor_id,
                std::slice::from_ref(minion),
                false,
            );
            if created > 0 {
                arm_summon_cooldown(state, actor_id);
            }
        }
        MoveAction::Charging { turns, unleash } => {
            if let Some(enemy) = state.enemy_mut(actor_id) {
                enemy.charge = Some(ChargeState {
                    turns_remaining: *turns,
                    move_name: label.to_string(),
                    unleash: (**unleash).clone(),
                });
            }
            bus.push(CombatEvent::CombatLog {
                line: format!("{} begins gathering power...", state.enemy_label(actor_id)),
            });
        }
        MoveAction::Command => {
            execute_command(state, definitions, bus, actor_id);
        }
        MoveAction::Unknown => {
            bus.push(CombatEvent::CombatLog {
                line: format!("{} does something inscrutable.", state.enemy_label(actor_id)),
            });
        }
    }
}

fn enemy_attack_player(state: &mut CombatState, bus: &mut EventBus, actor_id: u32, damage: u32) {
    let source = match state.enemy(actor_id) {
        Some(enemy) => SourceMods {
            might: enemy.might + magnitude_of(&enemy.statuses, StatusKind::Might),
            weakened: has_status(&enemy.statuses, StatusKind::Weakened),
        },
        None => return,
    };
    resolve_attack(damage, &source, &mut state.player, TargetRef::Player, bus);
    check_defeat(state, bus);
}

fn buff_enemy(
    state: &mut CombatState,
    bus: &mut EventBus,
    enemy_id: u32,
    status: StatusKind,
    magnitude: u32,
    duration: Option<u32>,
) {
    if let Some(enemy) = state.enemy_mut(enemy_id) {
        if status == StatusKind::Might {
            // Might on an enemy feeds its accumulated bonus rather than the
            // status list, so the pipeline sees one number.
            enemy.might = (enemy.might + magnitude).min(MIGHT_CAP);
            bus.push(CombatEvent::StatusApplied {
                target: TargetRef::Enemy { id: enemy_id },
                status,
                magnitude: enemy.might,
                duration: None,
            });
        } else {
            let (magnitude, duration) =
                apply_status(&mut enemy.statuses, status, magnitude, duration);
            bus.push(CombatEvent::StatusApplied {
                target: TargetRef::Enemy { id: enemy_id },
                status,
                magnitude,
                duration,
            });
        }
    }
}

/// Heal-kind execution, including the consume pattern: a named living ally
/// dies to fuel the heal, or the move quietly does nothing.
fn execute_heal(
    state: &mut CombatState,
    bus: &mut EventBus,
    actor_id: u32,
    amount: u32,
    consumes: Option<&str>,
) {
    match consumes {
        Some(required) => {
            let victim = state
                .enemies
                .iter()
                .find(|e| e.is_alive() && e.id != actor_id && e.definition_id == required)
                .map(|e| e.id);
            match victim {
                Some(victim_id) => {
                    bus.push(CombatEvent::CombatLog {
                        line: format!(
                            "{} consumes {}!",
                            state.enemy_label(actor_id),
                            state.enemy_label(victim_id)
                        ),
                    });
                    if let Some(victim) = state.enemy_mut(victim_id) {
                        let hp = victim.hp;
                        lose_hp(victim, hp);
                    }
                    handle_enemy_death(state, bus, victim_id);
                    if let Some(enemy) = state.enemy_mut(actor_id) {
                        resolve_heal(enemy, amount, TargetRef::Enemy { id: actor_id }, bus);
                    }
                }
                None => {
                    bus.push(CombatEvent::CombatLog {
                        line: format!(
                            "{} finds nothing to consume.",
                            state.enemy_label(actor_id)
                        ),
                    });
                }
            }
        }
        None => {
            if let Some(enemy) = state.enemy_mut(actor_id) {
                resolve_heal(enemy, amount, TargetRef::Enemy { id: actor_id }, bus);
            }
        }
    }
}

/// Create (or resurrect) summoned units, honoring the population cap per
/// unit and absorbing unregistered ids as logged no-ops. Returns how many
/// units actually appeared, which decides whether the cooldown arms.
#[allow(clippy::too_many_arguments)]
fn execute_summon(
    state: &mut CombatState,
    definitions: &mut HashMap<String, EnemyDefinition>,
    registry: &MinionRegistry,
    rng: &mut CombatRng,
    bus: &mut EventBus,
    actor_id: u32,
    minion_ids: &[String],
    resurrect: bool,
) -> usize {
    let mut created = 0;

    for minion_id in minion_ids {
        if state.living_minion_count() >= MINION_CAP {
            bus.push(CombatEvent::CombatLog {
                line: "The summoning fails; the horde is at full strength.".to_string(),
            });
            continue;
        }

        if resurrect {
            let position = state
                .graveyard
                .iter()
                .position(|e| e.definition_id == *minion_id && e.summoner == Some(actor_id));
            match position {
                Some(position) => {
                    let mut minion = state.graveyard.remove(position);
                    minion.hp = minion.max_hp;
                    minion.block = 0;
                    minion.statuses.clear();
                    minion.intent = None;
                    let id = minion.id;
                    let name = minion.name.clone();
                    state.enemies.push(minion);
                    bus.push(CombatEvent::EnemySummoned {
                        enemy: id,
                        name,
                        summoner: actor_id,
                    });
                    set_enemy_intent(state, definitions, rng, bus, id);
                    created += 1;
                }
                None => {
                    bus.push(CombatEvent::CombatLog {
                        line: format!(
                            "{} calls to the fallen, but no {} answers.",
                            state.enemy_label(actor_id),
                            minion_id
                        ),
                    });
                }
            }
            continue;
        }

        match registry.get(minion_id) {
            Some(minion_def) => {
                let minion_def = minion_def.clone();
                definitions
                    .entry(minion_def.id.clone())
                    .or_insert_with(|| minion_enemy_definition(&minion_def));
                let id = state.next_instance_id;
                state.next_instance_id += 1;
                let minion = Enemy::from_minion(id, &minion_def, actor_id);
                let name = minion.name.clone();
                state.enemies.push(minion);
                bus.push(CombatEvent::EnemySummoned {
                    enemy: id,
                    name,
                    summoner: actor_id,
                });
                // Fresh units are never renderable without an intent.
                set_enemy_intent(state, definitions, rng, bus, id);
                created += 1;
            }
            None => {
                bus.push(CombatEvent::CombatLog {
                    line: format!(
                        "{} calls for {}, but nothing answers.",
                        state.enemy_label(actor_id),
                        minion_id
                    ),
                });
            }
        }
    }

    created
}

fn arm_summon_cooldown(state: &mut CombatState, actor_id: u32) {
    if let Some(enemy) = state.enemy_mut(actor_id) {
        enemy.summon_cooldown = SUMMON_COOLDOWN_TURNS;
    }
}

/// Command: every living allied minion executes its basic attack right now,
/// out of its normal turn order, ignoring its own intent for this action.
fn execute_command(
    state: &mut CombatState,
    definitions: &HashMap<String, EnemyDefinition>,
    bus: &mut EventBus,
    actor_id: u32,
) {
    let minions: Vec<u32> = state
        .living_enemies()
        .filter(|e| e.is_minion && e.id != actor_id)
        .map(|e| e.id)
        .collect();
    if minions.is_empty() {
        bus.push(CombatEvent::CombatLog {
            line: format!(
                "{}'s command echoes unanswered.",
                state.enemy_label(actor_id)
            ),
        });
        return;
    }
    for minion_id in minions {
        if state.game_state.is_terminal() {
            break;
        }
        let attack = state
            .enemy(minion_id)
            .and_then(|m| definitions.get(&m.definition_id))
            .and_then(minion_basic_attack);
        if let Some(MoveAction::Attack { damage, .. }) = attack {
            bus.push(CombatEvent::CombatLog {
                line: format!("{} lashes out at the command!", state.enemy_label(minion_id)),
            });
            enemy_attack_player(state, bus, minion_id, damage);
        }
    }
}
