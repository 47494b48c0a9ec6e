use std::collections::HashMap;

use crate::combat::logic::{
    calculate_attack_damage, initialize_from_baseline, reset_for_next_encounter, take_damage,
};
use crate::combat::types::{Combatant, ShieldPolicy};
use crate::core::constants::*;
use crate::core::events::{GameEvent, Side};
use crate::economy::ledger::{CurrencyLedger, PurchaseError};
use crate::economy::upgrades::PlayerMultipliers;
use crate::game::{GamePhase, TurnOwner};
use crate::progression::{ProgressionTracker, WaveAdvance};
use crate::save_manager::SaveData;
use crate::spawn::{spawn_enemy, EnemyVariant};

/// The orchestrator. Sole writer of run state and sole owner of combatant
/// lifecycle; every operation returns the events it produced, delivered
/// at most once each.
///
/// Invalid operations for the current phase are absorbed as no-ops (empty
/// event lists), never panics: the presentation layer may race a queued
/// input against a transition that already happened.
#[derive(Debug)]
pub struct Game {
    pub phase: GamePhase,
    pub progression: ProgressionTracker,
    pub ledger: CurrencyLedger,
    pub multipliers: PlayerMultipliers,
    pub player: Option<Combatant>,
    pub enemy: Option<Combatant>,
    pub enemy_variant: EnemyVariant,
    pub turn: TurnOwner,
    /// Shield behavior chosen at run start (see `ShieldPolicy`).
    pub shield_policy: ShieldPolicy,
    /// Set between an enemy death and the next spawn; dedupes re-entrant
    /// spawn requests for the same wave transition.
    wave_transition_pending: bool,
    /// Generation counter: bumped whenever the battle loop starts or is
    /// cancelled, so a driver holding a stale token can detect that its
    /// loop was invalidated.
    battle_token: u64,
    /// Rounds remaining until each active ability is ready again.
    ability_cooldowns: HashMap<&'static str, u32>,
    /// Waves fully cleared by the most recently finished run.
    pub last_waves_cleared: u32,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Self {
            phase: GamePhase::MainMenu,
            progression: ProgressionTracker::default(),
            ledger: CurrencyLedger::new(),
            multipliers: PlayerMultipliers::identity(),
            player: None,
            enemy: None,
            enemy_variant: EnemyVariant::Normal,
            turn: TurnOwner::Player,
            shield_policy: ShieldPolicy::RegenerateEveryWave,
            wave_transition_pending: false,
            battle_token: 0,
            ability_cooldowns: HashMap::new(),
            last_waves_cleared: 0,
        }
    }

    pub fn wave_transition_pending(&self) -> bool {
        self.wave_transition_pending
    }

    /// Current loop generation. Any previously observed value is stale
    /// once a new battle starts or an old one is cancelled.
    pub fn battle_token(&self) -> u64 {
        self.battle_token
    }

    /// True while a run is live (battle, paused, or parked on the
    /// mid-run upgrade screen).
    pub fn run_in_progress(&self) -> bool {
        self.player.is_some()
    }

    // ------------------------------------------------------------------
    // Run lifecycle
    // ------------------------------------------------------------------

    /// Starts a fresh run: wave 1, zero run currency, fresh combatants.
    /// Valid from the menu, the upgrade screen, or a finished-run screen.
    pub fn start_new_run(&mut self) -> Vec<GameEvent> {
        if self.phase == GamePhase::Battle || self.phase == GamePhase::Pause {
            log::debug!("ignoring start_new_run during {:?}", self.phase);
            return Vec::new();
        }

        self.progression.reset_level();
        self.ledger.reset_run_currency();

        let mut player = Combatant::player();
        initialize_from_baseline(&mut player, &self.multipliers, true);
        self.player = Some(player);

        self.enter_battle(true)
    }

    /// Re-enters battle without run-scoped resets: either a run restored
    /// from a save (fresh combatant instances at the saved wave) or a
    /// return from the mid-run upgrade screen (baseline re-applied so new
    /// purchases take effect, shield clamped to the possibly-new cap).
    pub fn resume_run(&mut self) -> Vec<GameEvent> {
        if self.phase == GamePhase::Battle || self.phase == GamePhase::Pause {
            log::debug!("ignoring resume_run during {:?}", self.phase);
            return Vec::new();
        }

        match self.player.as_mut() {
            Some(player) => initialize_from_baseline(player, &self.multipliers, false),
            None => {
                let mut player = Combatant::player();
                initialize_from_baseline(&mut player, &self.multipliers, true);
                self.player = Some(player);
            }
        }

        self.enter_battle(false)
    }

    fn enter_battle(&mut self, fresh_run: bool) -> Vec<GameEvent> {
        // Any prior loop or half-finished transition is dead from here.
        self.battle_token += 1;
        self.wave_transition_pending = false;
        self.turn = TurnOwner::Player;

        // Once the shield upgrade is owned, the pool carries across waves
        // instead of regenerating.
        self.shield_policy = match self.ledger.upgrade("shield") {
            Some(up) if up.level > 0 => ShieldPolicy::RetainAcrossWaves,
            _ => ShieldPolicy::RegenerateEveryWave,
        };

        if fresh_run {
            self.ability_cooldowns.clear();
        }

        let (enemy, variant) = spawn_enemy(&self.progression);
        self.enemy = Some(enemy);
        self.enemy_variant = variant;

        self.phase = GamePhase::Battle;
        log::info!(
            "battle start: wave {} ({}), token {}",
            self.progression.current_level(),
            if fresh_run { "fresh run" } else { "resumed" },
            self.battle_token,
        );

        vec![
            GameEvent::StateChanged(GamePhase::Battle),
            GameEvent::WaveAdvanced {
                wave: self.progression.current_level(),
                is_boss: self.progression.is_boss_wave(),
            },
            self.currency_event(),
        ]
    }

    // ------------------------------------------------------------------
    // Turn loop
    // ------------------------------------------------------------------

    /// Executes one half-turn of the strictly alternating loop. The
    /// defender's death is checked immediately: a dead enemy never gets
    /// its return attack in the same round.
    ///
    /// No-op unless in battle with both combatants live and no wave
    /// transition in flight.
    pub fn step_turn(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.phase != GamePhase::Battle
            || self.wave_transition_pending
            || self.player.is_none()
            || self.enemy.is_none()
        {
            return events;
        }

        match self.turn {
            TurnOwner::Player => {
                let roll = {
                    let Some(player) = self.player.as_ref() else {
                        return events;
                    };
                    calculate_attack_damage(player, &self.multipliers, &mut rand::thread_rng())
                };
                let Some(enemy) = self.enemy.as_mut() else {
                    return events;
                };
                let result = take_damage(enemy, roll.damage, roll.was_crit, &self.multipliers);
                events.push(GameEvent::DamageApplied {
                    target: Side::Enemy,
                    amount: result.shield_absorbed + result.health_damage,
                    was_crit: roll.was_crit,
                    shield_absorbed: result.shield_absorbed,
                });

                if result.died {
                    events.push(GameEvent::CombatantDied(Side::Enemy));
                    self.resolve_enemy_death(&mut events);
                } else {
                    self.turn = TurnOwner::Enemy;
                }
            }
            TurnOwner::Enemy => {
                let roll = {
                    let Some(enemy) = self.enemy.as_ref() else {
                        return events;
                    };
                    calculate_attack_damage(enemy, &self.multipliers, &mut rand::thread_rng())
                };
                let Some(player) = self.player.as_mut() else {
                    return events;
                };
                let result = take_damage(player, roll.damage, roll.was_crit, &self.multipliers);
                events.push(GameEvent::DamageApplied {
                    target: Side::Player,
                    amount: result.shield_absorbed + result.health_damage,
                    was_crit: roll.was_crit,
                    shield_absorbed: result.shield_absorbed,
                });

                if result.died {
                    events.push(GameEvent::CombatantDied(Side::Player));
                    self.resolve_player_death(&mut events);
                } else {
                    // Full round complete.
                    self.turn = TurnOwner::Player;
                    self.tick_ability_cooldowns();
                }
            }
        }

        events
    }

    /// Completes a pending wave transition: heals the player (shield per
    /// policy) and spawns the next scaled enemy. The presentation layer
    /// calls this after pacing the transition; calling it twice, or with
    /// no transition pending, is a deduplicated no-op.
    pub fn finish_wave_transition(&mut self) -> Vec<GameEvent> {
        if self.phase != GamePhase::Battle || !self.wave_transition_pending {
            return Vec::new();
        }
        self.wave_transition_pending = false;

        if let Some(player) = self.player.as_mut() {
            reset_for_next_encounter(player, self.shield_policy);
        }

        let (enemy, variant) = spawn_enemy(&self.progression);
        self.enemy = Some(enemy);
        self.enemy_variant = variant;
        self.turn = TurnOwner::Player;

        Vec::new()
    }

    /// Fires an owned active ability at the enemy: flat damage, no crit,
    /// no multipliers. Invalid uses (wrong phase, unowned, on cooldown,
    /// no enemy) are absorbed.
    pub fn use_ability(&mut self, id: &str) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.phase != GamePhase::Battle || self.wave_transition_pending {
            return events;
        }

        let Some((ability_id, spec)) = self
            .ledger
            .upgrade(id)
            .filter(|up| up.level > 0)
            .and_then(|up| up.ability.map(|spec| (up.id, spec)))
        else {
            log::debug!("ignoring use_ability({id}): not an owned ability");
            return events;
        };
        if self.ability_cooldowns.get(ability_id).copied().unwrap_or(0) > 0 {
            return events;
        }
        let Some(enemy) = self.enemy.as_mut() else {
            return events;
        };

        let result = take_damage(enemy, spec.damage, false, &self.multipliers);
        self.ability_cooldowns.insert(
            ability_id,
            (spec.cooldown_seconds / TURN_SECONDS).ceil() as u32,
        );

        events.push(GameEvent::AbilityUsed {
            id: ability_id,
            damage: spec.damage,
        });
        events.push(GameEvent::DamageApplied {
            target: Side::Enemy,
            amount: result.shield_absorbed + result.health_damage,
            was_crit: false,
            shield_absorbed: result.shield_absorbed,
        });

        if result.died {
            events.push(GameEvent::CombatantDied(Side::Enemy));
            self.resolve_enemy_death(&mut events);
        }

        events
    }

    pub fn ability_cooldown(&self, id: &str) -> u32 {
        self.ability_cooldowns.get(id).copied().unwrap_or(0)
    }

    fn tick_ability_cooldowns(&mut self) {
        for remaining in self.ability_cooldowns.values_mut() {
            *remaining = remaining.saturating_sub(1);
        }
    }

    fn resolve_enemy_death(&mut self, events: &mut Vec<GameEvent>) {
        self.enemy = None;

        let base = if self.progression.is_boss_wave() {
            CURRENCY_PER_KILL + BOSS_KILL_BONUS
        } else {
            CURRENCY_PER_KILL
        };
        self.ledger.add_currency(base);
        events.push(self.currency_event());

        match self.progression.increase_level() {
            WaveAdvance::Advanced { wave, unlocked } => {
                for id in unlocked {
                    self.ledger.unlock_upgrade(id);
                    events.push(GameEvent::AbilityUnlocked(id));
                }
                events.push(GameEvent::WaveAdvanced {
                    wave,
                    is_boss: self.progression.is_boss_wave(),
                });
                self.wave_transition_pending = true;
            }
            WaveAdvance::Victory => {
                self.last_waves_cleared = self.progression.current_level();
                self.ledger.commit_run_to_total();
                // A finished run leaves nothing to resume.
                self.progression.reset_level();
                self.teardown_battle(GamePhase::Win);
                events.push(GameEvent::RunWon {
                    earnings: self.ledger.last_run_earnings(),
                });
                events.push(self.currency_event());
                events.push(GameEvent::StateChanged(GamePhase::Win));
            }
        }
    }

    fn resolve_player_death(&mut self, events: &mut Vec<GameEvent>) {
        self.last_waves_cleared = self.progression.waves_cleared();
        self.ledger.commit_run_to_total();
        // A finished run leaves nothing to resume.
        self.progression.reset_level();
        self.teardown_battle(GamePhase::Results);
        events.push(GameEvent::RunEnded {
            waves_cleared: self.last_waves_cleared,
            earnings: self.ledger.last_run_earnings(),
        });
        events.push(self.currency_event());
        events.push(GameEvent::StateChanged(GamePhase::Results));
    }

    fn teardown_battle(&mut self, next: GamePhase) {
        self.player = None;
        self.enemy = None;
        self.wave_transition_pending = false;
        self.battle_token += 1;
        self.phase = next;
    }

    // ------------------------------------------------------------------
    // State transitions
    // ------------------------------------------------------------------

    /// Suspends the turn loop at the current step boundary. Ignored
    /// outside of battle.
    pub fn pause(&mut self) -> Vec<GameEvent> {
        if self.phase != GamePhase::Battle {
            log::debug!("ignoring pause during {:?}", self.phase);
            return Vec::new();
        }
        self.battle_token += 1;
        self.phase = GamePhase::Pause;
        vec![GameEvent::StateChanged(GamePhase::Pause)]
    }

    /// Returns from pause to battle. The `step_turn` guards keep the loop
    /// from running while a transition is still pending or a combatant is
    /// missing.
    pub fn resume_from_pause(&mut self) -> Vec<GameEvent> {
        if self.phase != GamePhase::Pause {
            log::debug!("ignoring resume_from_pause during {:?}", self.phase);
            return Vec::new();
        }
        self.battle_token += 1;
        self.phase = GamePhase::Battle;
        vec![GameEvent::StateChanged(GamePhase::Battle)]
    }

    /// Opens the upgrade screen: from the menu or a finished-run screen
    /// between runs, or from pause mid-run (combatants are kept).
    pub fn go_to_upgrades(&mut self) -> Vec<GameEvent> {
        match self.phase {
            GamePhase::MainMenu | GamePhase::Pause | GamePhase::Results | GamePhase::Win => {
                self.phase = GamePhase::Upgrades;
                vec![GameEvent::StateChanged(GamePhase::Upgrades)]
            }
            _ => {
                log::debug!("ignoring go_to_upgrades during {:?}", self.phase);
                Vec::new()
            }
        }
    }

    /// Purchase protocol; the ledger enforces locks, max level, and
    /// funds. Success applies exactly one level's effect.
    pub fn buy_upgrade(&mut self, id: &str) -> Result<Vec<GameEvent>, PurchaseError> {
        let wave = self.progression.current_level();
        let level = self
            .ledger
            .try_buy_upgrade(id, wave, &mut self.multipliers)?;

        let bought = self
            .ledger
            .upgrade(id)
            .map(|up| up.id)
            .ok_or(PurchaseError::UnknownUpgrade)?;
        Ok(vec![
            GameEvent::UpgradePurchased { id: bought, level },
            self.currency_event(),
        ])
    }

    /// Leaves any phase for the main menu, cancelling an in-flight loop
    /// and transition (idempotent) and committing the run exactly once if
    /// one was live. Persistent state (total currency, upgrade levels)
    /// survives; the wave counter is kept so the run can be saved and
    /// resumed.
    pub fn quit_to_main_menu(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();

        if self.run_in_progress() {
            self.ledger.commit_run_to_total();
            events.push(self.currency_event());
        }
        self.teardown_battle(GamePhase::MainMenu);

        events.push(GameEvent::StateChanged(GamePhase::MainMenu));
        events
    }

    /// Full wipe: upgrades, multipliers, currency, progression. The
    /// caller is responsible for clearing the save file.
    pub fn new_game(&mut self) -> Vec<GameEvent> {
        self.teardown_battle(GamePhase::MainMenu);
        self.ledger.reset_all(&mut self.multipliers);
        self.progression = ProgressionTracker::default();
        self.ability_cooldowns.clear();
        self.last_waves_cleared = 0;

        vec![
            GameEvent::StateChanged(GamePhase::MainMenu),
            self.currency_event(),
        ]
    }

    // ------------------------------------------------------------------
    // Persistence bridge
    // ------------------------------------------------------------------

    pub fn to_save_data(&self) -> SaveData {
        SaveData {
            total_currency: self.ledger.total_currency(),
            run_currency: self.ledger.run_currency(),
            last_run_earnings: self.ledger.last_run_earnings(),
            wave: self.progression.current_level(),
            upgrade_levels: self.ledger.upgrade_levels(),
            saved_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Restores persisted run/economy state: currencies and wave counter
    /// back in place, multipliers rebuilt from upgrade levels alone, and
    /// unlock thresholds up to the saved wave replayed.
    pub fn restore_from_save(&mut self, data: &SaveData) -> Vec<GameEvent> {
        let mut events = Vec::new();

        self.ledger.restore_currency(
            data.total_currency,
            data.run_currency,
            data.last_run_earnings,
        );
        self.ledger.restore_upgrade_levels(&data.upgrade_levels);
        self.ledger.apply_all_upgrade_effects(&mut self.multipliers);
        self.progression.set_current_level(data.wave);

        for id in self.progression.refire_unlocks_up_to(data.wave) {
            self.ledger.unlock_upgrade(id);
            events.push(GameEvent::AbilityUnlocked(id));
        }

        events.push(self.currency_event());
        log::info!(
            "restored save: wave {}, total {}, run {}",
            data.wave,
            data.total_currency,
            data.run_currency,
        );
        events
    }

    fn currency_event(&self) -> GameEvent {
        GameEvent::CurrencyChanged {
            run: self.ledger.run_currency(),
            total: self.ledger.total_currency(),
        }
    }
}
