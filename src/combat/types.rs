use crate::core::constants::*;

/// One side of an encounter. Created on run/wave start, logically removed
/// by the orchestrator once dead.
///
/// Invariants: `current_health <= max_health`, `current_shield <= max_shield`.
#[derive(Debug, Clone)]
pub struct Combatant {
    pub name: String,
    pub max_health: u32,
    pub current_health: u32,
    pub max_shield: u32,
    pub current_shield: u32,
    pub attack_damage: u32,
    /// Probability of a crit per attack, in [0, 1].
    pub crit_chance: f64,
    /// Damage scale applied on a crit, >= 1.
    pub crit_multiplier: f64,
    pub is_player: bool,
}

impl Combatant {
    /// Baseline player before multipliers are applied
    /// (see `initialize_from_baseline`).
    pub fn player() -> Self {
        Self {
            name: "Player".to_string(),
            max_health: PLAYER_BASE_HEALTH,
            current_health: PLAYER_BASE_HEALTH,
            max_shield: 0,
            current_shield: 0,
            attack_damage: PLAYER_BASE_DAMAGE,
            crit_chance: PLAYER_CRIT_CHANCE,
            crit_multiplier: BASE_CRIT_MULTIPLIER,
            is_player: true,
        }
    }

    pub fn enemy(name: String, max_health: u32, attack_damage: u32) -> Self {
        Self {
            name,
            max_health,
            current_health: max_health,
            max_shield: 0,
            current_shield: 0,
            attack_damage,
            crit_chance: ENEMY_CRIT_CHANCE,
            crit_multiplier: BASE_CRIT_MULTIPLIER,
            is_player: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current_health > 0
    }
}

/// Breakdown of one damage application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DamageResult {
    pub shield_absorbed: u32,
    pub health_damage: u32,
    /// True exactly once: on the call that brought health to 0.
    pub died: bool,
}

/// Outcome of an attack roll, before it is applied to a defender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackRoll {
    pub damage: u32,
    pub was_crit: bool,
}

/// Per-run policy for the player's shield between waves.
///
/// Runs regenerate the shield every wave until the player owns the shield
/// upgrade; from then on the pool carries over and only refills on spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShieldPolicy {
    RegenerateEveryWave,
    RetainAcrossWaves,
}
