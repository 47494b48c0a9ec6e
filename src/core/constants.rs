// Run structure
pub const MAX_WAVES: u32 = 30;

// Player baseline stats
pub const PLAYER_BASE_HEALTH: u32 = 100;
pub const PLAYER_BASE_DAMAGE: u32 = 10;
pub const PLAYER_CRIT_CHANCE: f64 = 0.10;
pub const ENEMY_CRIT_CHANCE: f64 = 0.05;
pub const BASE_CRIT_MULTIPLIER: f64 = 2.0;

// Enemy baseline and per-wave scaling
pub const ENEMY_BASE_HEALTH: u32 = 30;
pub const ENEMY_BASE_DAMAGE: u32 = 8;
pub const ENEMY_HEALTH_PER_WAVE: u32 = 10;
pub const ENEMY_DAMAGE_PER_WAVE: u32 = 2;

// Boss wave (final wave) multipliers: (hp_mult, dmg_mult)
pub const BOSS_MULTIPLIERS: (f64, f64) = (2.0, 1.5);
pub const BOSS_NAME: &str = "The CEO";

// Kill rewards (base amounts before the currency multiplier)
pub const CURRENCY_PER_KILL: u32 = 10;
pub const BOSS_KILL_BONUS: u32 = 50;

// Upgrade effect deltas, applied once per purchased level
pub const DAMAGE1_MULT_PER_LEVEL: f64 = 0.20;
pub const DAMAGE2_MULT_PER_LEVEL: f64 = 0.40;
pub const HEALTH_MULT_PER_LEVEL: f64 = 0.70;
pub const DAMAGE_REDUCTION_PER_LEVEL: f64 = 0.05;
pub const SHIELD_CAPACITY_PER_LEVEL: u32 = 20;
pub const CURRENCY_MULT_PER_LEVEL: f64 = 0.20;

// Ability unlock thresholds: crossing the wave unlocks the upgrade id
pub const ABILITY_UNLOCK_WAVES: [(u32, &str); 3] =
    [(5, "janitor"), (10, "hr_lady"), (15, "drunk_coworker")];

// Turn pacing. Combat is discrete; seconds only pace the presentation
// layer and convert ability cooldowns into whole rounds.
pub const TURN_SECONDS: f64 = 1.0;
pub const HIT_REACTION_SECONDS: f64 = 0.4;
pub const WAVE_TRANSITION_SECONDS: f64 = 1.0;

// Save format
pub const SAVE_VERSION_MAGIC: u64 = 0x4252_4B52_4D31_0001; // "BRKRM1" + rev
