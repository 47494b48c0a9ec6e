//! Spawn collaborator: builds wave-scaled enemy combatants.

use rand::Rng;

use crate::combat::types::Combatant;
use crate::core::constants::*;
use crate::progression::ProgressionTracker;

/// Visual variant selector for the presentation layer; the simulation
/// only consumes the stat values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyVariant {
    Normal,
    Boss,
}

/// Returns a fresh enemy scaled to the tracker's current wave: base stats
/// plus the linear progression bonuses, with boss multipliers on the
/// final wave.
pub fn spawn_enemy(progression: &ProgressionTracker) -> (Combatant, EnemyVariant) {
    let health = ENEMY_BASE_HEALTH + progression.enemy_health_bonus();
    let damage = ENEMY_BASE_DAMAGE + progression.enemy_damage_bonus();

    let (combatant, variant) = if progression.is_boss_wave() {
        let (hp_mult, dmg_mult) = BOSS_MULTIPLIERS;
        let boss = Combatant::enemy(
            BOSS_NAME.to_string(),
            (health as f64 * hp_mult).round() as u32,
            (damage as f64 * dmg_mult).round() as u32,
        );
        (boss, EnemyVariant::Boss)
    } else {
        (
            Combatant::enemy(generate_enemy_name(), health, damage),
            EnemyVariant::Normal,
        )
    };

    log::debug!(
        "spawned {} -> hp {}, dmg {} (wave {})",
        combatant.name,
        combatant.max_health,
        combatant.attack_damage,
        progression.current_level(),
    );
    (combatant, variant)
}

pub fn generate_enemy_name() -> String {
    let mut rng = rand::thread_rng();

    let prefixes = [
        "Grumpy",
        "Caffeinated",
        "Overworked",
        "Passive-Aggressive",
        "Micromanaging",
        "Sleep-Deprived",
        "Disgruntled",
        "Buzzword-Spouting",
    ];
    let suffixes = [
        "Intern",
        "Accountant",
        "Middle Manager",
        "Consultant",
        "Recruiter",
        "Sales Rep",
        "Auditor",
        "Team Lead",
    ];

    let prefix = prefixes[rng.gen_range(0..prefixes.len())];
    let suffix = suffixes[rng.gen_range(0..suffixes.len())];

    format!("{} {}", prefix, suffix)
}
