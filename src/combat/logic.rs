use rand::Rng;

use crate::combat::types::{AttackRoll, Combatant, DamageResult, ShieldPolicy};
use crate::core::constants::*;
use crate::economy::upgrades::PlayerMultipliers;

/// Applies damage to a combatant: shield absorbs first, overflow hits
/// health. Player-controlled defenders reduce the raw damage by their
/// damage-reduction fraction (rounded) before any pool is touched.
///
/// Hitting an already-dead combatant is a no-op, not an error: the
/// orchestrator may still have a queued action against a combatant whose
/// death it has already processed. `died` is true exactly once, on the
/// call that brought health to 0.
pub fn take_damage(
    target: &mut Combatant,
    raw_damage: u32,
    was_crit: bool,
    multipliers: &PlayerMultipliers,
) -> DamageResult {
    if !target.is_alive() {
        return DamageResult::default();
    }

    let effective = if target.is_player {
        (raw_damage as f64 * (1.0 - multipliers.damage_reduction)).round() as u32
    } else {
        raw_damage
    };

    let shield_absorbed = target.current_shield.min(effective);
    target.current_shield -= shield_absorbed;

    let health_damage = effective - shield_absorbed;
    target.current_health = target.current_health.saturating_sub(health_damage);

    let died = target.current_health == 0;
    log::debug!(
        "{} took {} damage (crit={}, shield absorbed {}) -> {}/{} hp",
        target.name,
        effective,
        was_crit,
        shield_absorbed,
        target.current_health,
        target.max_health,
    );

    DamageResult {
        shield_absorbed,
        health_damage,
        died,
    }
}

/// Rolls one attack. Player damage scales by the damage multiplier
/// (rounded) before the crit trial; a crit then scales by the attacker's
/// crit multiplier (rounded). The order is fixed.
pub fn calculate_attack_damage(
    attacker: &Combatant,
    multipliers: &PlayerMultipliers,
    rng: &mut impl Rng,
) -> AttackRoll {
    let mut damage = if attacker.is_player {
        (attacker.attack_damage as f64 * multipliers.damage_multiplier).round() as u32
    } else {
        attacker.attack_damage
    };

    let was_crit = rng.gen_bool(attacker.crit_chance.clamp(0.0, 1.0));
    if was_crit {
        damage = (damage as f64 * attacker.crit_multiplier).round() as u32;
    }

    AttackRoll { damage, was_crit }
}

/// Restores a combatant for the next wave: health refills fully; the
/// player's shield refills or carries over per the run's policy; enemy
/// shields always clear.
pub fn reset_for_next_encounter(combatant: &mut Combatant, policy: ShieldPolicy) {
    combatant.current_health = combatant.max_health;

    if combatant.is_player {
        if policy == ShieldPolicy::RegenerateEveryWave {
            combatant.current_shield = combatant.max_shield;
        }
    } else {
        combatant.current_shield = 0;
    }
}

/// Applies the persistent player multipliers to a player combatant's pools.
///
/// On the first spawn of a run the shield starts full; on re-entry (resume
/// from a mid-run upgrade screen, loaded save) the current shield is
/// clamped to the possibly-changed cap.
pub fn initialize_from_baseline(
    combatant: &mut Combatant,
    multipliers: &PlayerMultipliers,
    first_spawn_of_run: bool,
) {
    if !combatant.is_player {
        return;
    }

    combatant.max_health =
        (PLAYER_BASE_HEALTH as f64 * multipliers.health_multiplier).round() as u32;
    combatant.current_health = combatant.max_health;

    combatant.max_shield = multipliers.shield_capacity;
    combatant.current_shield = if first_spawn_of_run {
        combatant.max_shield
    } else {
        combatant.current_shield.min(combatant.max_shield)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn no_multipliers() -> PlayerMultipliers {
        PlayerMultipliers::identity()
    }

    #[test]
    fn test_damage_overflow_splits_between_shield_and_health() {
        let mut player = Combatant::player();
        player.max_shield = 20;
        player.current_shield = 15;

        let result = take_damage(&mut player, 25, false, &no_multipliers());
        assert_eq!(result.shield_absorbed, 15);
        assert_eq!(result.health_damage, 10);
        assert!(!result.died);
        assert_eq!(player.current_shield, 0);
        assert_eq!(player.current_health, PLAYER_BASE_HEALTH - 10);
    }

    #[test]
    fn test_shield_fully_absorbs_small_hit() {
        let mut player = Combatant::player();
        player.max_shield = 20;
        player.current_shield = 20;

        let result = take_damage(&mut player, 8, false, &no_multipliers());
        assert_eq!(result.shield_absorbed, 8);
        assert_eq!(result.health_damage, 0);
        assert_eq!(player.current_shield, 12);
        assert_eq!(player.current_health, PLAYER_BASE_HEALTH);
    }

    #[test]
    fn test_damage_reduction_applies_before_shield() {
        let mut player = Combatant::player();
        player.current_shield = 0;
        let mut multipliers = PlayerMultipliers::identity();
        multipliers.damage_reduction = 0.25;

        // round(20 * 0.75) = 15
        let result = take_damage(&mut player, 20, false, &multipliers);
        assert_eq!(result.health_damage, 15);
        assert_eq!(player.current_health, PLAYER_BASE_HEALTH - 15);
    }

    #[test]
    fn test_damage_reduction_ignored_for_enemies() {
        let mut enemy = Combatant::enemy("Target".to_string(), 100, 0);
        let mut multipliers = PlayerMultipliers::identity();
        multipliers.damage_reduction = 0.50;

        let result = take_damage(&mut enemy, 20, false, &multipliers);
        assert_eq!(result.health_damage, 20);
        assert_eq!(enemy.current_health, 80);
    }

    #[test]
    fn test_death_reported_exactly_once() {
        let mut enemy = Combatant::enemy("Target".to_string(), 10, 0);

        let first = take_damage(&mut enemy, 15, false, &no_multipliers());
        assert!(first.died);
        assert_eq!(enemy.current_health, 0);

        // Delivery after death must be a no-op, not a second death.
        let second = take_damage(&mut enemy, 15, false, &no_multipliers());
        assert_eq!(second, DamageResult::default());
        assert!(!second.died);
        assert_eq!(enemy.current_health, 0);
    }

    #[test]
    fn test_health_never_negative() {
        let mut enemy = Combatant::enemy("Target".to_string(), 5, 0);
        let result = take_damage(&mut enemy, 1_000, false, &no_multipliers());
        assert_eq!(enemy.current_health, 0);
        assert_eq!(result.health_damage, 1_000);
    }

    #[test]
    fn test_attack_roll_applies_damage_multiplier_before_crit() {
        let mut player = Combatant::player();
        player.attack_damage = 10;
        player.crit_chance = 1.0;
        player.crit_multiplier = 2.0;
        let mut multipliers = PlayerMultipliers::identity();
        multipliers.damage_multiplier = 1.6;

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let roll = calculate_attack_damage(&player, &multipliers, &mut rng);
        // round(10 * 1.6) = 16, then crit: round(16 * 2.0) = 32
        assert!(roll.was_crit);
        assert_eq!(roll.damage, 32);
    }

    #[test]
    fn test_enemy_attack_ignores_damage_multiplier() {
        let mut enemy = Combatant::enemy("Attacker".to_string(), 30, 8);
        enemy.crit_chance = 0.0;
        let mut multipliers = PlayerMultipliers::identity();
        multipliers.damage_multiplier = 3.0;

        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let roll = calculate_attack_damage(&enemy, &multipliers, &mut rng);
        assert!(!roll.was_crit);
        assert_eq!(roll.damage, 8);
    }

    #[test]
    fn test_zero_crit_chance_never_crits() {
        let mut player = Combatant::player();
        player.crit_chance = 0.0;
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        for _ in 0..200 {
            let roll = calculate_attack_damage(&player, &no_multipliers(), &mut rng);
            assert!(!roll.was_crit);
            assert_eq!(roll.damage, PLAYER_BASE_DAMAGE);
        }
    }

    #[test]
    fn test_crit_rate_tracks_crit_chance() {
        let mut player = Combatant::player();
        player.crit_chance = 0.5;
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let trials = 2_000;
        let crits = (0..trials)
            .filter(|_| calculate_attack_damage(&player, &no_multipliers(), &mut rng).was_crit)
            .count();

        // Bernoulli(0.5) over 2000 trials; a seeded generator keeps this stable.
        assert!((800..=1_200).contains(&crits), "crits={crits}");
    }

    #[test]
    fn test_reset_regenerates_or_retains_player_shield() {
        let mut player = Combatant::player();
        player.max_shield = 40;
        player.current_shield = 5;
        player.current_health = 1;

        reset_for_next_encounter(&mut player, ShieldPolicy::RetainAcrossWaves);
        assert_eq!(player.current_health, player.max_health);
        assert_eq!(player.current_shield, 5);

        reset_for_next_encounter(&mut player, ShieldPolicy::RegenerateEveryWave);
        assert_eq!(player.current_shield, 40);
    }

    #[test]
    fn test_reset_clears_enemy_shield() {
        let mut enemy = Combatant::enemy("Target".to_string(), 30, 8);
        enemy.max_shield = 10;
        enemy.current_shield = 10;
        enemy.current_health = 2;

        reset_for_next_encounter(&mut enemy, ShieldPolicy::RetainAcrossWaves);
        assert_eq!(enemy.current_health, 30);
        assert_eq!(enemy.current_shield, 0);
    }

    #[test]
    fn test_initialize_from_baseline_first_spawn() {
        let mut player = Combatant::player();
        let mut multipliers = PlayerMultipliers::identity();
        multipliers.health_multiplier = 1.7;
        multipliers.shield_capacity = 40;

        initialize_from_baseline(&mut player, &multipliers, true);
        assert_eq!(player.max_health, 170);
        assert_eq!(player.current_health, 170);
        assert_eq!(player.max_shield, 40);
        assert_eq!(player.current_shield, 40);
    }

    #[test]
    fn test_initialize_from_baseline_clamps_shield_on_reentry() {
        let mut player = Combatant::player();
        player.max_shield = 60;
        player.current_shield = 55;
        let mut multipliers = PlayerMultipliers::identity();
        multipliers.shield_capacity = 40;

        initialize_from_baseline(&mut player, &multipliers, false);
        assert_eq!(player.max_shield, 40);
        assert_eq!(player.current_shield, 40);
    }

    #[test]
    fn test_initialize_from_baseline_ignores_enemies() {
        let mut enemy = Combatant::enemy("Target".to_string(), 30, 8);
        let mut multipliers = PlayerMultipliers::identity();
        multipliers.health_multiplier = 5.0;

        initialize_from_baseline(&mut enemy, &multipliers, true);
        assert_eq!(enemy.max_health, 30);
    }
}
