//! Wave counter, stat-scaling formulas, and ability-unlock thresholds.

use std::collections::BTreeSet;

use crate::core::constants::*;

/// Result of advancing the wave counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaveAdvance {
    /// Moved to the next wave; `unlocked` lists upgrades whose locks were
    /// removed by crossing a threshold on this advance.
    Advanced {
        wave: u32,
        unlocked: Vec<&'static str>,
    },
    /// Already on the final wave: clearing it wins the run. The counter
    /// never exceeds `max_waves`.
    Victory,
}

/// Integer wave state machine, bounded to `[1, max_waves]`.
#[derive(Debug, Clone)]
pub struct ProgressionTracker {
    wave: u32,
    max_waves: u32,
    /// Thresholds that already fired; re-crossing has no further effect.
    fired_unlocks: BTreeSet<u32>,
}

impl Default for ProgressionTracker {
    fn default() -> Self {
        Self::new(MAX_WAVES)
    }
}

impl ProgressionTracker {
    pub fn new(max_waves: u32) -> Self {
        Self {
            wave: 1,
            max_waves,
            fired_unlocks: BTreeSet::new(),
        }
    }

    /// Called at the start of a fresh run.
    pub fn reset_level(&mut self) {
        self.wave = 1;
    }

    pub fn current_level(&self) -> u32 {
        self.wave
    }

    pub fn max_waves(&self) -> u32 {
        self.max_waves
    }

    /// Restores the wave counter from persisted state, clamped to bounds.
    pub fn set_current_level(&mut self, wave: u32) {
        self.wave = wave.clamp(1, self.max_waves);
    }

    /// Advances the wave counter by one, firing any one-time unlock
    /// thresholds crossed on the way. Signals `Victory` instead of
    /// exceeding `max_waves`.
    pub fn increase_level(&mut self) -> WaveAdvance {
        if self.wave >= self.max_waves {
            return WaveAdvance::Victory;
        }

        self.wave += 1;
        let unlocked = self.fire_unlocks_at(self.wave);
        WaveAdvance::Advanced {
            wave: self.wave,
            unlocked,
        }
    }

    /// Replays every threshold at or below `wave`, e.g. after restoring a
    /// saved run. Idempotent: thresholds that already fired are skipped.
    pub fn refire_unlocks_up_to(&mut self, wave: u32) -> Vec<&'static str> {
        let mut unlocked = Vec::new();
        for &(threshold, id) in ABILITY_UNLOCK_WAVES.iter() {
            if threshold <= wave && self.fired_unlocks.insert(threshold) {
                unlocked.push(id);
            }
        }
        unlocked
    }

    fn fire_unlocks_at(&mut self, wave: u32) -> Vec<&'static str> {
        let mut unlocked = Vec::new();
        for &(threshold, id) in ABILITY_UNLOCK_WAVES.iter() {
            if threshold == wave && self.fired_unlocks.insert(threshold) {
                unlocked.push(id);
            }
        }
        unlocked
    }

    /// Extra enemy health at the current wave. Wave 1 has zero bonus.
    pub fn enemy_health_bonus(&self) -> u32 {
        (self.wave - 1) * ENEMY_HEALTH_PER_WAVE
    }

    /// Extra enemy damage at the current wave. Wave 1 has zero bonus.
    pub fn enemy_damage_bonus(&self) -> u32 {
        (self.wave - 1) * ENEMY_DAMAGE_PER_WAVE
    }

    pub fn is_boss_wave(&self) -> bool {
        self.wave == self.max_waves
    }

    /// Waves fully cleared so far (the current wave is still in progress).
    pub fn waves_cleared(&self) -> u32 {
        self.wave - 1
    }
}
