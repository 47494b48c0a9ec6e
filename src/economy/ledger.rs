use crate::core::constants::*;
use crate::economy::upgrades::{default_upgrades, PlayerMultipliers, Upgrade};

/// Why an upgrade purchase was rejected. None of these mutate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseError {
    UnknownUpgrade,
    /// Dependency or wave gate unmet.
    Locked,
    Maxed,
    InsufficientFunds,
}

/// Run/total currency plus the canonical upgrade list. The ledger is the
/// sole mutator of upgrade levels; kill rewards land in `run_currency`,
/// purchases spend from `total_currency`.
#[derive(Debug, Clone)]
pub struct CurrencyLedger {
    run_currency: u32,
    total_currency: u32,
    last_run_earnings: u32,
    currency_multiplier: f64,
    upgrades: Vec<Upgrade>,
}

impl Default for CurrencyLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl CurrencyLedger {
    pub fn new() -> Self {
        Self {
            run_currency: 0,
            total_currency: 0,
            last_run_earnings: 0,
            currency_multiplier: 1.0,
            upgrades: default_upgrades(),
        }
    }

    pub fn run_currency(&self) -> u32 {
        self.run_currency
    }

    pub fn total_currency(&self) -> u32 {
        self.total_currency
    }

    pub fn last_run_earnings(&self) -> u32 {
        self.last_run_earnings
    }

    pub fn currency_multiplier(&self) -> f64 {
        self.currency_multiplier
    }

    pub fn upgrades(&self) -> &[Upgrade] {
        &self.upgrades
    }

    pub fn upgrade(&self, id: &str) -> Option<&Upgrade> {
        self.upgrades.iter().find(|u| u.id == id)
    }

    /// Awards currency for the current run, scaled by the currency
    /// multiplier and rounded. Returns the amount actually added.
    pub fn add_currency(&mut self, base_amount: u32) -> u32 {
        let earned = (base_amount as f64 * self.currency_multiplier)
            .round()
            .max(0.0) as u32;
        self.run_currency = self.run_currency.saturating_add(earned);
        earned
    }

    /// Deducts from the persistent total. Fails without mutation when
    /// funds are short.
    pub fn spend_currency(&mut self, amount: u32) -> bool {
        if self.total_currency < amount {
            return false;
        }
        self.total_currency -= amount;
        true
    }

    /// Folds the run's earnings into the persistent total. Called exactly
    /// once per run termination; a second consecutive call adds 0.
    pub fn commit_run_to_total(&mut self) {
        self.last_run_earnings = self.run_currency;
        self.total_currency = self.total_currency.saturating_add(self.run_currency);
        self.run_currency = 0;
        log::info!(
            "run committed: earned {}, total now {}",
            self.last_run_earnings,
            self.total_currency,
        );
    }

    pub fn reset_run_currency(&mut self) {
        self.run_currency = 0;
    }

    /// Purchase protocol: reject while locked or maxed without touching
    /// currency; otherwise spend, bump the level, and apply that single
    /// level's effect.
    pub fn try_buy_upgrade(
        &mut self,
        id: &str,
        current_wave: u32,
        multipliers: &mut PlayerMultipliers,
    ) -> Result<u32, PurchaseError> {
        let index = self
            .upgrades
            .iter()
            .position(|u| u.id == id)
            .ok_or(PurchaseError::UnknownUpgrade)?;

        if self.is_locked(&self.upgrades[index], current_wave) {
            return Err(PurchaseError::Locked);
        }
        if self.upgrades[index].is_maxed() {
            return Err(PurchaseError::Maxed);
        }

        let cost = self.upgrades[index].current_cost();
        if !self.spend_currency(cost) {
            return Err(PurchaseError::InsufficientFunds);
        }

        self.upgrades[index].level += 1;
        let (id, level) = (self.upgrades[index].id, self.upgrades[index].level);
        self.apply_upgrade_effect(id, multipliers);
        log::debug!("bought {id} level {level} for {cost}");
        Ok(level)
    }

    fn is_locked(&self, up: &Upgrade, current_wave: u32) -> bool {
        if let Some((required_id, required_level)) = up.requires {
            match self.upgrade(required_id) {
                Some(req) if req.level >= required_level => {}
                _ => return true,
            }
        }
        matches!(up.wave_gate, Some(gate) if current_wave < gate)
    }

    /// Permanently removes an upgrade's dependency and wave gate (fired by
    /// progression thresholds). Idempotent.
    pub fn unlock_upgrade(&mut self, id: &str) {
        if let Some(up) = self.upgrades.iter_mut().find(|u| u.id == id) {
            up.requires = None;
            up.wave_gate = None;
        }
    }

    /// One level's worth of effect for the given upgrade id. Deltas are
    /// fixed constants, so applying all levels in order reproduces any
    /// purchase history.
    fn apply_upgrade_effect(&mut self, id: &str, multipliers: &mut PlayerMultipliers) {
        match id {
            "damage1" => multipliers.damage_multiplier += DAMAGE1_MULT_PER_LEVEL,
            "damage2" => multipliers.damage_multiplier += DAMAGE2_MULT_PER_LEVEL,
            "health" => multipliers.health_multiplier += HEALTH_MULT_PER_LEVEL,
            "shield" => {
                multipliers.damage_reduction =
                    (multipliers.damage_reduction + DAMAGE_REDUCTION_PER_LEVEL).min(1.0);
                multipliers.shield_capacity += SHIELD_CAPACITY_PER_LEVEL;
            }
            "currency" => self.currency_multiplier += CURRENCY_MULT_PER_LEVEL,
            // Active abilities carry no passive effect.
            _ => {}
        }
    }

    /// Rebuilds the multiplier state from upgrade levels alone: reset to
    /// identity, then reapply each upgrade's effect `level` times. Used
    /// after restoring persisted levels.
    pub fn apply_all_upgrade_effects(&mut self, multipliers: &mut PlayerMultipliers) {
        multipliers.reset();
        self.currency_multiplier = 1.0;

        for index in 0..self.upgrades.len() {
            let (id, level) = (self.upgrades[index].id, self.upgrades[index].level);
            for _ in 0..level {
                self.apply_upgrade_effect(id, multipliers);
            }
        }
    }

    /// Level snapshot for persistence.
    pub fn upgrade_levels(&self) -> Vec<(String, u32)> {
        self.upgrades
            .iter()
            .map(|u| (u.id.to_string(), u.level))
            .collect()
    }

    /// Restores persisted levels, clamped to each upgrade's max. Unknown
    /// ids are ignored (stale saves). Callers follow up with
    /// `apply_all_upgrade_effects`.
    pub fn restore_upgrade_levels(&mut self, levels: &[(String, u32)]) {
        for (id, level) in levels {
            if let Some(up) = self.upgrades.iter_mut().find(|u| u.id == id) {
                up.level = (*level).min(up.max_level);
            }
        }
    }

    /// Restores persisted currency values.
    pub fn restore_currency(&mut self, total: u32, run: u32, last_run_earnings: u32) {
        self.total_currency = total;
        self.run_currency = run;
        self.last_run_earnings = last_run_earnings;
    }

    /// New-game wipe: levels, gates, currencies, and multipliers all
    /// return to the catalog defaults.
    pub fn reset_all(&mut self, multipliers: &mut PlayerMultipliers) {
        *self = Self::new();
        multipliers.reset();
    }
}
