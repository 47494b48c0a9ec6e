use crate::core::constants::*;

/// Process-wide player multipliers, mutated only by upgrade effects and
/// reset to identity by new-game or a full effect recomputation.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerMultipliers {
    pub damage_multiplier: f64,
    pub health_multiplier: f64,
    /// Fraction of incoming damage removed before shield/health, in [0, 1].
    pub damage_reduction: f64,
    pub shield_capacity: u32,
}

impl PlayerMultipliers {
    pub fn identity() -> Self {
        Self {
            damage_multiplier: 1.0,
            health_multiplier: 1.0,
            damage_reduction: 0.0,
            shield_capacity: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::identity();
    }
}

impl Default for PlayerMultipliers {
    fn default() -> Self {
        Self::identity()
    }
}

/// Active-ability payload carried by the late-game upgrades.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbilitySpec {
    /// Flat damage, bypassing multipliers and crits.
    pub damage: u32,
    /// Presentation-time cooldown; the simulation converts this to rounds.
    pub cooldown_seconds: f64,
}

/// One permanent upgrade. The ledger is the sole mutator of `level`.
#[derive(Debug, Clone)]
pub struct Upgrade {
    pub id: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub level: u32,
    pub max_level: u32,
    pub base_cost: u32,
    /// Cost growth factor per level, > 1.
    pub cost_growth: f64,
    /// Requires another upgrade at the given level before purchase.
    pub requires: Option<(&'static str, u32)>,
    /// Locked until the run reaches this wave (or a threshold removes it).
    pub wave_gate: Option<u32>,
    pub ability: Option<AbilitySpec>,
}

impl Upgrade {
    pub fn current_cost(&self) -> u32 {
        (self.base_cost as f64 * self.cost_growth.powi(self.level as i32)).round() as u32
    }

    pub fn is_maxed(&self) -> bool {
        self.level >= self.max_level
    }

    pub fn is_active_ability(&self) -> bool {
        self.ability.is_some()
    }
}

/// The canonical upgrade catalog.
pub fn default_upgrades() -> Vec<Upgrade> {
    vec![
        Upgrade {
            id: "damage1",
            display_name: "Stapler Sidearm",
            description: "Each level adds +20% attack damage.",
            level: 0,
            max_level: 10,
            base_cost: 20,
            cost_growth: 1.5,
            requires: None,
            wave_gate: None,
            ability: None,
        },
        Upgrade {
            id: "damage2",
            display_name: "Three-Hole Punch",
            description: "Each level adds +40% attack damage.",
            level: 0,
            max_level: 10,
            base_cost: 35,
            cost_growth: 1.5,
            requires: Some(("damage1", 3)),
            wave_gate: None,
            ability: None,
        },
        Upgrade {
            id: "health",
            display_name: "Standing Desk",
            description: "Each level adds +70% max health.",
            level: 0,
            max_level: 10,
            base_cost: 25,
            cost_growth: 1.5,
            requires: None,
            wave_gate: None,
            ability: None,
        },
        Upgrade {
            id: "shield",
            display_name: "Cubicle Barricade",
            description: "Each level adds +5% damage reduction and +20 shield.",
            level: 0,
            max_level: 5,
            base_cost: 30,
            cost_growth: 1.5,
            requires: None,
            wave_gate: None,
            ability: None,
        },
        Upgrade {
            id: "currency",
            display_name: "Expense Account",
            description: "Each level adds +20% currency from kills.",
            level: 0,
            max_level: 5,
            base_cost: 25,
            cost_growth: 1.5,
            requires: None,
            wave_gate: None,
            ability: None,
        },
        Upgrade {
            id: "janitor",
            display_name: "Janitor",
            description: "Throws a mop. Unlocked at wave 5.",
            level: 0,
            max_level: 1,
            base_cost: 50,
            cost_growth: 1.5,
            requires: None,
            wave_gate: Some(5),
            ability: Some(AbilitySpec {
                damage: 20,
                cooldown_seconds: 10.0,
            }),
        },
        Upgrade {
            id: "hr_lady",
            display_name: "HR Lady",
            description: "Yells \"You're fired!\". Unlocked at wave 10.",
            level: 0,
            max_level: 1,
            base_cost: 75,
            cost_growth: 1.5,
            requires: None,
            wave_gate: Some(10),
            ability: Some(AbilitySpec {
                damage: 35,
                cooldown_seconds: 15.0,
            }),
        },
        Upgrade {
            id: "drunk_coworker",
            display_name: "Drunk Coworker",
            description: "Throws an empty bottle. Unlocked at wave 15.",
            level: 0,
            max_level: 1,
            base_cost: 100,
            cost_growth: 1.5,
            requires: None,
            wave_gate: Some(15),
            ability: Some(AbilitySpec {
                damage: 50,
                cooldown_seconds: 20.0,
            }),
        },
    ]
}
