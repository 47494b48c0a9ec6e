use crate::game::GamePhase;

/// Which side of the encounter an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Player,
    Enemy,
}

/// Discrete simulation events consumed by presentation/audio collaborators.
///
/// Events are returned from orchestrator operations and delivered at most
/// once per occurrence; the core never depends on who listens.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    StateChanged(GamePhase),
    DamageApplied {
        target: Side,
        amount: u32,
        was_crit: bool,
        shield_absorbed: u32,
    },
    CombatantDied(Side),
    WaveAdvanced {
        wave: u32,
        is_boss: bool,
    },
    /// A progression threshold removed this upgrade's locks for good.
    AbilityUnlocked(&'static str),
    CurrencyChanged {
        run: u32,
        total: u32,
    },
    UpgradePurchased {
        id: &'static str,
        level: u32,
    },
    AbilityUsed {
        id: &'static str,
        damage: u32,
    },
    /// Player died; the run's earnings were committed to the total.
    RunEnded {
        waves_cleared: u32,
        earnings: u32,
    },
    /// Final wave cleared; the run's earnings were committed to the total.
    RunWon {
        earnings: u32,
    },
}
