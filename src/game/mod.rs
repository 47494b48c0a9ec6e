//! Run/battle orchestrator: owns the run lifecycle state machine and the
//! turn-resolution loop, composing the combat resolver, the progression
//! tracker, and the economy ledger.

#![allow(unused_imports)]

pub mod orchestrator;

pub use orchestrator::*;

/// Lifecycle states of the simulation. Presentation-only screens
/// (options, instructions, credits) live outside the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    MainMenu,
    Battle,
    Pause,
    Upgrades,
    Results,
    Win,
}

/// Whose half-turn runs next. Turns strictly alternate, player first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOwner {
    Player,
    Enemy,
}
