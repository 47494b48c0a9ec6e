//! Breakroom - Turn-Based Wave Combat Simulation
//!
//! This module exposes the simulation engine for testing and external use:
//! the run/battle state machine, damage/shield/crit resolution, wave
//! scaling, and the persistent upgrade economy. Rendering, audio, and input
//! are external collaborators that consume the emitted events.

// Allow dead code in library - some functions are only used by the binary
#![allow(dead_code)]

pub mod combat;
pub mod core;
pub mod economy;
pub mod game;
pub mod progression;
pub mod save_manager;
pub mod spawn;

pub use crate::core::constants::*;
pub use crate::core::events::{GameEvent, Side};
pub use crate::game::{Game, GamePhase};
