//! Core constants and cross-cutting event types.

#![allow(unused_imports)]

pub mod constants;
pub mod events;

pub use constants::*;
pub use events::*;
