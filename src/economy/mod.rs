//! Economy ledger: run/total currency and the permanent upgrade tree.

#![allow(unused_imports)]

pub mod ledger;
pub mod upgrades;

pub use ledger::*;
pub use upgrades::*;
