//! Database access layer
//!
//! Every function takes an executor so callers decide whether it runs
//! inside the reset/settlement transaction or directly on the pool.

pub mod cooldowns;
pub mod payments;
pub mod reset_log;
pub mod settings;
pub mod spin_history;
pub mod users;
