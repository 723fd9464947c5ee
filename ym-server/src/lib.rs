//! ym-server: Young Money ranking reset and payment settlement service
//!
//! - Daily ranking reset: pays the top positions, opens cooldown windows,
//!   zeroes daily points and purges the day's spins in one transaction
//! - Once-per-day guard keyed by business date
//! - Settlement API for the operator's PIX payouts

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod ranking;
pub mod settlement;
pub mod state;
pub mod time;

pub use config::Config;
pub use state::AppState;
