//! Data models
//!
//! Shared between ym-server and its API consumers.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! IDs are `i64` (PostgreSQL BIGINT), timestamps are Unix millis.

pub mod cooldown;
pub mod payment;
pub mod reset;

// Re-exports
pub use cooldown::*;
pub use payment::*;
pub use reset::*;
