//! Shared types for the Young Money backend
//!
//! Error codes, the JSON response envelope and the ranking/payment domain
//! models used by the server and its tests.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, ErrorCode};
