//! Ranking Reset Log Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Who started a ranking reset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "text", rename_all = "lowercase"))]
pub enum ResetTrigger {
    /// Operator from the admin panel
    Admin,
    /// External cron through the token-guarded endpoint
    Scheduled,
    /// In-process scheduler
    Scheduler,
}

impl ResetTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Scheduled => "scheduled",
            Self::Scheduler => "scheduler",
        }
    }
}

/// One row per business date on which a reset ran
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ResetLogEntry {
    pub id: i64,
    pub reset_date: NaiveDate,
    pub users_reset: i64,
    pub spins_deleted: i64,
    pub payments_created: i32,
    /// Number of runs recorded for the date (only > 1 with the guard disabled)
    pub run_count: i32,
    pub triggered_by: ResetTrigger,
    pub started_at: i64,
    pub finished_at: Option<i64>,
}
