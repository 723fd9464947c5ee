//! Once-per-day reset guard
//!
//! Backed by `ranking_reset_log`, unique on the business date. With the
//! guard enabled the first run for a date claims the row and every later
//! run (sequential or concurrent) is skipped. With it disabled runs always
//! proceed and only bump `run_count`.

use chrono::NaiveDate;
use serde::Serialize;
use shared::models::ResetTrigger;
use sqlx::{PgConnection, PgExecutor};

use crate::db::reset_log;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardState {
    NotRunToday,
    RunToday,
}

impl GuardState {
    pub fn from_logged(logged: bool) -> Self {
        if logged { Self::RunToday } else { Self::NotRunToday }
    }
}

/// Result of entering the guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Run the reset; finish the log row `log_id` afterwards
    Proceed { log_id: i64 },
    /// Already reset for this date
    Skip,
}

#[derive(Debug, Clone, Copy)]
pub struct ResetGuard {
    enabled: bool,
}

impl ResetGuard {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Claim `date` inside the reset transaction
    pub async fn enter(
        &self,
        conn: &mut PgConnection,
        date: NaiveDate,
        trigger: ResetTrigger,
        now: i64,
    ) -> Result<GuardDecision, sqlx::Error> {
        if !self.enabled {
            let log_id = reset_log::record_run(conn, date, trigger, now).await?;
            return Ok(GuardDecision::Proceed { log_id });
        }

        Ok(match reset_log::claim(conn, date, trigger, now).await? {
            Some(log_id) => GuardDecision::Proceed { log_id },
            None => GuardDecision::Skip,
        })
    }

    /// Committed state for `date`
    pub async fn state<'e>(
        &self,
        executor: impl PgExecutor<'e>,
        date: NaiveDate,
    ) -> Result<GuardState, sqlx::Error> {
        let entry = reset_log::find_by_date(executor, date).await?;
        Ok(GuardState::from_logged(entry.is_some()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_from_log() {
        assert_eq!(GuardState::from_logged(false), GuardState::NotRunToday);
        assert_eq!(GuardState::from_logged(true), GuardState::RunToday);
    }

    #[test]
    fn test_state_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&GuardState::RunToday).unwrap(),
            "\"run_today\""
        );
    }
}
