//! In-process daily reset scheduler
//!
//! Sleeps until the next `reset_time` (local `HH:MM`, read from
//! `system_settings` before every wait, default `00:00`) and runs the reset.
//! The guard keeps it harmless alongside an external cron.

use chrono::NaiveTime;
use shared::models::ResetTrigger;
use shared::util::now_millis;
use tokio_util::sync::CancellationToken;

use super::engine::{self, ResetOutcome};
use crate::db::settings;
use crate::state::AppState;
use crate::time;

pub struct ResetScheduler {
    state: AppState,
    shutdown: CancellationToken,
}

impl ResetScheduler {
    pub fn new(state: AppState, shutdown: CancellationToken) -> Self {
        Self { state, shutdown }
    }

    /// Main loop; returns once `shutdown` is cancelled
    pub async fn run(self) {
        tracing::info!("Ranking reset scheduler started");

        loop {
            let reset_time = self.reset_time().await;
            let sleep_duration = time::duration_until_next(now_millis(), reset_time, self.state.tz);

            tracing::info!(
                "Next ranking reset in {} minutes (reset_time={})",
                sleep_duration.as_secs() / 60,
                reset_time.format("%H:%M")
            );

            tokio::select! {
                _ = tokio::time::sleep(sleep_duration) => {
                    self.fire().await;
                }
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Ranking reset scheduler received shutdown signal");
                    return;
                }
            }
        }
    }

    async fn fire(&self) {
        let outcome = engine::execute_daily_reset(
            &self.state.pool,
            &self.state.reset_guard,
            self.state.tz,
            ResetTrigger::Scheduler,
        )
        .await;

        match outcome {
            Ok(ResetOutcome::Completed(report)) => {
                tracing::info!(
                    reset_date = %report.reset_date,
                    payments_created = report.payments_created,
                    "Scheduled ranking reset done"
                );
            }
            Ok(ResetOutcome::Skipped { reset_date }) => {
                tracing::info!(%reset_date, "Scheduled ranking reset skipped");
            }
            // Already logged by the engine
            Err(_) => {}
        }
    }

    async fn reset_time(&self) -> NaiveTime {
        match settings::get(&self.state.pool, settings::RESET_TIME).await {
            Ok(Some(value)) => time::parse_reset_time(&value),
            Ok(None) => NaiveTime::MIN,
            Err(e) => {
                tracing::error!("Failed to read reset_time: {}", e);
                NaiveTime::MIN
            }
        }
    }
}
