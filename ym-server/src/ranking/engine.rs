//! Daily ranking reset
//!
//! One transaction per run. The guard claim, ranking snapshot, point reset,
//! spin purge, check-in marker, payments and cooldowns either all commit or
//! none do; dropping the transaction on any error rolls it back.

use std::collections::HashSet;

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{PendingPayment, ResetTrigger};
use shared::util::now_millis;
use sqlx::PgPool;
use thiserror::Error;

use super::guard::{GuardDecision, ResetGuard};
use super::plan::{self, SkippedPosition};
use super::policy::ResetPolicy;
use crate::db::cooldowns::{self, CooldownWindow};
use crate::db::payments::{self, NewPayment};
use crate::db::reset_log::{self, ResetCounts};
use crate::db::{settings, spin_history, users};
use crate::time;

#[derive(Debug, Error)]
pub enum ResetError {
    #[error("reset transaction failed: {0}")]
    Transaction(#[from] sqlx::Error),
}

impl From<ResetError> for AppError {
    fn from(_: ResetError) -> Self {
        // Details were logged where the run failed.
        AppError::new(ErrorCode::ResetFailed)
    }
}

/// What a completed run changed
#[derive(Debug, Clone, Serialize)]
pub struct ResetReport {
    pub reset_date: NaiveDate,
    pub triggered_by: ResetTrigger,
    pub users_reset: u64,
    pub spins_deleted: u64,
    pub payments_created: usize,
    pub payments: Vec<PendingPayment>,
    pub skipped_positions: Vec<SkippedPosition>,
    pub last_reset_datetime: String,
}

#[derive(Debug, Clone)]
pub enum ResetOutcome {
    Completed(ResetReport),
    /// The guard found a committed run for `reset_date`
    Skipped { reset_date: NaiveDate },
}

/// Run the daily reset now
pub async fn execute_daily_reset(
    pool: &PgPool,
    guard: &ResetGuard,
    tz: Tz,
    trigger: ResetTrigger,
) -> Result<ResetOutcome, ResetError> {
    let result = execute_daily_reset_at(pool, guard, tz, trigger, now_millis()).await;
    if let Err(e) = &result {
        tracing::error!(
            error = %e,
            trigger = trigger.as_str(),
            "Ranking reset failed, transaction rolled back"
        );
    }
    result
}

/// Run the daily reset as of `now` (Unix millis)
pub async fn execute_daily_reset_at(
    pool: &PgPool,
    guard: &ResetGuard,
    tz: Tz,
    trigger: ResetTrigger,
    now: i64,
) -> Result<ResetOutcome, ResetError> {
    let reset_date = time::business_date(now, tz);
    let mut tx = pool.begin().await?;

    let log_id = match guard.enter(&mut tx, reset_date, trigger, now).await? {
        GuardDecision::Proceed { log_id } => log_id,
        GuardDecision::Skip => {
            tx.rollback().await?;
            tracing::info!(
                %reset_date,
                trigger = trigger.as_str(),
                "Ranking already reset for this date, skipping"
            );
            return Ok(ResetOutcome::Skipped { reset_date });
        }
    };

    let policy = ResetPolicy::load(&mut *tx).await?;

    // Snapshot before zeroing
    let ranked = users::top_ranked(&mut tx, policy.payout_positions() as i64).await?;
    let standings = plan::standings(ranked);
    let user_ids: Vec<i64> = standings.iter().map(|s| s.user_id).collect();
    let in_cooldown: HashSet<(i64, i32)> = cooldowns::active_pairs(&mut *tx, &user_ids, now)
        .await?
        .into_iter()
        .collect();
    let payout_plan = plan::plan_payouts(&standings, &in_cooldown, &policy);

    let users_reset = users::zero_daily_points(&mut tx).await?;

    let (day_start, day_end) = time::day_bounds_millis(reset_date, tz);
    let spins_deleted = spin_history::purge_between(&mut tx, day_start, day_end).await?;

    let last_reset_datetime = time::format_local(now, tz);
    settings::upsert(
        &mut *tx,
        settings::LAST_RESET_DATETIME,
        &last_reset_datetime,
        now,
    )
    .await?;

    let mut created = Vec::with_capacity(payout_plan.payouts.len());
    for payout in &payout_plan.payouts {
        let payment = payments::insert_pending(
            &mut *tx,
            &NewPayment {
                user_id: payout.user_id,
                position: payout.position,
                amount: payout.amount,
                pix_key: payout.pix_key.clone(),
                reset_date: Some(reset_date),
            },
            now,
        )
        .await?;

        cooldowns::extend(
            &mut *tx,
            &CooldownWindow {
                user_id: payout.user_id,
                position: payout.position,
                hours: payout.cooldown_hours,
                prize_amount: payout.amount,
                reset_date: Some(reset_date),
            },
            now,
        )
        .await?;

        created.push(payment);
    }

    reset_log::finish(
        &mut *tx,
        log_id,
        ResetCounts {
            users_reset: users_reset as i64,
            spins_deleted: spins_deleted as i64,
            payments_created: created.len() as i32,
        },
        now,
    )
    .await?;

    tx.commit().await?;

    tracing::info!(
        %reset_date,
        trigger = trigger.as_str(),
        users_reset,
        spins_deleted,
        payments_created = created.len(),
        skipped_positions = payout_plan.skipped.len(),
        "Ranking reset completed"
    );

    Ok(ResetOutcome::Completed(ResetReport {
        reset_date,
        triggered_by: trigger,
        users_reset,
        spins_deleted,
        payments_created: created.len(),
        payments: created,
        skipped_positions: payout_plan.skipped,
        last_reset_datetime,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_error_is_generic_to_clients() {
        let app: AppError = ResetError::Transaction(sqlx::Error::PoolTimedOut).into();
        assert_eq!(app.code, ErrorCode::ResetFailed);
        assert_eq!(app.message, "Ranking reset failed");
    }
}
