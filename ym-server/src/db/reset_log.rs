//! Ranking reset log
//!
//! `reset_date` is unique, so inserting the row for a business date is the
//! claim that lets exactly one reset run for that date.

use chrono::NaiveDate;
use shared::models::{ResetLogEntry, ResetTrigger};
use sqlx::PgExecutor;

/// Counters written when a run finishes
#[derive(Debug, Clone, Copy, Default)]
pub struct ResetCounts {
    pub users_reset: i64,
    pub spins_deleted: i64,
    pub payments_created: i32,
}

/// Claim `reset_date`. `None` means another run already holds it.
///
/// A concurrent claim blocks on the unique index until the holder commits
/// (then conflicts) or rolls back (then succeeds).
pub async fn claim<'e>(
    executor: impl PgExecutor<'e>,
    reset_date: NaiveDate,
    trigger: ResetTrigger,
    now: i64,
) -> Result<Option<i64>, sqlx::Error> {
    let row: Option<(i64,)> = sqlx::query_as(
        r#"
        INSERT INTO ranking_reset_log (reset_date, triggered_by, started_at)
        VALUES ($1, $2, $3)
        ON CONFLICT (reset_date) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(reset_date)
    .bind(trigger)
    .bind(now)
    .fetch_optional(executor)
    .await?;
    Ok(row.map(|(id,)| id))
}

/// Record a run without claiming: repeated runs bump `run_count`
pub async fn record_run<'e>(
    executor: impl PgExecutor<'e>,
    reset_date: NaiveDate,
    trigger: ResetTrigger,
    now: i64,
) -> Result<i64, sqlx::Error> {
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO ranking_reset_log (reset_date, triggered_by, started_at)
        VALUES ($1, $2, $3)
        ON CONFLICT (reset_date) DO UPDATE SET
            run_count = ranking_reset_log.run_count + 1,
            triggered_by = EXCLUDED.triggered_by,
            started_at = EXCLUDED.started_at,
            finished_at = NULL
        RETURNING id
        "#,
    )
    .bind(reset_date)
    .bind(trigger)
    .bind(now)
    .fetch_one(executor)
    .await?;
    Ok(id)
}

pub async fn finish<'e>(
    executor: impl PgExecutor<'e>,
    id: i64,
    counts: ResetCounts,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE ranking_reset_log
        SET users_reset = $1, spins_deleted = $2, payments_created = $3, finished_at = $4
        WHERE id = $5
        "#,
    )
    .bind(counts.users_reset)
    .bind(counts.spins_deleted)
    .bind(counts.payments_created)
    .bind(now)
    .bind(id)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn find_by_date<'e>(
    executor: impl PgExecutor<'e>,
    reset_date: NaiveDate,
) -> Result<Option<ResetLogEntry>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM ranking_reset_log WHERE reset_date = $1")
        .bind(reset_date)
        .fetch_optional(executor)
        .await
}

/// Latest runs first
pub async fn recent<'e>(
    executor: impl PgExecutor<'e>,
    limit: i64,
) -> Result<Vec<ResetLogEntry>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM ranking_reset_log ORDER BY reset_date DESC LIMIT $1")
        .bind(limit)
        .fetch_all(executor)
        .await
}
