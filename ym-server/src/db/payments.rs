//! Pending payment storage

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::{PaymentStatus, PendingPayment};
use sqlx::PgExecutor;

/// Payment to insert in `pending`
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub user_id: i64,
    pub position: i32,
    pub amount: Decimal,
    pub pix_key: Option<String>,
    pub reset_date: Option<NaiveDate>,
}

/// Payment joined with the owning user's name and email
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PaymentView {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub payment: PendingPayment,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
}

/// Count and sum for one status
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StatusTotals {
    pub status: PaymentStatus,
    pub count: i64,
    pub total_amount: Decimal,
}

pub async fn insert_pending<'e>(
    executor: impl PgExecutor<'e>,
    payment: &NewPayment,
    now: i64,
) -> Result<PendingPayment, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO pending_payments
            (user_id, position, amount, pix_key, status, reset_date, created_at, updated_at)
        VALUES ($1, $2, $3, $4, 'pending', $5, $6, $6)
        RETURNING *
        "#,
    )
    .bind(payment.user_id)
    .bind(payment.position)
    .bind(payment.amount)
    .bind(&payment.pix_key)
    .bind(payment.reset_date)
    .bind(now)
    .fetch_one(executor)
    .await
}

/// One page of payments in `status`, oldest first
pub async fn list_by_status<'e>(
    executor: impl PgExecutor<'e>,
    status: PaymentStatus,
    limit: i64,
    offset: i64,
) -> Result<Vec<PaymentView>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT p.*, u.name AS user_name, u.email AS user_email
        FROM pending_payments p
        LEFT JOIN users u ON u.id = p.user_id
        WHERE p.status = $1
        ORDER BY p.created_at ASC, p.id ASC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(status)
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await
}

/// Count and sum over every payment in `status`
pub async fn totals_for_status<'e>(
    executor: impl PgExecutor<'e>,
    status: PaymentStatus,
) -> Result<(i64, Decimal), sqlx::Error> {
    sqlx::query_as(
        "SELECT COUNT(*), COALESCE(SUM(amount), 0) FROM pending_payments WHERE status = $1",
    )
    .bind(status)
    .fetch_one(executor)
    .await
}

/// Per-status count and sum; statuses with no rows are absent
pub async fn statistics<'e>(executor: impl PgExecutor<'e>) -> Result<Vec<StatusTotals>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT status, COUNT(*) AS count, COALESCE(SUM(amount), 0) AS total_amount
        FROM pending_payments
        GROUP BY status
        ORDER BY status
        "#,
    )
    .fetch_all(executor)
    .await
}

/// `pending → completed` for the selected rows (all pending when `ids` is `None`).
///
/// Rows already terminal are never matched. `transaction_id` replaces the
/// stored value only when supplied.
pub async fn complete<'e>(
    executor: impl PgExecutor<'e>,
    ids: Option<&[i64]>,
    transaction_id: Option<&str>,
    now: i64,
) -> Result<Vec<PendingPayment>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE pending_payments
        SET status = 'completed',
            transaction_id = COALESCE($1, transaction_id),
            updated_at = $2
        WHERE status = 'pending' AND ($3::BIGINT[] IS NULL OR id = ANY($3))
        RETURNING *
        "#,
    )
    .bind(transaction_id)
    .bind(now)
    .bind(ids)
    .fetch_all(executor)
    .await
}

/// `pending → failed` for the selected rows, recording why
pub async fn fail<'e>(
    executor: impl PgExecutor<'e>,
    ids: Option<&[i64]>,
    error_message: &str,
    now: i64,
) -> Result<Vec<PendingPayment>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE pending_payments
        SET status = 'failed',
            error_message = $1,
            updated_at = $2
        WHERE status = 'pending' AND ($3::BIGINT[] IS NULL OR id = ANY($3))
        RETURNING *
        "#,
    )
    .bind(error_message)
    .bind(now)
    .bind(ids)
    .fetch_all(executor)
    .await
}
