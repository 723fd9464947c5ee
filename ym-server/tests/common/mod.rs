//! Fixtures for the database tests
//!
//! These tests run against a real PostgreSQL through `#[sqlx::test]` and are
//! ignored by default: `DATABASE_URL=... cargo test -- --ignored`.

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use shared::models::{PendingPayment, ResetTrigger};
use sqlx::PgPool;
use ym_server::db::payments::{self, NewPayment};
use ym_server::ranking::engine::{self, ResetOutcome};
use ym_server::ranking::ResetGuard;

pub const SP: Tz = chrono_tz::America::Sao_Paulo;
pub const HOUR: i64 = 60 * 60 * 1000;

/// 2026-10-18 15:00 in Sao Paulo (18:00 UTC)
pub fn now() -> i64 {
    utc_millis(2026, 10, 18, 18, 0)
}

pub fn utc_millis(y: i32, m: u32, d: u32, h: u32, min: u32) -> i64 {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0)
        .unwrap()
        .timestamp_millis()
}

pub async fn insert_user(pool: &PgPool, name: &str, daily_points: i64, created_at: i64) -> i64 {
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO users (name, email, pix_key, daily_points, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(format!("{name}@example.com"))
    .bind(format!("pix-{name}"))
    .bind(daily_points)
    .bind(created_at)
    .fetch_one(pool)
    .await
    .unwrap();
    id
}

pub async fn insert_spin(pool: &PgPool, user_id: i64, created_at: i64) {
    sqlx::query("INSERT INTO spin_history (user_id, outcome, created_at) VALUES ($1, 'win', $2)")
        .bind(user_id)
        .bind(created_at)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn daily_points(pool: &PgPool, user_id: i64) -> i64 {
    let (points,): (i64,) = sqlx::query_as("SELECT daily_points FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .unwrap();
    points
}

pub async fn count(pool: &PgPool, table: &str) -> i64 {
    let (n,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap();
    n
}

pub async fn payments_for(pool: &PgPool, user_id: i64) -> Vec<PendingPayment> {
    sqlx::query_as("SELECT * FROM pending_payments WHERE user_id = $1 ORDER BY id")
        .bind(user_id)
        .fetch_all(pool)
        .await
        .unwrap()
}

pub async fn pending_payment(pool: &PgPool, user_id: i64, cents: i64, created_at: i64) -> PendingPayment {
    payments::insert_pending(
        pool,
        &NewPayment {
            user_id,
            position: 1,
            amount: Decimal::new(cents, 2),
            pix_key: Some("pix".into()),
            reset_date: None,
        },
        created_at,
    )
    .await
    .unwrap()
}

pub async fn reset_at(pool: &PgPool, guard_enabled: bool, now: i64) -> ResetOutcome {
    engine::execute_daily_reset_at(
        pool,
        &ResetGuard::new(guard_enabled),
        SP,
        ResetTrigger::Admin,
        now,
    )
    .await
    .unwrap()
}
