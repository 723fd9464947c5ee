//! Cooldown tracker storage
//!
//! One row per `(user_id, position)`. A window blocks payouts for the pair
//! while `cooldown_until > now`; extending it overwrites the previous end.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::models::{RankingCooldown, cooldown_blocks};
use shared::util::HOUR_MILLIS;
use sqlx::PgExecutor;

/// New window to open for a pair
#[derive(Debug, Clone)]
pub struct CooldownWindow {
    pub user_id: i64,
    pub position: i32,
    pub hours: i32,
    pub prize_amount: Decimal,
    pub reset_date: Option<NaiveDate>,
}

impl CooldownWindow {
    /// Exclusive end of the window when opened at `now`
    pub fn until(&self, now: i64) -> i64 {
        now + i64::from(self.hours) * HOUR_MILLIS
    }
}

/// True iff the pair has no window or its window ended at or before `now`
pub async fn is_eligible<'e>(
    executor: impl PgExecutor<'e>,
    user_id: i64,
    position: i32,
    now: i64,
) -> Result<bool, sqlx::Error> {
    let until: Option<(i64,)> = sqlx::query_as(
        "SELECT cooldown_until FROM ranking_cooldowns WHERE user_id = $1 AND position = $2",
    )
    .bind(user_id)
    .bind(position)
    .fetch_optional(executor)
    .await?;

    Ok(match until {
        None => true,
        Some((until,)) => !cooldown_blocks(until, now),
    })
}

/// Pairs among `user_ids` whose window is still open at `now`
pub async fn active_pairs<'e>(
    executor: impl PgExecutor<'e>,
    user_ids: &[i64],
    now: i64,
) -> Result<Vec<(i64, i32)>, sqlx::Error> {
    if user_ids.is_empty() {
        return Ok(Vec::new());
    }
    sqlx::query_as(
        "SELECT user_id, position FROM ranking_cooldowns WHERE user_id = ANY($1) AND cooldown_until > $2",
    )
    .bind(user_ids)
    .bind(now)
    .fetch_all(executor)
    .await
}

/// Open (or reopen) the window for a pair, replacing any previous end
pub async fn extend<'e>(
    executor: impl PgExecutor<'e>,
    window: &CooldownWindow,
    now: i64,
) -> Result<RankingCooldown, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO ranking_cooldowns
            (user_id, position, prize_amount, cooldown_hours, cooldown_until, reset_date, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
        ON CONFLICT (user_id, position) DO UPDATE SET
            prize_amount = EXCLUDED.prize_amount,
            cooldown_hours = EXCLUDED.cooldown_hours,
            cooldown_until = EXCLUDED.cooldown_until,
            reset_date = EXCLUDED.reset_date,
            updated_at = EXCLUDED.updated_at
        RETURNING *
        "#,
    )
    .bind(window.user_id)
    .bind(window.position)
    .bind(window.prize_amount)
    .bind(window.hours)
    .bind(window.until(now))
    .bind(window.reset_date)
    .bind(now)
    .fetch_one(executor)
    .await
}

/// Every window recorded for a user, latest ending first
pub async fn for_user<'e>(
    executor: impl PgExecutor<'e>,
    user_id: i64,
) -> Result<Vec<RankingCooldown>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM ranking_cooldowns WHERE user_id = $1 ORDER BY cooldown_until DESC, position ASC",
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

/// Drop every window of a user. Returns rows deleted.
pub async fn clear_for_user<'e>(
    executor: impl PgExecutor<'e>,
    user_id: i64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM ranking_cooldowns WHERE user_id = $1")
        .bind(user_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_end_is_hours_after_now() {
        let window = CooldownWindow {
            user_id: 1,
            position: 4,
            hours: 2,
            prize_amount: Decimal::ONE,
            reset_date: None,
        };
        assert_eq!(window.until(1_000), 1_000 + 2 * HOUR_MILLIS);
    }
}
