//! Ranking Cooldown Model

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Cooldown window for one `(user_id, position)` pair
///
/// While `cooldown_until > now` the pair cannot earn another payout.
/// At most one row exists per pair; a new payout overwrites the window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RankingCooldown {
    pub id: i64,
    pub user_id: i64,
    pub position: i32,
    /// Prize paid when the window was opened
    pub prize_amount: Decimal,
    /// Window length in hours
    pub cooldown_hours: i32,
    /// Unix millis (exclusive end of the window)
    pub cooldown_until: i64,
    pub reset_date: Option<NaiveDate>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl RankingCooldown {
    /// Whether the window still blocks payouts at `now` (Unix millis)
    pub fn is_active(&self, now: i64) -> bool {
        cooldown_blocks(self.cooldown_until, now)
    }

    /// Remaining milliseconds, zero once expired
    pub fn remaining_millis(&self, now: i64) -> i64 {
        (self.cooldown_until - now).max(0)
    }
}

/// A window blocks iff it ends strictly after `now`.
pub fn cooldown_blocks(cooldown_until: i64, now: i64) -> bool {
    cooldown_until > now
}
