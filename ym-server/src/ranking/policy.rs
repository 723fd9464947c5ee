//! Payout policy
//!
//! Prize and cooldown window per ranking position, read once per reset from
//! `system_settings`:
//!
//! - `ranking_payout_positions`: number of paid positions (1..=100)
//! - `ranking_prize_{n}`: prize for position `n`
//! - `ranking_cooldown_hours_{n}`: cooldown window for position `n`
//!
//! Missing or malformed values fall back to the defaults below.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::PgExecutor;

use crate::db::settings;

pub const PAYOUT_POSITIONS_KEY: &str = "ranking_payout_positions";
const SETTINGS_PREFIX: &str = "ranking_";
const MAX_PAYOUT_POSITIONS: usize = 100;

/// Prize in cents per position, top first
const DEFAULT_PRIZE_CENTS: [i64; 10] = [1000, 500, 250, 100, 100, 100, 100, 100, 100, 100];
const DEFAULT_COOLDOWN_HOURS: [i32; 10] = [24, 24, 24, 2, 2, 2, 2, 2, 2, 2];
/// Positions past the default table
const FALLBACK_PRIZE_CENTS: i64 = 100;
const FALLBACK_COOLDOWN_HOURS: i32 = 2;

/// Prize and window for one position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionRule {
    pub position: i32,
    pub prize: Decimal,
    pub cooldown_hours: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetPolicy {
    rules: Vec<PositionRule>,
}

impl Default for ResetPolicy {
    fn default() -> Self {
        Self::from_settings(&HashMap::new())
    }
}

impl ResetPolicy {
    /// Load from `system_settings`
    pub async fn load<'e>(executor: impl PgExecutor<'e>) -> Result<Self, sqlx::Error> {
        let values = settings::get_prefixed(executor, SETTINGS_PREFIX).await?;
        Ok(Self::from_settings(&values))
    }

    pub fn from_settings(values: &HashMap<String, String>) -> Self {
        let positions = match values.get(PAYOUT_POSITIONS_KEY) {
            None => DEFAULT_PRIZE_CENTS.len(),
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if (1..=MAX_PAYOUT_POSITIONS).contains(&n) => n,
                _ => {
                    tracing::warn!(value = %raw, "Invalid {}, using default", PAYOUT_POSITIONS_KEY);
                    DEFAULT_PRIZE_CENTS.len()
                }
            },
        };

        let rules = (1..=positions)
            .map(|n| {
                let idx = n - 1;
                let default_prize = Decimal::new(
                    DEFAULT_PRIZE_CENTS.get(idx).copied().unwrap_or(FALLBACK_PRIZE_CENTS),
                    2,
                );
                let default_hours = DEFAULT_COOLDOWN_HOURS
                    .get(idx)
                    .copied()
                    .unwrap_or(FALLBACK_COOLDOWN_HOURS);

                let prize_key = format!("ranking_prize_{n}");
                let prize = match values.get(&prize_key) {
                    None => default_prize,
                    Some(raw) => match raw.trim().parse::<Decimal>() {
                        Ok(p) if !p.is_sign_negative() => p.round_dp(2),
                        _ => {
                            tracing::warn!(key = %prize_key, value = %raw, "Invalid prize, using default");
                            default_prize
                        }
                    },
                };

                let hours_key = format!("ranking_cooldown_hours_{n}");
                let cooldown_hours = match values.get(&hours_key) {
                    None => default_hours,
                    Some(raw) => match raw.trim().parse::<i32>() {
                        Ok(h) if h > 0 => h,
                        _ => {
                            tracing::warn!(key = %hours_key, value = %raw, "Invalid cooldown, using default");
                            default_hours
                        }
                    },
                };

                PositionRule {
                    position: n as i32,
                    prize,
                    cooldown_hours,
                }
            })
            .collect();

        Self { rules }
    }

    /// Number of paid positions
    pub fn payout_positions(&self) -> usize {
        self.rules.len()
    }

    /// Rule for a 1-based position, `None` past the paid range
    pub fn rule(&self, position: i32) -> Option<&PositionRule> {
        usize::try_from(position)
            .ok()
            .and_then(|p| p.checked_sub(1))
            .and_then(|idx| self.rules.get(idx))
    }

    pub fn rules(&self) -> &[PositionRule] {
        &self.rules
    }
}
