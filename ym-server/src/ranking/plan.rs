//! Payout planning
//!
//! Pure: given the pre-reset standings, the pairs still in cooldown and the
//! policy, decide who gets paid. A position held by a user in cooldown for
//! that position is skipped; the next user does not move up.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::Serialize;

use super::policy::ResetPolicy;
use crate::db::users::RankedUser;

/// A ranked user at their 1-based position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub user_id: i64,
    pub position: i32,
    pub daily_points: i64,
    pub pix_key: Option<String>,
}

/// Assign positions 1.. in the order the ranking query returned
pub fn standings(ranked: Vec<RankedUser>) -> Vec<Standing> {
    ranked
        .into_iter()
        .zip(1..)
        .map(|(user, position)| Standing {
            user_id: user.id,
            position,
            daily_points: user.daily_points,
            pix_key: user.pix_key,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payout {
    pub user_id: i64,
    pub position: i32,
    pub amount: Decimal,
    pub cooldown_hours: i32,
    #[serde(skip)]
    pub pix_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedPosition {
    pub user_id: i64,
    pub position: i32,
    pub reason: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayoutPlan {
    pub payouts: Vec<Payout>,
    pub skipped: Vec<SkippedPosition>,
}

/// Build the plan. `in_cooldown` holds `(user_id, position)` pairs whose
/// window is still open.
pub fn plan_payouts(
    standings: &[Standing],
    in_cooldown: &HashSet<(i64, i32)>,
    policy: &ResetPolicy,
) -> PayoutPlan {
    let mut plan = PayoutPlan::default();

    for standing in standings {
        let Some(rule) = policy.rule(standing.position) else {
            continue;
        };

        if in_cooldown.contains(&(standing.user_id, standing.position)) {
            plan.skipped.push(SkippedPosition {
                user_id: standing.user_id,
                position: standing.position,
                reason: "cooldown_active",
            });
            continue;
        }

        plan.payouts.push(Payout {
            user_id: standing.user_id,
            position: standing.position,
            amount: rule.prize,
            cooldown_hours: rule.cooldown_hours,
            pix_key: standing.pix_key.clone(),
        });
    }

    plan
}
