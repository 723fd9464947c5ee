//! Test fixtures, mounted only with `ENABLE_TEST_ENDPOINTS`
//!
//! `GET|POST /api/v1/test/create-cooldown` stages what a reset would leave
//! behind for one user: a cooldown window and a pending payment at the
//! position's prize, written in one transaction. Parameters come from the
//! query string, overridden by a JSON body: `user_id` (required), `position`
//! (default 1), `hours` (default 24).

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::Router;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{PendingPayment, RankingCooldown};
use shared::util::now_millis;
use shared::ApiResponse;

use super::{ApiResult, parse_json_body};
use crate::db::cooldowns::{self, CooldownWindow};
use crate::db::payments::{self, NewPayment};
use crate::db::users;
use crate::ranking::ResetPolicy;
use crate::state::AppState;
use crate::time;

const DEFAULT_POSITION: i32 = 1;
const DEFAULT_HOURS: i32 = 24;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/v1/test/create-cooldown",
        get(create_cooldown).post(create_cooldown),
    )
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateCooldownParams {
    pub user_id: Option<i64>,
    pub position: Option<i32>,
    pub hours: Option<i32>,
}

impl CreateCooldownParams {
    fn or(self, fallback: Self) -> Self {
        Self {
            user_id: self.user_id.or(fallback.user_id),
            position: self.position.or(fallback.position),
            hours: self.hours.or(fallback.hours),
        }
    }

    /// `(user_id, position, hours)` after defaults and range checks
    fn validate(&self) -> Result<(i64, i32, i32), AppError> {
        let user_id = self.user_id.ok_or_else(|| AppError::required("user_id"))?;
        let position = self.position.unwrap_or(DEFAULT_POSITION);
        if position < 1 {
            return Err(AppError::new(ErrorCode::InvalidPosition).with_detail("position", position));
        }
        let hours = self.hours.unwrap_or(DEFAULT_HOURS);
        if hours < 1 {
            return Err(
                AppError::with_message(ErrorCode::ValueOutOfRange, "hours must be at least 1")
                    .with_detail("field", "hours"),
            );
        }
        Ok((user_id, position, hours))
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedCooldown {
    pub data: StagedPayout,
}

#[derive(Debug, Serialize)]
pub struct StagedPayout {
    pub user_id: i64,
    pub user_name: String,
    pub eligible_now: bool,
    pub cooldown: RankingCooldown,
    pub pending_payment: PendingPayment,
}

/// GET|POST /api/v1/test/create-cooldown
pub async fn create_cooldown(
    State(state): State<AppState>,
    Query(query): Query<CreateCooldownParams>,
    body: Bytes,
) -> ApiResult<CreatedCooldown> {
    let body = parse_json_body::<CreateCooldownParams>(&body)?;
    let (user_id, position, hours) = body.or(query).validate()?;

    let mut tx = state.pool.begin().await?;

    let user = users::find_summary(&mut *tx, user_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound).with_detail("user_id", user_id))?;

    let policy = ResetPolicy::load(&mut *tx).await?;
    let prize_amount = policy.rule(position).map_or(Decimal::ZERO, |r| r.prize);

    let now = now_millis();
    let reset_date = Some(time::business_date(now, state.tz));
    let cooldown = cooldowns::extend(
        &mut *tx,
        &CooldownWindow {
            user_id,
            position,
            hours,
            prize_amount,
            reset_date,
        },
        now,
    )
    .await?;
    let pending_payment = payments::insert_pending(
        &mut *tx,
        &NewPayment {
            user_id,
            position,
            amount: prize_amount,
            pix_key: user.pix_key.clone(),
            reset_date,
        },
        now,
    )
    .await?;
    let eligible_now = cooldowns::is_eligible(&mut *tx, user_id, position, now).await?;
    tx.commit().await?;

    tracing::info!(
        user_id,
        position,
        hours,
        payment_id = pending_payment.id,
        "Test cooldown and payment created"
    );

    Ok(ApiResponse::success_with_message(
        "Cooldown created",
        CreatedCooldown {
            data: StagedPayout {
                user_id,
                user_name: user.name,
                eligible_now,
                cooldown,
                pending_payment,
            },
        },
    ))
}
