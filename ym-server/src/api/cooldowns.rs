//! Cooldown administration (token-guarded)
//!
//! - `GET /api/v1/ranking/cooldowns/{user_id}`: every window of a user
//! - `DELETE /api/v1/ranking/cooldowns/{user_id}`: drop them all

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::Router;
use http::HeaderMap;
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::models::RankingCooldown;
use shared::util::now_millis;
use shared::ApiResponse;

use super::ApiResult;
use super::ranking::TokenParams;
use crate::db::{cooldowns, users};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/v1/ranking/cooldowns/{user_id}",
        get(cooldown_status).delete(clear_cooldowns),
    )
}

#[derive(Debug, Serialize)]
pub struct CooldownView {
    #[serde(flatten)]
    pub cooldown: RankingCooldown,
    pub active: bool,
    pub remaining_seconds: i64,
}

impl CooldownView {
    pub fn at(cooldown: RankingCooldown, now: i64) -> Self {
        Self {
            active: cooldown.is_active(now),
            remaining_seconds: cooldown.remaining_millis(now) / 1000,
            cooldown,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CooldownStatus {
    pub user_id: i64,
    pub user_name: String,
    pub active_count: usize,
    pub cooldowns: Vec<CooldownView>,
}

#[derive(Debug, Serialize)]
pub struct ClearedCooldowns {
    pub user_id: i64,
    pub cleared: u64,
}

fn user_not_found(user_id: i64) -> AppError {
    AppError::new(ErrorCode::UserNotFound).with_detail("user_id", user_id)
}

/// GET /api/v1/ranking/cooldowns/{user_id}
pub async fn cooldown_status(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<TokenParams>,
    headers: HeaderMap,
) -> ApiResult<CooldownStatus> {
    state
        .settlement_token
        .verify(None, query.token.as_deref(), &headers)?;

    let user = users::find_summary(&state.pool, user_id)
        .await?
        .ok_or_else(|| user_not_found(user_id))?;

    let now = now_millis();
    let views: Vec<CooldownView> = cooldowns::for_user(&state.pool, user_id)
        .await?
        .into_iter()
        .map(|c| CooldownView::at(c, now))
        .collect();

    Ok(ApiResponse::success(CooldownStatus {
        user_id,
        user_name: user.name,
        active_count: views.iter().filter(|v| v.active).count(),
        cooldowns: views,
    }))
}

/// DELETE /api/v1/ranking/cooldowns/{user_id}
pub async fn clear_cooldowns(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<TokenParams>,
    headers: HeaderMap,
) -> ApiResult<ClearedCooldowns> {
    state
        .settlement_token
        .verify(None, query.token.as_deref(), &headers)?;

    if users::find_summary(&state.pool, user_id).await?.is_none() {
        return Err(user_not_found(user_id).into());
    }

    let cleared = cooldowns::clear_for_user(&state.pool, user_id).await?;
    tracing::info!(user_id, cleared, "Ranking cooldowns cleared");

    Ok(ApiResponse::success_with_message(
        format!("{cleared} cooldown(s) cleared"),
        ClearedCooldowns { user_id, cleared },
    ))
}
