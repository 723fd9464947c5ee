//! Ranking reset endpoints
//!
//! - `POST /admin/ranking/reset`: operator trigger (admin panel, trusted)
//! - `GET /admin/ranking/resets`: reset history and today's guard state
//! - `POST /api/v1/reset/ranking`: token-guarded trigger for external cron

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use chrono::NaiveDate;
use http::HeaderMap;
use serde::{Deserialize, Serialize};
use shared::error::ErrorCode;
use shared::models::{ResetLogEntry, ResetTrigger};
use shared::util::now_millis;
use shared::ApiResponse;

use super::{ApiResult, parse_json_body};
use crate::db::reset_log;
use crate::error::ServiceError;
use crate::ranking::{GuardState, ResetOutcome, ResetReport, execute_daily_reset};
use crate::state::AppState;
use crate::time;

const DEFAULT_HISTORY_LIMIT: i64 = 30;
const MAX_HISTORY_LIMIT: i64 = 365;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/ranking/reset", post(admin_reset))
        .route("/admin/ranking/resets", get(reset_history))
        .route("/api/v1/reset/ranking", post(scheduled_reset))
}

#[derive(Serialize)]
struct CompletedReset {
    skipped: bool,
    #[serde(flatten)]
    report: ResetReport,
}

#[derive(Serialize)]
struct SkippedReset {
    skipped: bool,
    reset_date: NaiveDate,
}

fn reset_response(outcome: ResetOutcome) -> Response {
    match outcome {
        ResetOutcome::Completed(report) => ApiResponse::success_with_message(
            "Ranking reset completed",
            CompletedReset {
                skipped: false,
                report,
            },
        )
        .into_response(),
        ResetOutcome::Skipped { reset_date } => ApiResponse::success_with_message(
            ErrorCode::ResetAlreadyRun.message(),
            SkippedReset {
                skipped: true,
                reset_date,
            },
        )
        .into_response(),
    }
}

async fn run(state: &AppState, trigger: ResetTrigger) -> Result<Response, ServiceError> {
    let outcome = execute_daily_reset(&state.pool, &state.reset_guard, state.tz, trigger).await?;
    Ok(reset_response(outcome))
}

/// POST /admin/ranking/reset
pub async fn admin_reset(State(state): State<AppState>) -> Result<Response, ServiceError> {
    run(&state, ResetTrigger::Admin).await
}

#[derive(Debug, Default, Deserialize)]
pub struct TokenParams {
    pub token: Option<String>,
}

/// POST /api/v1/reset/ranking
pub async fn scheduled_reset(
    State(state): State<AppState>,
    Query(query): Query<TokenParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ServiceError> {
    let body = parse_json_body::<TokenParams>(&body);
    let body_token = body.as_ref().ok().and_then(|b| b.token.as_deref());
    state
        .settlement_token
        .verify(body_token, query.token.as_deref(), &headers)?;

    run(&state, ResetTrigger::Scheduled).await
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct ResetHistory {
    pub guard_enabled: bool,
    pub today: NaiveDate,
    pub today_state: GuardState,
    pub resets: Vec<ResetLogEntry>,
}

/// GET /admin/ranking/resets
pub async fn reset_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> ApiResult<ResetHistory> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);
    let today = time::business_date(now_millis(), state.tz);

    let today_state = state.reset_guard.state(&state.pool, today).await?;
    let resets = reset_log::recent(&state.pool, limit).await?;

    Ok(ApiResponse::success(ResetHistory {
        guard_enabled: state.reset_guard.is_enabled(),
        today,
        today_state,
        resets,
    }))
}
