//! Payment settlement endpoints (token-guarded)

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::Router;
use http::HeaderMap;
use serde::Deserialize;
use shared::error::AppError;
use shared::ApiResponse;

use super::ranking::TokenParams;
use super::{ApiResult, parse_json_body};
use crate::settlement::{
    self, PaymentIdsInput, PaymentSelection, PendingPage, PendingQuery, PendingQueryParams,
    SettlementReport,
};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/payments/pending", get(list_pending))
        .route("/api/v1/payments/complete", post(complete_payments))
        .route("/api/v1/payments/fail", post(fail_payments))
}

/// GET /api/v1/payments/pending
pub async fn list_pending(
    State(state): State<AppState>,
    Query(params): Query<PendingQueryParams>,
    headers: HeaderMap,
) -> ApiResult<PendingPage> {
    state
        .settlement_token
        .verify(None, params.token.as_deref(), &headers)?;

    let query = PendingQuery::from_params(&params)?;
    let page = settlement::list_pending(&state.pool, query).await?;
    Ok(ApiResponse::success(page))
}

#[derive(Debug, Default, Deserialize)]
pub struct CompleteRequest {
    pub token: Option<String>,
    pub payment_ids: Option<PaymentIdsInput>,
    pub transaction_id: Option<String>,
}

/// POST /api/v1/payments/complete
pub async fn complete_payments(
    State(state): State<AppState>,
    Query(query): Query<TokenParams>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<SettlementReport> {
    let req = parse_json_body::<CompleteRequest>(&body);
    let body_token = req.as_ref().ok().and_then(|r| r.token.as_deref());
    state
        .settlement_token
        .verify(body_token, query.token.as_deref(), &headers)?;

    let req = req?;
    let selection = PaymentSelection::parse(req.payment_ids)?;
    let report =
        settlement::complete_payments(&state.pool, &selection, req.transaction_id.as_deref())
            .await?;

    Ok(ApiResponse::success_with_message(
        format!("{} payment(s) marked as completed", report.updated_count),
        report,
    ))
}

#[derive(Debug, Default, Deserialize)]
pub struct FailRequest {
    pub token: Option<String>,
    pub payment_ids: Option<PaymentIdsInput>,
    pub error_message: Option<String>,
}

/// POST /api/v1/payments/fail
pub async fn fail_payments(
    State(state): State<AppState>,
    Query(query): Query<TokenParams>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<SettlementReport> {
    let req = parse_json_body::<FailRequest>(&body);
    let body_token = req.as_ref().ok().and_then(|r| r.token.as_deref());
    state
        .settlement_token
        .verify(body_token, query.token.as_deref(), &headers)?;

    let req = req?;
    let selection = PaymentSelection::parse(req.payment_ids)?;
    let error_message = req
        .error_message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| AppError::required("error_message"))?;

    let report = settlement::fail_payments(&state.pool, &selection, error_message).await?;

    Ok(ApiResponse::success_with_message(
        format!("{} payment(s) marked as failed", report.updated_count),
        report,
    ))
}
