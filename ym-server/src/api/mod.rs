//! HTTP routes

pub mod cooldowns;
pub mod health;
pub mod payments;
pub mod ranking;
pub mod test_support;

use axum::Router;
use axum::body::Bytes;
use http::{HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use shared::error::{AppError, ErrorCode};
use shared::ApiResponse;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::state::AppState;

/// Handler result: success envelope or mapped error
pub type ApiResult<T> = Result<ApiResponse<T>, ServiceError>;

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Build the application with every route and middleware
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .merge(health::router())
        .merge(ranking::router())
        .merge(cooldowns::router())
        .merge(payments::router());

    if state.test_endpoints_enabled {
        tracing::warn!("Test endpoints enabled under /api/v1/test");
        router = router.merge(test_support::router());
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(
                    HeaderName::from_static(REQUEST_ID_HEADER),
                    XRequestId,
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    REQUEST_ID_HEADER,
                )))
                .layer(TraceLayer::new_for_http())
                // Preflight answers 200 for every route
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Parse an optional JSON body; an empty body yields `T::default()`
pub(crate) fn parse_json_body<T>(body: &Bytes) -> Result<T, AppError>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        AppError::with_message(ErrorCode::InvalidFormat, format!("Invalid JSON body: {e}"))
    })
}
