//! Router tests that never reach the database
//!
//! The pool connects lazily to an unreachable address, so any request that
//! gets past authentication and validation would fail; these tests only
//! cover the paths that reject earlier.

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use ym_server::{AppState, Config, api};

const TOKEN: &str = "test-reset-token";

fn app_with(test_endpoints: bool) -> Router {
    let flag = if test_endpoints { "true" } else { "false" };
    let config = Config::from_vars(|name| match name {
        "RESET_TOKEN" => Some(TOKEN.to_string()),
        "ENABLE_TEST_ENDPOINTS" => Some(flag.to_string()),
        _ => None,
    })
    .unwrap();

    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(200))
        .connect_lazy("postgres://ym@127.0.0.1:1/unreachable")
        .unwrap();

    api::build_router(AppState::with_pool(pool, &config))
}

fn app() -> Router {
    app_with(false)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, http::HeaderMap, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, headers, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health() {
    let (status, headers, body) = send(app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_pending_requires_token() {
    let (status, _, body) = send(app(), get("/api/v1/payments/pending")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body,
        json!({"success": false, "code": 1004, "error": "Invalid token"})
    );
}

#[tokio::test]
async fn test_wrong_token_gets_same_error_as_missing() {
    let (status, _, body) = send(app(), get("/api/v1/payments/pending?token=guess")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token");

    let request = Request::builder()
        .uri("/api/v1/payments/pending")
        .header("authorization", format!("Bearer {}", TOKEN.to_uppercase()))
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = send(app(), request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_pending_rejects_invalid_status_and_offset() {
    let uri = format!("/api/v1/payments/pending?token={TOKEN}&status=refunded");
    let (status, _, body) = send(app(), get(&uri)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5003);

    let uri = format!("/api/v1/payments/pending?token={TOKEN}&offset=-5");
    let (status, _, body) = send(app(), get(&uri)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 8);
}

#[tokio::test]
async fn test_complete_requires_token_before_validation() {
    let (status, _, body) = send(
        app(),
        post_json("/api/v1/payments/complete", json!({"token": "nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1004);
}

#[tokio::test]
async fn test_complete_rejects_missing_or_empty_selection() {
    let (status, _, body) = send(
        app(),
        post_json("/api/v1/payments/complete", json!({"token": TOKEN})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5004);
    assert_eq!(body["success"], false);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/payments/complete")
        .header("authorization", format!("Bearer {TOKEN}"))
        .header("content-type", "application/json")
        .body(Body::from(json!({"payment_ids": []}).to_string()))
        .unwrap();
    let (status, _, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5004);
}

#[tokio::test]
async fn test_complete_rejects_malformed_json() {
    let request = Request::builder()
        .method(Method::POST)
        .uri(format!("/api/v1/payments/complete?token={TOKEN}"))
        .header("content-type", "application/json")
        .body(Body::from("{payment_ids"))
        .unwrap();
    let (status, _, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6);
}

#[tokio::test]
async fn test_fail_requires_error_message() {
    let (status, _, body) = send(
        app(),
        post_json(
            "/api/v1/payments/fail",
            json!({"token": TOKEN, "payment_ids": [1]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 7);
    assert_eq!(body["error"], "error_message is required");
}

#[tokio::test]
async fn test_scheduled_reset_requires_token() {
    let (status, _, body) = send(app(), post_json("/api/v1/reset/ranking", json!({}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1004);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/reset/ranking")
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = send(app(), request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cooldown_admin_requires_token() {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/api/v1/ranking/cooldowns/1")
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = send(app(), request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = send(app(), get("/api/v1/ranking/cooldowns/1")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_preflight_answers_ok() {
    for uri in ["/api/v1/payments/complete", "/admin/ranking/reset"] {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri(uri)
            .header("origin", "https://admin.example.com")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();
        let (status, headers, _) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert!(headers.contains_key("access-control-allow-origin"), "{uri}");
    }
}

#[tokio::test]
async fn test_test_endpoints_hidden_by_default() {
    let (status, _, _) = send(app(), get("/api/v1/test/create-cooldown?user_id=1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_test_endpoint_validates_params_when_enabled() {
    let (status, _, body) = send(app_with(true), get("/api/v1/test/create-cooldown")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 7);

    let (status, _, body) = send(
        app_with(true),
        post_json(
            "/api/v1/test/create-cooldown",
            json!({"user_id": 1, "position": 0}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 3005);
}
