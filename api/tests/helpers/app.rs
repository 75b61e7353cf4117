use std::sync::Arc;

use api::{auth::generate_jwt, routes::routes, state::AppState};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{TimeZone, Utc};
use db::test_utils::setup_test_db;
use serde_json::Value;
use services::clock::FixedClock;
use tower::ServiceExt;
use util::config::AppConfig;

pub const TEST_JWT_SECRET: &str = "rohis-test-secret";

/// Router mounted under `/api` over a fresh in-memory database, with the
/// clock pinned to 2026-01-16 13:00 WIB.
pub async fn make_test_app() -> (Router, AppState) {
    AppConfig::set_jwt_secret(TEST_JWT_SECRET);
    AppConfig::set_jwt_duration_minutes(60u64);

    let db = setup_test_db().await;
    let clock = FixedClock::at(Utc.with_ymd_and_hms(2026, 1, 16, 6, 0, 0).unwrap());
    let app_state = AppState::with_clock(db, Arc::new(clock));

    let router = Router::new().nest("/api", routes(app_state.clone()));
    (router, app_state)
}

pub fn token_for(user_id: i64) -> String {
    generate_jwt(user_id).0
}

/// Sends one request and returns the status with the parsed JSON body.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let req = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
