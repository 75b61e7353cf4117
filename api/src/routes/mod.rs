//! HTTP route entry point for `/api/...`.
//!
//! - `/health` → health check (public)
//! - `/attendance` → single regular and core marks
//! - `/sessions` → session lifecycle, batch marking, session reports
//! - `/users` → per-user attendance history
//! - `/pics` → PIC registry and marker delegation
//!
//! Every group except `/health` requires a bearer token. Authorization
//! beyond that is decided by the services layer.

use axum::{Router, middleware::from_fn};

use crate::auth::guards::allow_authenticated;
use crate::routes::{
    attendance::attendance_routes, health::health_routes, pics::pics_routes,
    sessions::sessions_routes, users::users_routes,
};
use crate::state::AppState;

pub mod attendance;
pub mod common;
pub mod health;
pub mod pics;
pub mod sessions;
pub mod users;

pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest(
            "/attendance",
            attendance_routes().route_layer(from_fn(allow_authenticated)),
        )
        .nest(
            "/sessions",
            sessions_routes().route_layer(from_fn(allow_authenticated)),
        )
        .nest(
            "/users",
            users_routes().route_layer(from_fn(allow_authenticated)),
        )
        .nest("/pics", pics_routes().route_layer(from_fn(allow_authenticated)))
        .with_state(app_state)
}
