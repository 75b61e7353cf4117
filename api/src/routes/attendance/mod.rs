//! `/attendance` single-mark endpoints.

use axum::{Router, routing::post};

use crate::state::AppState;

mod post;

pub use post::{record_attendance, record_core_attendance};

pub fn attendance_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(record_attendance))
        .route("/core", post(record_core_attendance))
}
