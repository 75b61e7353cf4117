//! `/sessions` endpoints: lifecycle, batch marking and session reports.

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

mod get;
mod post;

pub use get::{get_session_status, list_session_attendance, list_sessions};
pub use post::{create_session, lock_session, record_batch};

pub fn sessions_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sessions).post(create_session))
        .route("/{session_id}/status", get(get_session_status))
        .route("/{session_id}/lock", post(lock_session))
        .route("/{session_id}/attendance", get(list_session_attendance))
        .route("/{session_id}/attendance/batch", post(record_batch))
}
