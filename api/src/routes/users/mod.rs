use axum::{Router, routing::get};

use crate::state::AppState;

mod get;

pub use get::get_user_attendance;

pub fn users_routes() -> Router<AppState> {
    Router::new().route("/{user_id}/attendance", get(get_user_attendance))
}
