//! `/pics` registry endpoints.

use axum::{
    Router,
    routing::{delete, get},
};

use crate::state::AppState;

mod delete;
mod get;
mod post;
mod put;

pub use delete::delete_pic;
pub use get::{list_pic_members, list_pics};
pub use post::create_pic;
pub use put::assign_members;

pub fn pics_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_pics).post(create_pic))
        .route("/{pic_id}", delete(delete_pic))
        .route("/{pic_id}/members", get(list_pic_members).put(assign_members))
}
