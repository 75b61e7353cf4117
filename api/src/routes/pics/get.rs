use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use services::pic_service::PicService;

use crate::response::ApiResponse;
use crate::routes::common::{PicResponse, UserResponse, service_error};
use crate::state::AppState;

/// GET /api/pics
pub async fn list_pics(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<Vec<PicResponse>>>) {
    match PicService::list_pics(state.db()).await {
        Ok(pics) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                pics.into_iter().map(PicResponse::from).collect(),
                "PICs retrieved",
            )),
        ),
        Err(e) => service_error(e),
    }
}

/// GET /api/pics/{pic_id}/members
///
/// Members ordered by name; the delegated marker has
/// `can_mark_attendance: true`.
pub async fn list_pic_members(
    State(state): State<AppState>,
    Path(pic_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Vec<UserResponse>>>) {
    match PicService::members(state.db(), pic_id).await {
        Ok(members) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                members.into_iter().map(UserResponse::from).collect(),
                "PIC members retrieved",
            )),
        ),
        Err(e) => service_error(e),
    }
}
