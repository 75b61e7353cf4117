use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use services::pic_service::{PicDeletion, PicService};

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::service_error;
use crate::state::AppState;

/// DELETE /api/pics/{pic_id}
///
/// Admin only. Members are released (PIC and delegation cleared) and kept.
pub async fn delete_pic(
    State(state): State<AppState>,
    Path(pic_id): Path<i64>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> (StatusCode, Json<ApiResponse<PicDeletion>>) {
    match PicService::delete_pic(state.db(), claims.sub, pic_id).await {
        Ok(deletion) => (
            StatusCode::OK,
            Json(ApiResponse::success(deletion, "PIC deleted")),
        ),
        Err(e) => service_error(e),
    }
}
