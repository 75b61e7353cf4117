use axum::{Extension, Json, extract::State, http::StatusCode};
use serde::Deserialize;
use services::pic_service::PicService;
use validator::Validate;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{PicResponse, bad_request, format_validation_errors, service_error};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePicRequest {
    #[validate(length(
        min = 1,
        max = 150,
        message = "PIC name must be between 1 and 150 characters"
    ))]
    pub name: String,
}

/// POST /api/pics
///
/// ### Responses
/// - `201 Created`
/// - `409 Conflict` with `duplicate_name`
pub async fn create_pic(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<CreatePicRequest>,
) -> (StatusCode, Json<ApiResponse<PicResponse>>) {
    if let Err(validation_errors) = req.validate() {
        return bad_request(format_validation_errors(&validation_errors));
    }

    match PicService::create_pic(state.db(), claims.sub, &req.name).await {
        Ok(pic) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(PicResponse::from(pic), "PIC created")),
        ),
        Err(e) => service_error(e),
    }
}
