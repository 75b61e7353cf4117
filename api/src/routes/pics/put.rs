use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use services::pic_service::{PicAssignment, PicService};
use validator::Validate;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{bad_request, format_validation_errors, service_error};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct AssignMembersRequest {
    #[validate(length(min = 1, message = "Request must include a non-empty list of member_ids"))]
    pub member_ids: Vec<i64>,
    pub marker_id: Option<i64>,
}

/// PUT /api/pics/{pic_id}/members
///
/// Moves the listed users into the PIC and makes `marker_id` its only
/// delegated marker. The previous marker loses the flag in the same
/// transaction.
///
/// ### Request Body
/// ```json
/// { "member_ids": [4, 5, 6], "marker_id": 5 }
/// ```
pub async fn assign_members(
    State(state): State<AppState>,
    Path(pic_id): Path<i64>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<AssignMembersRequest>,
) -> (StatusCode, Json<ApiResponse<PicAssignment>>) {
    if let Err(validation_errors) = req.validate() {
        return bad_request(format_validation_errors(&validation_errors));
    }

    match PicService::assign_marker(state.db(), claims.sub, pic_id, &req.member_ids, req.marker_id)
        .await
    {
        Ok(assignment) => (
            StatusCode::OK,
            Json(ApiResponse::success(assignment, "PIC members assigned")),
        ),
        Err(e) => service_error(e),
    }
}
