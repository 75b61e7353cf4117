use axum::{Extension, Json, extract::State, http::StatusCode};
use db::models::attendance_record::AttendanceType;
use serde::Deserialize;
use services::attendance_service::{AttendanceService, MarkAttendance};
use validator::Validate;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{
    AttendanceRecordResponse, bad_request, format_validation_errors, parse_status, service_error,
};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct MarkAttendanceRequest {
    #[validate(range(min = 1, message = "session_id must be a positive id"))]
    pub session_id: i64,
    #[validate(range(min = 1, message = "user_id must be a positive id"))]
    pub user_id: i64,
    #[validate(length(min = 1, message = "status is required"))]
    pub status: String,
}

/// POST /api/attendance
///
/// Records a regular mark.
///
/// ### Request Body
/// ```json
/// { "session_id": 3, "user_id": 12, "status": "present" }
/// ```
///
/// ### Responses
/// - `201 Created` with the stored record (timestamp at UTC+7)
/// - `400 Bad Request` on malformed input
/// - `403 Forbidden` with `session_locked` or `forbidden`
/// - `404 Not Found` for an unknown session or user
/// - `409 Conflict` with `already_marked`
pub async fn record_attendance(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<MarkAttendanceRequest>,
) -> (StatusCode, Json<ApiResponse<AttendanceRecordResponse>>) {
    record(state, claims.sub, req, AttendanceType::Regular).await
}

/// POST /api/attendance/core
///
/// Records a core (leadership) mark. Same body as `POST /api/attendance`.
/// A target that is not `admin` or `ketua` yields `403` with
/// `invalid_target`.
pub async fn record_core_attendance(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<MarkAttendanceRequest>,
) -> (StatusCode, Json<ApiResponse<AttendanceRecordResponse>>) {
    record(state, claims.sub, req, AttendanceType::Core).await
}

async fn record(
    state: AppState,
    actor_id: i64,
    req: MarkAttendanceRequest,
    attendance_type: AttendanceType,
) -> (StatusCode, Json<ApiResponse<AttendanceRecordResponse>>) {
    if let Err(validation_errors) = req.validate() {
        return bad_request(format_validation_errors(&validation_errors));
    }
    let status = match parse_status(&req.status) {
        Ok(status) => status,
        Err(message) => return bad_request(message),
    };

    let mark = MarkAttendance {
        session_id: req.session_id,
        user_id: req.user_id,
        status,
        attendance_type,
    };
    match AttendanceService::record(state.db(), state.clock(), actor_id, mark).await {
        Ok(record) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                AttendanceRecordResponse::from(record),
                "Attendance recorded",
            )),
        ),
        Err(e) => service_error(e),
    }
}
