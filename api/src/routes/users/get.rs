use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use services::attendance_service::{AttendanceService, AttendanceSummary};

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{AttendanceRecordResponse, service_error};
use crate::state::AppState;

#[derive(Debug, Default, Serialize)]
pub struct UserAttendanceResponse {
    pub records: Vec<AttendanceRecordResponse>,
    pub summary: AttendanceSummary,
}

/// GET /api/users/{user_id}/attendance
///
/// A user's marks in the order they were recorded, with status counts.
/// Visible to the user themself and to elevated roles.
///
/// ```json
/// {
///   "records": [{ "id": 1, "session_id": 3, "status": "present", "attendance_type": "regular", ... }],
///   "summary": { "present": 1, "absent": 0, "excused": 0, "late": 0, "total": 1 }
/// }
/// ```
pub async fn get_user_attendance(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> (StatusCode, Json<ApiResponse<UserAttendanceResponse>>) {
    match AttendanceService::list_for_user(state.db(), claims.sub, user_id).await {
        Ok(records) => {
            let summary = AttendanceService::summarize(&records);
            let response = UserAttendanceResponse {
                records: records.into_iter().map(AttendanceRecordResponse::from).collect(),
                summary,
            };
            (
                StatusCode::OK,
                Json(ApiResponse::success(response, "Attendance history retrieved")),
            )
        }
        Err(e) => service_error(e),
    }
}
