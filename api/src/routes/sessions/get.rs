use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use services::attendance_service::AttendanceService;
use services::session_service::{SessionService, SessionStatus};

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{
    AttendanceRecordResponse, SessionResponse, bad_request, parse_type, service_error,
};
use crate::state::AppState;

/// GET /api/sessions
///
/// All sessions, newest date first.
pub async fn list_sessions(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<Vec<SessionResponse>>>) {
    match SessionService::list(state.db()).await {
        Ok(sessions) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                sessions.into_iter().map(SessionResponse::from).collect(),
                "Sessions retrieved",
            )),
        ),
        Err(e) => service_error(e),
    }
}

/// GET /api/sessions/{session_id}/status
///
/// ```json
/// { "id": 3, "name": "Kajian Jumat", "locked": false }
/// ```
pub async fn get_session_status(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<SessionStatus>>) {
    match SessionService::status(state.db(), session_id).await {
        Ok(status) => (
            StatusCode::OK,
            Json(ApiResponse::success(status, "Session status retrieved")),
        ),
        Err(e) => service_error(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct AttendanceQuery {
    #[serde(rename = "type")]
    pub attendance_type: Option<String>,
}

/// GET /api/sessions/{session_id}/attendance?type=regular|core
///
/// Marks in a session, optionally one class only. Visible to elevated roles
/// and to the delegated marker of the session's PIC.
pub async fn list_session_attendance(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Query(query): Query<AttendanceQuery>,
) -> (StatusCode, Json<ApiResponse<Vec<AttendanceRecordResponse>>>) {
    let attendance_type = match query.attendance_type.as_deref().map(parse_type) {
        None => None,
        Some(Ok(kind)) => Some(kind),
        Some(Err(message)) => return bad_request(message),
    };

    match AttendanceService::list_for_session(state.db(), claims.sub, session_id, attendance_type)
        .await
    {
        Ok(records) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                records.into_iter().map(AttendanceRecordResponse::from).collect(),
                "Attendance retrieved",
            )),
        ),
        Err(e) => service_error(e),
    }
}
