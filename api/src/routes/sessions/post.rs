use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use db::models::attendance_record::AttendanceType;
use serde::{Deserialize, Serialize};
use services::attendance_service::{AttendanceService, BatchEntry, BatchOutcome};
use services::session_service::{NewSession, SessionService, SessionStatus};
use validator::Validate;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{
    SessionResponse, bad_request, format_validation_errors, parse_status, parse_type,
    service_error,
};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSessionRequest {
    #[validate(length(
        min = 1,
        max = 150,
        message = "Session name must be between 1 and 150 characters"
    ))]
    pub name: String,
    /// `YYYY-MM-DD`
    pub date: NaiveDate,
    pub pic_id: Option<i64>,
}

/// POST /api/sessions
///
/// Creates an open session. Elevated roles only.
///
/// ### Request Body
/// ```json
/// { "name": "Kajian Jumat", "date": "2026-01-16", "pic_id": null }
/// ```
pub async fn create_session(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<CreateSessionRequest>,
) -> (StatusCode, Json<ApiResponse<SessionResponse>>) {
    if let Err(validation_errors) = req.validate() {
        return bad_request(format_validation_errors(&validation_errors));
    }

    let input = NewSession {
        name: req.name,
        date: req.date,
        pic_id: req.pic_id,
    };
    match SessionService::create(state.db(), claims.sub, input).await {
        Ok(session) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                SessionResponse::from(session),
                "Session created",
            )),
        ),
        Err(e) => service_error(e),
    }
}

/// POST /api/sessions/{session_id}/lock
///
/// Locks the session against further marks. Locking twice succeeds.
pub async fn lock_session(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> (StatusCode, Json<ApiResponse<SessionStatus>>) {
    match SessionService::lock(state.db(), claims.sub, session_id).await {
        Ok(status) => (
            StatusCode::OK,
            Json(ApiResponse::success(status, "Session locked")),
        ),
        Err(e) => service_error(e),
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct BatchItem {
    pub user_id: i64,
    pub status: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BatchRequest {
    /// `regular` (default) or `core`.
    pub attendance_type: Option<String>,
    #[validate(length(min = 1, message = "Request must include at least one entry"))]
    pub entries: Vec<BatchItem>,
}

/// POST /api/sessions/{session_id}/attendance/batch
///
/// Marks several users at once. The whole batch is rejected if any target is
/// unknown or out of scope; users that already have a mark are skipped.
///
/// ### Request Body
/// ```json
/// {
///   "attendance_type": "regular",
///   "entries": [{ "user_id": 4, "status": "present" }, { "user_id": 5, "status": "late" }]
/// }
/// ```
///
/// ### Response
/// ```json
/// { "recorded": [4], "skipped": [5] }
/// ```
pub async fn record_batch(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<BatchRequest>,
) -> (StatusCode, Json<ApiResponse<BatchOutcome>>) {
    if let Err(validation_errors) = req.validate() {
        return bad_request(format_validation_errors(&validation_errors));
    }

    let attendance_type = match req.attendance_type.as_deref().map(parse_type) {
        None => AttendanceType::default(),
        Some(Ok(kind)) => kind,
        Some(Err(message)) => return bad_request(message),
    };

    let mut entries = Vec::with_capacity(req.entries.len());
    for item in &req.entries {
        match parse_status(&item.status) {
            Ok(status) => entries.push(BatchEntry {
                user_id: item.user_id,
                status,
            }),
            Err(message) => return bad_request(message),
        }
    }

    match AttendanceService::record_batch(
        state.db(),
        state.clock(),
        claims.sub,
        session_id,
        attendance_type,
        &entries,
    )
    .await
    {
        Ok(outcome) => (
            StatusCode::OK,
            Json(ApiResponse::success(outcome, "Batch recorded")),
        ),
        Err(e) => service_error(e),
    }
}
