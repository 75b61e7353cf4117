use std::str::FromStr;

use axum::{Json, http::StatusCode};
use db::models::attendance_record::{AttendanceStatus, AttendanceType};
use db::models::{attendance_record, pic, session, user};
use serde::{Deserialize, Serialize};
use services::error::ServiceError;
use validator::ValidationErrors;

use crate::response::ApiResponse;

/// Joins every field message into one `; `-separated string.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| {
            errs.iter()
                .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        })
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn status_for(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
        ServiceError::Denied(_) => StatusCode::FORBIDDEN,
        ServiceError::Conflict(_) => StatusCode::CONFLICT,
        ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Maps a service failure onto the response envelope.
pub fn service_error<T>(err: ServiceError) -> (StatusCode, Json<ApiResponse<T>>)
where
    T: Serialize + Default,
{
    let status = status_for(&err);
    let message = match &err {
        ServiceError::Denied(_) | ServiceError::Conflict(_) => err.code().to_owned(),
        ServiceError::Storage(e) => {
            tracing::error!(error = %e, "storage failure");
            "Internal server error".to_owned()
        }
        _ => err.to_string(),
    };
    (status, Json(ApiResponse::error(message)))
}

pub fn bad_request<T>(message: impl Into<String>) -> (StatusCode, Json<ApiResponse<T>>)
where
    T: Serialize + Default,
{
    (StatusCode::BAD_REQUEST, Json(ApiResponse::error(message)))
}

pub fn parse_status(raw: &str) -> Result<AttendanceStatus, String> {
    AttendanceStatus::from_str(raw.trim())
        .map_err(|_| format!("Invalid status '{raw}': expected present, absent, excused or late"))
}

pub fn parse_type(raw: &str) -> Result<AttendanceType, String> {
    AttendanceType::from_str(raw.trim())
        .map_err(|_| format!("Invalid attendance type '{raw}': expected regular or core"))
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AttendanceRecordResponse {
    pub id: i64,
    pub session_id: i64,
    pub user_id: i64,
    pub status: String,
    pub attendance_type: String,
    /// RFC 3339 at UTC+7.
    pub timestamp: String,
    pub recorded_by: i64,
}

impl From<attendance_record::Model> for AttendanceRecordResponse {
    fn from(r: attendance_record::Model) -> Self {
        Self {
            id: r.id,
            session_id: r.session_id,
            user_id: r.user_id,
            status: r.status.to_string(),
            attendance_type: r.attendance_type.to_string(),
            timestamp: r.timestamp.to_rfc3339(),
            recorded_by: r.recorded_by,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: i64,
    pub name: String,
    pub date: String,
    pub pic_id: Option<i64>,
    pub is_locked: bool,
    pub created_by: i64,
    pub created_at: String,
}

impl From<session::Model> for SessionResponse {
    fn from(s: session::Model) -> Self {
        Self {
            id: s.id,
            name: s.name,
            date: s.date.to_string(),
            pic_id: s.pic_id,
            is_locked: s.is_locked,
            created_by: s.created_by,
            created_at: s.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: String,
    pub class_name: Option<String>,
    pub pic_id: Option<i64>,
    pub can_mark_attendance: bool,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            role: u.role.to_string(),
            class_name: u.class_name,
            pic_id: u.pic_id,
            can_mark_attendance: u.can_mark_attendance,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PicResponse {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<pic::Model> for PicResponse {
    fn from(p: pic::Model) -> Self {
        Self {
            id: p.id,
            name: p.name,
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.to_rfc3339(),
        }
    }
}
