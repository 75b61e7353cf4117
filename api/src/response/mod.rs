use serde::Serialize;

/// Standardized API response wrapper for all outgoing JSON responses.
///
/// ```json
/// {
///   "success": false,
///   "data": {},
///   "message": "session_locked"
/// }
/// ```
///
/// Denials and conflicts carry a stable machine code (`session_locked`,
/// `forbidden`, `invalid_target`, `already_marked`, `duplicate_name`) as the
/// message.
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
    pub message: String,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }

    /// Error response with a default `data` payload.
    pub fn error(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            data: T::default(),
            message: message.into(),
        }
    }
}

/// Serializes as `{}`. Used as `data` where there is nothing to return.
#[derive(Serialize, Default, Debug, Clone, Copy)]
pub struct Empty {}
