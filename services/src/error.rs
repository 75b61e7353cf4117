use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use strum::{Display, IntoStaticStr};
use thiserror::Error;

/// Why an operation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// The session no longer accepts attendance writes.
    SessionLocked,
    /// The actor lacks the role or delegation for this action.
    Forbidden,
    /// The target user may not receive this kind of mark.
    InvalidTarget,
}

/// Non-fatal "already done" signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConflictReason {
    AlreadyMarked,
    DuplicateName,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("denied: {0}")]
    Denied(DenyReason),

    #[error("conflict: {0}")]
    Conflict(ConflictReason),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Storage failures are surfaced as-is and never retried here.
    #[error("storage failure: {0}")]
    Storage(#[from] DbErr),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        ServiceError::NotFound { entity, id }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        ServiceError::InvalidInput(message.into())
    }

    /// Stable machine-readable code for transports.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::NotFound { .. } => "not_found",
            ServiceError::Denied(reason) => (*reason).into(),
            ServiceError::Conflict(reason) => (*reason).into(),
            ServiceError::InvalidInput(_) => "invalid_input",
            ServiceError::Storage(_) => "storage_failure",
        }
    }
}

/// True when the storage layer rejected a write on a unique constraint.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// True when the storage layer rejected a write on a foreign key.
pub(crate) fn is_foreign_key_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_)))
}
