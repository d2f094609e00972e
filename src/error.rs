use sea_orm::DbErr;
use thiserror::Error;

/// Domain-layer error for booking, chat, subscription and appeal operations.
///
/// Verification failures (`CodeMismatch`, `CodeExpired`) are retryable: the
/// attempt counter is bumped but nothing ever locks. Side-effect failures
/// (push dispatch) never appear here — they are logged and swallowed at the
/// call site.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidTransition(String),

    #[error("verification code does not match")]
    CodeMismatch,

    #[error("verification code has expired")]
    CodeExpired,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Duplicate(String),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("database error: {0}")]
    Db(#[from] DbErr),
}

impl ServiceError {
    /// True for verification failures the caller may simply retry with a
    /// corrected code.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ServiceError::CodeMismatch | ServiceError::CodeExpired)
    }
}
