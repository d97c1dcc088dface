use thiserror::Error;

use crate::domain::types::TypeConstraintError;

/// Generic error type used by service layer functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The caller supplied a missing or malformed argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The feed content did not match the expected format.
    #[error("invalid data format: {0}")]
    Format(String),
    /// The operation did not finish within its deadline.
    #[error("deadline exceeded")]
    DeadlineExceeded,
    /// An unexpected internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::InvalidArgument(val.to_string())
    }
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
