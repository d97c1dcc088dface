use thiserror::Error;

use crate::domain::types::TypeConstraintError;

/// Errors raised by Product Store implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A pooled connection could not be obtained.
    #[error("connection error: {0}")]
    Connection(#[from] diesel::r2d2::PoolError),
    /// The database rejected a query.
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    /// Input or stored data violated a domain constraint.
    #[error("validation error: {0}")]
    ValidationError(String),
    /// Embedded migrations failed to apply.
    #[error("migration error: {0}")]
    Migration(String),
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
