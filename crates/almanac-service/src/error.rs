use thiserror::Error;
use uuid::Uuid;

/// Service layer errors - combines all error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    RecurError(#[from] almanac_recur::error::RecurError),

    #[error(transparent)]
    CoreError(#[from] almanac_core::error::CoreError),

    #[error("Event not found: {0}")]
    NotFound(Uuid),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(&'static str),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
