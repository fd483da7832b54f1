use chrono::NaiveDateTime;
use thiserror::Error;

/// Recurrence validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecurError {
    #[error("Invalid recurrence rule: {0}")]
    InvalidRule(String),

    #[error("Invalid event range: end {end} is not after start {start}")]
    InvalidRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

pub type RecurResult<T> = std::result::Result<T, RecurError>;
