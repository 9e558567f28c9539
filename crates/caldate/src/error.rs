//! Error types for caldate operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalDateError {
    #[error("Invalid offset: not a number")]
    InvalidOffset,

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Missing year: the calendar date was built from partial fields without a year")]
    MissingYear,
}

pub type Result<T> = std::result::Result<T, CalDateError>;
