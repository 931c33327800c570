//! Error types for cron-shift operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShiftError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid expression: {0}")]
    InvalidExpression(String),

    #[error("Invalid {field} field: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// No listed day-of-month can occur in any of the allowed months.
    #[error("Invalid explicit day of month definition: {0}")]
    DayMonthConflict(String),
}

pub type Result<T> = std::result::Result<T, ShiftError>;
