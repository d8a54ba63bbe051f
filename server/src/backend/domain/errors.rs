//! Error taxonomy for reminder operations.
//!
//! Storage traits speak `anyhow::Result`; anything coming back from them is
//! folded into [`ReminderError::Storage`] by `?`.

use super::models::reminder::MarkError;

#[derive(Debug, thiserror::Error)]
pub enum ReminderError {
    /// Missing or malformed caller input
    #[error("{field}: {reason}")]
    Validation { field: &'static str, reason: String },
    /// Referenced reminder, dose time or weekday does not exist
    #[error("{0}")]
    NotFound(String),
    /// Caller does not own the reminder
    #[error("{0}")]
    Authorization(String),
    #[error("storage failure: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl ReminderError {
    pub fn missing(field: &'static str) -> Self {
        ReminderError::Validation {
            field,
            reason: "is required".to_string(),
        }
    }

    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ReminderError::Validation {
            field,
            reason: reason.into(),
        }
    }
}

impl From<MarkError> for ReminderError {
    fn from(err: MarkError) -> Self {
        ReminderError::NotFound(err.to_string())
    }
}

pub type ReminderResult<T> = std::result::Result<T, ReminderError>;
