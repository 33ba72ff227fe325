//! Error types for the content calendar
//!
//! All errors use thiserror for structured error handling.
//! These errors can be serialized for an API caller.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A schedule update broke a constraint; the active schedule is untouched.
    #[error("Invalid value for {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("Calendar event not found: {0}")]
    EventNotFound(String),

    #[error("Cannot move event from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Scheduler error: {0}")]
    Scheduler(String),

    #[error("Mail error: {0}")]
    Mail(String),

    #[error("{0}")]
    Generic(String),
}

impl AppError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
