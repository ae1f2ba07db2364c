use serde::{Deserialize, Serialize};
use std::fmt;

/// Single structured error shape used across the client layers.
///
/// The `code` prefix places every error in one bucket of the failure taxonomy,
/// see [`ErrorCategory`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    pub retryable: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Detected locally before any request was issued.
    Validation,
    /// Non-success response or transport failure.
    Request,
    /// Action disabled for the document's current status.
    Gate,
    Config,
}

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            retryable: false,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    pub fn category(&self) -> ErrorCategory {
        let code = self.code.as_str();
        if code.starts_with("INTAKE_")
            || code.starts_with("UPLOAD_")
            || code.starts_with("VALIDATION_")
        {
            ErrorCategory::Validation
        } else if code.starts_with("ACTION_") {
            ErrorCategory::Gate
        } else if code.starts_with("CONFIG_") {
            ErrorCategory::Config
        } else {
            ErrorCategory::Request
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}
