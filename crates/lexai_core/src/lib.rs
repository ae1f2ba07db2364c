pub mod cache;
pub mod domain;
pub mod error;
pub mod filter;
pub mod format;
pub mod intake;
pub mod normalize;
pub mod notice;
pub mod status;
pub mod upload;
pub mod validate;

#[cfg(test)]
mod tests {
    use super::error::{AppError, ErrorCategory};

    #[test]
    fn app_error_is_structured() {
        let err = AppError::new("API_REQUEST_FAILED", "request failed").with_retryable(false);
        assert_eq!(err.code, "API_REQUEST_FAILED");
        assert_eq!(err.message, "request failed");
        assert_eq!(err.retryable, false);
        assert_eq!(err.to_string(), "[API_REQUEST_FAILED] request failed");
    }

    #[test]
    fn error_codes_map_to_taxonomy() {
        assert_eq!(
            AppError::new("INTAKE_TOO_LARGE", "x").category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            AppError::new("API_UNREACHABLE", "x").category(),
            ErrorCategory::Request
        );
        assert_eq!(
            AppError::new("ACTION_NOT_ALLOWED", "x").category(),
            ErrorCategory::Gate
        );
        assert_eq!(
            AppError::new("CONFIG_INVALID", "x").category(),
            ErrorCategory::Config
        );
    }
}
