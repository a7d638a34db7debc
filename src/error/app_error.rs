use crate::services::messaging::RelayError;
use axum::extract::rejection::JsonRejection;
use thiserror::Error;
use validator::ValidationErrors;

/// Application-wide error type for the HTTP layer.
///
/// Every variant renders as `{ "error": ..., "hint"?: ... }`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed or unreadable request
    #[error("{message}")]
    BadRequest { message: String },

    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Relay failure; status and hint depend on the stage that failed
    #[error(transparent)]
    Relay(#[from] RelayError),

    /// Unexpected server-side failure; details are logged, never returned
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest {
            message: message.into(),
        }
    }

    /// Remediation hint shown next to the error, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            AppError::Relay(e) => e.hint(),
            _ => None,
        }
    }
}

impl From<askama::Error> for AppError {
    fn from(error: askama::Error) -> Self {
        AppError::Internal {
            source: error.into(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest {
            message: format!("Invalid request body: {}", rejection.body_text()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    /// Reports the first failing field; fields are visited in name order.
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        match fields.first() {
            Some((field, field_errors)) => AppError::Validation {
                field: field.to_string(),
                reason: field_errors
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "is invalid".to_string()),
            },
            None => AppError::Validation {
                field: "body".to_string(),
                reason: errors.to_string(),
            },
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::messaging::ProviderError;

    #[test]
    fn test_relay_error_message_is_transparent() {
        let error = AppError::from(RelayError::Send(ProviderError::new(
            "messaging/invalid-registration-token",
            "The registration token is not a valid FCM registration token",
        )));
        assert_eq!(
            error.to_string(),
            "The registration token is not a valid FCM registration token"
        );
        assert!(error.hint().is_some());
    }

    #[test]
    fn test_validation_errors_report_first_field() {
        use validator::Validate;

        #[derive(Validate)]
        struct Probe {
            #[validate(length(max = 2, message = "Too many entries"))]
            entries: Vec<u8>,
        }

        let errors = Probe {
            entries: vec![1, 2, 3],
        }
        .validate()
        .unwrap_err();

        match AppError::from(errors) {
            AppError::Validation { field, reason } => {
                assert_eq!(field, "entries");
                assert_eq!(reason, "Too many entries");
            }
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_non_relay_errors_have_no_hint() {
        assert!(AppError::bad_request("nope").hint().is_none());
        let internal = AppError::from(askama::Error::Fmt(std::fmt::Error));
        assert_eq!(internal.to_string(), "Internal error");
        assert!(internal.hint().is_none());
    }
}
