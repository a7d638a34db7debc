//! Error response DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body returned by every endpoint: `{ "error": ..., "hint"?: ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "error": "Requested entity was not found.",
    "hint": "The FCM token is invalid or has expired. Obtain a new token from the device."
}))]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
    /// Remediation hint, when one applies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorResponse {
    /// Creates a new error response without a hint.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            hint: None,
        }
    }

    /// Adds a hint to the error response.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
