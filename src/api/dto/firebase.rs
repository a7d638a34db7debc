//! Credential status DTOs.

use crate::services::ValidationResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Overall outcome of a credential check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Success,
    Error,
}

/// Body of `GET /api/check-firebase`. Always served with `200 OK`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "status": "success",
    "message": "Firebase configuration is valid.",
    "projectId": "demo-project",
    "serviceAccountEmail": "firebase-adminsdk@demo-project.iam.gserviceaccount.com"
}))]
pub struct CheckFirebaseResponse {
    pub status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_account_email: Option<String>,
    /// Parser message for malformed JSON
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<ValidationResult> for CheckFirebaseResponse {
    fn from(result: ValidationResult) -> Self {
        let message = Some(result.message());
        let hint = result.hint().map(str::to_string);
        let error = result.parser_error().map(str::to_string);

        match result {
            ValidationResult::Ok {
                project_id,
                client_email,
            } => Self {
                status: CheckStatus::Success,
                message,
                hint: None,
                project_id: Some(project_id),
                service_account_email: Some(client_email),
                error: None,
            },
            _ => Self {
                status: CheckStatus::Error,
                message,
                hint,
                project_id: None,
                service_account_email: None,
                error,
            },
        }
    }
}
