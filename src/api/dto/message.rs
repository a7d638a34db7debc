//! Message relay DTOs.

use crate::models::{CustomField, FieldToggles, MessageSpec, MessageType, ProviderMessage};
use crate::utils::nullable::{null_as_default, null_as_true};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

fn default_true() -> bool {
    true
}

/// Body of `POST /api/send-fcm` and `POST /api/preview`.
///
/// Every field is optional on the wire and `null` counts as missing. A
/// missing token is rejected by the relay itself, after the provider has
/// been initialized.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "token": "abc",
    "messageType": "data-only",
    "customTitle": "Hi",
    "customBody": "Bye",
    "customLink": "https://x"
}))]
pub struct SendMessageRequest {
    /// Destination registration token
    #[serde(default, deserialize_with = "null_as_default")]
    pub token: String,
    /// Which of the two message shapes to build
    #[serde(default, deserialize_with = "null_as_default")]
    pub message_type: MessageType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub custom_title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub custom_body: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub custom_link: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_url: Option<String>,
    /// Extra pairs for the data section, applied in order
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(max = 50, message = "At most 50 custom data fields are allowed"))]
    pub custom_data_fields: Vec<CustomField>,
    /// Extra pairs for the notification section, applied in order
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(
        max = 50,
        message = "At most 50 custom notification fields are allowed"
    ))]
    pub custom_notification_fields: Vec<CustomField>,
    #[serde(default = "default_true", deserialize_with = "null_as_true")]
    pub include_title: bool,
    #[serde(default = "default_true", deserialize_with = "null_as_true")]
    pub include_body: bool,
    #[serde(default = "default_true", deserialize_with = "null_as_true")]
    pub include_link: bool,
    #[serde(default = "default_true", deserialize_with = "null_as_true")]
    pub include_image: bool,
}

impl SendMessageRequest {
    /// Converts the wire request into the relay's `MessageSpec`.
    pub fn into_spec(self) -> MessageSpec {
        MessageSpec {
            token: self.token,
            message_type: self.message_type,
            title: self.custom_title,
            body: self.custom_body,
            link: self.custom_link,
            image_url: self.image_url.filter(|url| !url.is_empty()),
            data_fields: self.custom_data_fields,
            notification_fields: self.custom_notification_fields,
            toggles: FieldToggles {
                title: self.include_title,
                body: self.include_body,
                link: self.include_link,
                image: self.include_image,
            },
        }
    }
}

/// Successful send.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "success": true,
    "messageId": "projects/demo-project/messages/0:1700000000000000%abc",
    "sentMessage": {"token": "abc", "data": {"title": "Hi", "body": "Bye", "link": "https://x"}}
}))]
pub struct SendMessageResponse {
    pub success: bool,
    /// Identifier assigned by the provider
    pub message_id: String,
    /// The exact message that was submitted
    pub sent_message: ProviderMessage,
}

impl SendMessageResponse {
    pub fn new(message_id: String, sent_message: ProviderMessage) -> Self {
        Self {
            success: true,
            message_id,
            sent_message,
        }
    }
}

/// The message `send-fcm` would submit for the same body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PreviewResponse {
    pub message: ProviderMessage,
}
