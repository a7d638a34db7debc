//! What the user asked to send, and the provider message built from it.

use crate::utils::nullable::null_as_default;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Selects which of the two provider message shapes is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum MessageType {
    /// A single `data` section; the client app renders everything itself.
    #[default]
    DataOnly,
    /// A `notification` section rendered by the platform plus a `data` section.
    NotificationData,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::DataOnly => "data-only",
            MessageType::NotificationData => "notification-data",
        }
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MessageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "data-only" => Ok(MessageType::DataOnly),
            "notification-data" => Ok(MessageType::NotificationData),
            other => Err(format!(
                "Invalid message type '{}'. Valid values are: data-only, notification-data",
                other
            )),
        }
    }
}

/// A user-supplied key/value pair appended to a message section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CustomField {
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
}

impl CustomField {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Pairs with an empty key or an empty value are never sent.
    pub fn is_complete(&self) -> bool {
        !self.key.is_empty() && !self.value.is_empty()
    }
}

/// Per-field inclusion switches. A disabled field is left out even when
/// it carries a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldToggles {
    pub title: bool,
    pub body: bool,
    pub link: bool,
    pub image: bool,
}

impl Default for FieldToggles {
    fn default() -> Self {
        Self {
            title: true,
            body: true,
            link: true,
            image: true,
        }
    }
}

/// Everything needed to build one provider message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageSpec {
    pub token: String,
    pub message_type: MessageType,
    pub title: String,
    pub body: String,
    pub link: String,
    pub image_url: Option<String>,
    pub data_fields: Vec<CustomField>,
    pub notification_fields: Vec<CustomField>,
    pub toggles: FieldToggles,
}

/// The message handed to the provider's send operation.
///
/// `notification` is absent for data-only messages; `data` is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProviderMessage {
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<BTreeMap<String, String>>,
    pub data: BTreeMap<String, String>,
}
