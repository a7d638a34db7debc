//! Send command handler
//!
//! Smoke test against a running relay: posts a fixed sample message to
//! `/api/send-fcm` and prints what came back.

use crate::config::ProviderConfig;
use crate::external::build_http_client;
use crate::models::MessageType;
use serde_json::{Value, json};

const SEND_PATH: &str = "/api/send-fcm";

const USAGE: &str = "No FCM token given, nothing was sent.

Usage: fcm-relay send <FCM_TOKEN> [--url URL] [--message-type TYPE]

Copy the registration token from the device or the browser console of the
app under test, then run for example:

    fcm-relay send eXaMpLeToKeN --message-type notification-data";

/// Outcome of one smoke-test send.
#[derive(Debug, PartialEq)]
pub enum SendReport {
    /// No token given; nothing was sent
    Skipped,
    Sent { message_id: String, sent_message: Value },
    Failed { status: u16, error: String, hint: Option<String> },
}

/// Handler for the send command
pub struct SendCommandHandler {
    http: reqwest::Client,
    url: String,
}

impl SendCommandHandler {
    /// Create a handler posting to the relay at `url`
    pub fn new(provider: &ProviderConfig, url: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self {
            http: build_http_client(provider)?,
            url: url.into(),
        })
    }

    /// The fixed payload sent by the smoke test.
    pub fn sample_payload(token: &str, message_type: MessageType) -> Value {
        json!({
            "token": token,
            "messageType": message_type,
            "customTitle": "fcm-relay test message",
            "customBody": "If you can read this, the relay works.",
            "customLink": "https://example.com"
        })
    }

    /// Send the sample message and print the outcome.
    ///
    /// # Errors
    /// Fails when the relay cannot be reached or rejects the message.
    pub async fn execute(
        &self,
        token: Option<&str>,
        message_type: MessageType,
    ) -> anyhow::Result<()> {
        let report = self.send(token, message_type).await?;

        match report {
            SendReport::Skipped => {
                println!("{}", USAGE);
                Ok(())
            }
            SendReport::Sent {
                message_id,
                sent_message,
            } => {
                println!("✓ Message sent");
                println!("  Message ID: {}", message_id);
                println!(
                    "  Sent message: {}",
                    serde_json::to_string_pretty(&sent_message)?
                );
                Ok(())
            }
            SendReport::Failed {
                status,
                error,
                hint,
            } => {
                println!("✗ Send failed ({})", status);
                println!("  Error: {}", error);
                if let Some(hint) = hint {
                    println!("  Hint: {}", hint);
                }
                anyhow::bail!("Relay rejected the message: {}", error)
            }
        }
    }

    /// Posts the sample payload; a missing or blank token sends nothing.
    pub async fn send(
        &self,
        token: Option<&str>,
        message_type: MessageType,
    ) -> anyhow::Result<SendReport> {
        let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) else {
            return Ok(SendReport::Skipped);
        };

        let endpoint = format!("{}{}", self.url.trim_end_matches('/'), SEND_PATH);
        let payload = Self::sample_payload(token, message_type);
        tracing::debug!(endpoint = %endpoint, message_type = %message_type, "Posting sample message");

        let response = self
            .http
            .post(&endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to reach {}: {}", endpoint, e))?;

        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        if status.is_success() {
            Ok(SendReport::Sent {
                message_id: body["messageId"].as_str().unwrap_or_default().to_string(),
                sent_message: body["sentMessage"].clone(),
            })
        } else {
            Ok(SendReport::Failed {
                status: status.as_u16(),
                error: body["error"]
                    .as_str()
                    .unwrap_or("Unknown error")
                    .to_string(),
                hint: body["hint"].as_str().map(str::to_string),
            })
        }
    }
}
