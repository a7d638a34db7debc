//! Firebase Cloud Messaging provider implementation.
//!
//! Sends single messages through the FCM HTTP v1 API.
//!
//! FCM API Reference: https://firebase.google.com/docs/reference/fcm/rest/v1/projects.messages/send

use super::access_token::AccessTokenProvider;
use super::provider::{MessagingProvider, ProviderError, ProviderFactory};
use crate::models::{ProviderMessage, ServiceAccountKey};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Production FCM endpoint.
pub const DEFAULT_FCM_BASE_URL: &str = "https://fcm.googleapis.com";

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    message: &'a ProviderMessage,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: ErrorBody,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    details: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(rename = "errorCode")]
    error_code: Option<String>,
}

/// FCM provider bound to one service account.
pub struct FcmProvider {
    project_id: String,
    send_url: String,
    tokens: AccessTokenProvider,
    http: reqwest::Client,
}

impl FcmProvider {
    /// Creates a provider for `credential`, talking to `base_url`.
    ///
    /// # Errors
    /// Fails with `app/invalid-credential` when the private key cannot be parsed.
    pub fn new(
        credential: &ServiceAccountKey,
        base_url: &str,
        http: reqwest::Client,
    ) -> Result<Self, ProviderError> {
        let tokens = AccessTokenProvider::new(credential, http.clone())?;
        Ok(Self {
            project_id: credential.project_id.clone(),
            send_url: build_send_url(base_url, &credential.project_id),
            tokens,
            http,
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }
}

#[async_trait]
impl MessagingProvider for FcmProvider {
    async fn send(&self, message: &ProviderMessage) -> Result<String, ProviderError> {
        let start = Instant::now();
        let access_token = self.tokens.token().await?;

        let response = self
            .http
            .post(&self.send_url)
            .bearer_auth(access_token)
            .json(&SendRequest { message })
            .send()
            .await
            .map_err(|e| ProviderError::network(format!("FCM send request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("Failed to read FCM response: {}", e)))?;

        tracing::debug!(
            status = status.as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "FCM send completed"
        );

        if status.is_success() {
            let parsed: SendResponse = serde_json::from_str(&body).map_err(|e| {
                ProviderError::new(
                    "messaging/unknown-error",
                    format!("Failed to parse FCM response: {}", e),
                )
            })?;
            Ok(parsed.name)
        } else {
            Err(parse_error_body(status.as_u16(), &body))
        }
    }

    fn name(&self) -> &'static str {
        "fcm"
    }
}

fn build_send_url(base_url: &str, project_id: &str) -> String {
    format!(
        "{}/v1/projects/{}/messages:send",
        base_url.trim_end_matches('/'),
        project_id
    )
}

/// Maps an FCM error response onto an admin-style error code.
fn parse_error_body(status: u16, body: &str) -> ProviderError {
    let envelope: ErrorEnvelope = serde_json::from_str(body).unwrap_or_default();
    let error = envelope.error;

    let message = if error.message.is_empty() {
        format!("FCM request failed with status {}: {}", status, body.trim())
    } else {
        error.message
    };

    let fcm_code = error
        .details
        .iter()
        .find_map(|d| d.error_code.as_deref())
        .unwrap_or(error.status.as_str());

    ProviderError::new(map_error_code(fcm_code, &message), message)
}

fn map_error_code(fcm_code: &str, message: &str) -> &'static str {
    match fcm_code {
        "UNREGISTERED" => "messaging/registration-token-not-registered",
        "INVALID_ARGUMENT" if message.to_lowercase().contains("registration token") => {
            "messaging/invalid-registration-token"
        }
        "INVALID_ARGUMENT" => "messaging/invalid-argument",
        "SENDER_ID_MISMATCH" => "messaging/mismatched-credential",
        "QUOTA_EXCEEDED" => "messaging/message-rate-exceeded",
        "UNAVAILABLE" => "messaging/server-unavailable",
        "INTERNAL" => "messaging/internal-error",
        "THIRD_PARTY_AUTH_ERROR" => "messaging/third-party-auth-error",
        "PERMISSION_DENIED" => "messaging/permission-denied",
        "UNAUTHENTICATED" => "messaging/authentication-error",
        _ => "messaging/unknown-error",
    }
}

/// Creates [`FcmProvider`] instances sharing one HTTP client.
#[derive(Clone)]
pub struct FcmProviderFactory {
    base_url: String,
    http: reqwest::Client,
}

impl FcmProviderFactory {
    pub fn new(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            http,
        }
    }
}

impl ProviderFactory for FcmProviderFactory {
    fn create(
        &self,
        credential: ServiceAccountKey,
    ) -> Result<Arc<dyn MessagingProvider>, ProviderError> {
        let provider = FcmProvider::new(&credential, &self.base_url, self.http.clone())?;
        tracing::info!(project_id = %provider.project_id(), "FCM provider created");
        Ok(Arc::new(provider))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TEST_KEY: &str = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/service_account_key.pem"
    ));

    fn credential(token_uri: String) -> ServiceAccountKey {
        ServiceAccountKey {
            account_type: "service_account".to_string(),
            project_id: "demo-project".to_string(),
            private_key_id: "kid-1".to_string(),
            private_key: TEST_KEY.to_string(),
            client_email: "relay@demo-project.iam.gserviceaccount.com".to_string(),
            client_id: None,
            token_uri,
        }
    }

    fn message() -> ProviderMessage {
        ProviderMessage {
            token: "device-token".to_string(),
            notification: None,
            data: BTreeMap::from([("title".to_string(), "Hi".to_string())]),
        }
    }

    async fn mount_token_endpoint(server: &MockServer, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "ya29.test-token",
                "expires_in": 3599,
                "token_type": "Bearer"
            })))
            .expect(expected_calls)
            .mount(server)
            .await;
    }

    fn provider(server: &MockServer) -> FcmProvider {
        FcmProvider::new(
            &credential(format!("{}/token", server.uri())),
            &server.uri(),
            reqwest::Client::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_build_send_url() {
        assert_eq!(
            build_send_url("https://fcm.googleapis.com/", "demo"),
            "https://fcm.googleapis.com/v1/projects/demo/messages:send"
        );
    }

    #[test]
    fn test_map_error_codes() {
        assert_eq!(
            map_error_code("UNREGISTERED", "Requested entity was not found."),
            "messaging/registration-token-not-registered"
        );
        assert_eq!(
            map_error_code(
                "INVALID_ARGUMENT",
                "The registration token is not a valid FCM registration token"
            ),
            "messaging/invalid-registration-token"
        );
        assert_eq!(
            map_error_code("INVALID_ARGUMENT", "Invalid JSON payload received."),
            "messaging/invalid-argument"
        );
        assert_eq!(
            map_error_code("PERMISSION_DENIED", "denied"),
            "messaging/permission-denied"
        );
        assert_eq!(map_error_code("SOMETHING_NEW", ""), "messaging/unknown-error");
    }

    #[test]
    fn test_parse_error_body_prefers_detail_error_code() {
        let body = json!({
            "error": {
                "code": 404,
                "message": "Requested entity was not found.",
                "status": "NOT_FOUND",
                "details": [{
                    "@type": "type.googleapis.com/google.firebase.fcm.v1.FcmError",
                    "errorCode": "UNREGISTERED"
                }]
            }
        });

        let error = parse_error_body(404, &body.to_string());
        assert_eq!(error.code, "messaging/registration-token-not-registered");
        assert_eq!(error.message, "Requested entity was not found.");
    }

    #[test]
    fn test_parse_error_body_without_json() {
        let error = parse_error_body(502, "Bad Gateway");
        assert_eq!(error.code, "messaging/unknown-error");
        assert!(error.message.contains("502"));
        assert!(error.message.contains("Bad Gateway"));
    }

    #[tokio::test]
    async fn test_send_returns_message_name() {
        let server = MockServer::start().await;
        mount_token_endpoint(&server, 1).await;

        Mock::given(method("POST"))
            .and(path("/v1/projects/demo-project/messages:send"))
            .and(header("authorization", "Bearer ya29.test-token"))
            .and(body_partial_json(json!({
                "message": {"token": "device-token", "data": {"title": "Hi"}}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "projects/demo-project/messages/0:1234"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let id = provider(&server).send(&message()).await.unwrap();
        assert_eq!(id, "projects/demo-project/messages/0:1234");
    }

    #[tokio::test]
    async fn test_access_token_is_cached_between_sends() {
        let server = MockServer::start().await;
        mount_token_endpoint(&server, 1).await;

        Mock::given(method("POST"))
            .and(path("/v1/projects/demo-project/messages:send"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "projects/demo-project/messages/1"
            })))
            .expect(2)
            .mount(&server)
            .await;

        let provider = provider(&server);
        provider.send(&message()).await.unwrap();
        provider.send(&message()).await.unwrap();
    }

    #[tokio::test]
    async fn test_send_maps_provider_error() {
        let server = MockServer::start().await;
        mount_token_endpoint(&server, 1).await;

        Mock::given(method("POST"))
            .and(path("/v1/projects/demo-project/messages:send"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "code": 400,
                    "message": "The registration token is not a valid FCM registration token",
                    "status": "INVALID_ARGUMENT",
                    "details": [{
                        "@type": "type.googleapis.com/google.firebase.fcm.v1.FcmError",
                        "errorCode": "INVALID_ARGUMENT"
                    }]
                }
            })))
            .mount(&server)
            .await;

        let error = provider(&server).send(&message()).await.unwrap_err();
        assert_eq!(error.code, "messaging/invalid-registration-token");
    }

    #[tokio::test]
    async fn test_failed_token_exchange_is_credential_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid JWT Signature."
            })))
            .mount(&server)
            .await;

        let error = provider(&server).send(&message()).await.unwrap_err();
        assert_eq!(error.code, "app/invalid-credential");
        assert!(error.message.contains("invalid_grant"));
    }

    #[test]
    fn test_factory_rejects_bad_key() {
        let factory = FcmProviderFactory::new(DEFAULT_FCM_BASE_URL, reqwest::Client::new());
        let mut bad = credential("https://oauth2.googleapis.com/token".to_string());
        bad.private_key = "garbage".to_string();

        let result = factory.create(bad);
        assert!(result.is_err());
    }
}
