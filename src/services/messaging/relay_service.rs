//! Message relay: credential gate, request checks, construction and one send.

use super::message_builder::build_message;
use super::provider::{MessagingProvider, ProviderError, ProviderFactory};
use crate::models::{MessageSpec, ProviderMessage, ServiceAccountKey};
use crate::services::credential::CredentialService;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

const INIT_HINT: &str = "Check that .env.local sets a valid FIREBASE_SERVICE_ACCOUNT_KEY.";
const UNREGISTERED_HINT: &str =
    "The FCM token is invalid or has expired. Obtain a new token from the device.";
const MALFORMED_TOKEN_HINT: &str = "The FCM token is not in a valid format.";
const PERMISSION_HINT: &str = "Check that the service account belongs to the target Firebase project \
     and has permission to send messages.";
/// Substrings marking a permission or authorization failure.
const AUTH_MARKERS: [&str; 5] = [
    "permission",
    "authentication",
    "auth-error",
    "invalid-credential",
    "mismatched-credential",
];

/// Errors produced by [`RelayService::relay`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RelayError {
    /// The credential is unusable or the client could not be built.
    #[error("{reason}")]
    Initialization { reason: String },

    /// Request carried no destination token.
    #[error("FCM token is required.")]
    MissingToken,

    /// The provider rejected the message or could not be reached.
    #[error("{0}")]
    Send(ProviderError),
}

impl RelayError {
    /// Remediation hint, if one applies.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            RelayError::Initialization { .. } => Some(INIT_HINT),
            RelayError::MissingToken => None,
            RelayError::Send(error) => send_hint(error),
        }
    }
}

/// Picks a hint by substring over the provider code and message.
fn send_hint(error: &ProviderError) -> Option<&'static str> {
    let haystack = format!("{} {}", error.code, error.message);

    if haystack.contains("registration-token-not-registered") {
        Some(UNREGISTERED_HINT)
    } else if haystack.contains("invalid-registration-token") {
        Some(MALFORMED_TOKEN_HINT)
    } else if AUTH_MARKERS.iter().any(|marker| haystack.contains(marker)) {
        Some(PERMISSION_HINT)
    } else {
        None
    }
}

/// Successful relay outcome.
#[derive(Debug, Clone)]
pub struct RelayOutcome {
    pub message_id: String,
    pub sent_message: ProviderMessage,
}

struct RegisteredProvider {
    project_id: String,
    private_key_id: String,
    provider: Arc<dyn MessagingProvider>,
}

/// Holds the provider client built from the current credential.
///
/// The lock is held only while checking or replacing the client. Callers
/// receive a cloned `Arc` and send outside of it.
pub struct ProviderHandle {
    factory: Arc<dyn ProviderFactory>,
    slot: Mutex<Option<RegisteredProvider>>,
}

impl ProviderHandle {
    pub fn new(factory: Arc<dyn ProviderFactory>) -> Self {
        Self {
            factory,
            slot: Mutex::new(None),
        }
    }

    /// Returns a client for `credential`, reusing the registered one when
    /// the credential identity is unchanged.
    pub async fn acquire(
        &self,
        credential: ServiceAccountKey,
    ) -> Result<Arc<dyn MessagingProvider>, ProviderError> {
        let mut slot = self.slot.lock().await;

        if let Some(registered) = slot.as_ref()
            && (registered.project_id.as_str(), registered.private_key_id.as_str())
                == credential.fingerprint()
        {
            return Ok(registered.provider.clone());
        }

        if slot.is_some() {
            tracing::info!(
                project_id = %credential.project_id,
                "Credential changed, replacing provider client"
            );
        }

        let project_id = credential.project_id.clone();
        let private_key_id = credential.private_key_id.clone();
        let provider = self.factory.create(credential)?;

        *slot = Some(RegisteredProvider {
            project_id,
            private_key_id,
            provider: provider.clone(),
        });
        Ok(provider)
    }

    /// Whether a client is currently registered.
    pub async fn is_initialized(&self) -> bool {
        self.slot.lock().await.is_some()
    }
}

/// Relays test messages to the provider.
#[derive(Clone)]
pub struct RelayService {
    credentials: CredentialService,
    handle: Arc<ProviderHandle>,
}

impl RelayService {
    /// Creates a new RelayService
    ///
    /// # Arguments
    /// * `credentials` - Source of the service-account credential
    /// * `factory` - Builds provider clients from a validated credential
    pub fn new(credentials: CredentialService, factory: Arc<dyn ProviderFactory>) -> Self {
        Self {
            credentials,
            handle: Arc::new(ProviderHandle::new(factory)),
        }
    }

    /// Relays one message.
    ///
    /// Steps run in order and each one gates the next: provider
    /// initialization, token check, construction, a single send.
    ///
    /// # Returns
    /// The provider message id and the message that was sent
    pub async fn relay(&self, spec: &MessageSpec) -> Result<RelayOutcome, RelayError> {
        let provider = self.initialize().await?;

        if spec.token.trim().is_empty() {
            return Err(RelayError::MissingToken);
        }

        tracing::info!(message_type = %spec.message_type, "Relaying FCM message");
        let message = build_message(spec);

        match provider.send(&message).await {
            Ok(message_id) => {
                tracing::info!(
                    provider = provider.name(),
                    message_id = %message_id,
                    "FCM message sent"
                );
                Ok(RelayOutcome {
                    message_id,
                    sent_message: message,
                })
            }
            Err(e) => {
                tracing::warn!(
                    provider = provider.name(),
                    code = %e.code,
                    error = %e.message,
                    "FCM send failed"
                );
                Err(RelayError::Send(e))
            }
        }
    }

    /// Builds the message without sending it.
    pub fn preview(&self, spec: &MessageSpec) -> ProviderMessage {
        build_message(spec)
    }

    pub fn handle(&self) -> &ProviderHandle {
        &self.handle
    }

    async fn initialize(&self) -> Result<Arc<dyn MessagingProvider>, RelayError> {
        let credential = self.credentials.load().map_err(|result| {
            tracing::warn!(reason = %result.message(), "Credential rejected");
            RelayError::Initialization {
                reason: result.failure_reason(),
            }
        })?;

        let project_id = credential.project_id.clone();
        let provider = self.handle.acquire(credential).await.map_err(|e| {
            tracing::error!(project_id = %project_id, error = %e, "Provider initialization failed");
            RelayError::Initialization { reason: e.message }
        })?;

        tracing::debug!(project_id = %project_id, "Provider ready");
        Ok(provider)
    }
}
