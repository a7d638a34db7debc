//! Service layer for business logic operations.
//!
//! Services encapsulate the credential checks and the message relay and
//! are shared by the HTTP handlers and the CLI.

pub mod credential;
pub mod messaging;

pub use credential::{
    CredentialService, CredentialSource, EnvCredentialSource, StaticCredentialSource,
    ValidationResult,
};
pub use messaging::{ProviderFactory, RelayService};

use crate::config::{FirebaseConfig, Settings};
use crate::external::build_http_client;
use messaging::FcmProviderFactory;
use std::sync::Arc;

/// Aggregates all services for convenient access.
///
/// This struct is designed to be used as Axum application state.
/// Cloning is cheap since the shared parts sit behind `Arc`.
#[derive(Clone)]
pub struct Services {
    pub credentials: CredentialService,
    pub relay: RelayService,
}

impl Services {
    /// Creates services around an explicit provider factory.
    pub fn new(credentials: CredentialService, factory: Arc<dyn ProviderFactory>) -> Self {
        Self {
            relay: RelayService::new(credentials.clone(), factory),
            credentials,
        }
    }

    /// Creates the production services: FCM over HTTP, credential from
    /// the configured source.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let http = build_http_client(&settings.provider)?;
        let factory = FcmProviderFactory::new(settings.provider.fcm_base_url.clone(), http);
        let credentials = CredentialService::new(credential_source(&settings.firebase));

        Ok(Self::new(credentials, Arc::new(factory)))
    }
}

/// An inline credential wins over the environment variable.
pub fn credential_source(config: &FirebaseConfig) -> Arc<dyn CredentialSource> {
    match &config.credential {
        Some(inline) => Arc::new(StaticCredentialSource::new(
            "firebase.credential",
            Some(inline.clone()),
        )),
        None => Arc::new(EnvCredentialSource::new(config.credential_env.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_source_prefers_inline_value() {
        let config = FirebaseConfig {
            credential_env: "UNUSED_VAR".to_string(),
            credential: Some("{}".to_string()),
        };
        let source = credential_source(&config);
        assert_eq!(source.name(), "firebase.credential");
        assert_eq!(source.read().as_deref(), Some("{}"));
    }

    #[test]
    fn test_credential_source_defaults_to_env_var() {
        let source = credential_source(&FirebaseConfig::default());
        assert_eq!(source.name(), "FIREBASE_SERVICE_ACCOUNT_KEY");
    }

    #[test]
    fn test_services_from_default_settings() {
        let services = Services::from_settings(&Settings::default()).unwrap();
        assert_eq!(
            services.credentials.source_name(),
            "FIREBASE_SERVICE_ACCOUNT_KEY"
        );
    }
}
