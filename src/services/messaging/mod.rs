//! Push message construction and delivery.
//!
//! `MessagingProvider` abstracts the delivery service so the relay can be
//! exercised against a fake. `FcmProvider` is the production implementation
//! on top of the FCM HTTP v1 API.

mod access_token;
mod fcm_provider;
mod message_builder;
mod provider;
mod relay_service;

pub use access_token::{AccessTokenProvider, FCM_SCOPE};
pub use fcm_provider::{DEFAULT_FCM_BASE_URL, FcmProvider, FcmProviderFactory};
pub use message_builder::build_message;
pub use provider::{MessagingProvider, ProviderError, ProviderFactory};
pub use relay_service::{ProviderHandle, RelayError, RelayOutcome, RelayService};

#[cfg(test)]
pub(crate) use relay_service::tests::{FakeFactory, FakeProvider, credential_json};
