//! Core messaging provider trait and types.
//!
//! This module provides the abstraction over the push delivery service so
//! the relay can be exercised against a fake in tests.

use crate::models::{ProviderMessage, ServiceAccountKey};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Error reported by the provider or by the client talking to it.
///
/// `code` follows the Firebase admin naming (`messaging/...`, `app/...`)
/// so hints can be selected by substring.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ProviderError {
    pub code: String,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Token exchange or key parsing failed.
    pub fn invalid_credential(message: impl Into<String>) -> Self {
        Self::new("app/invalid-credential", message)
    }

    /// The request never produced a provider response.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new("app/network-error", message)
    }
}

/// Trait for push delivery providers.
///
/// Uses `async_trait` to support async methods with dynamic dispatch.
/// All providers must be Send + Sync for use in async contexts.
#[async_trait]
pub trait MessagingProvider: Send + Sync {
    /// Sends one message and returns the provider-assigned message id.
    async fn send(&self, message: &ProviderMessage) -> Result<String, ProviderError>;

    /// Returns the provider name for logging/debugging
    fn name(&self) -> &'static str;
}

/// Builds provider clients from a validated credential.
///
/// The relay owns one factory and asks it for a fresh client whenever the
/// configured credential changes.
pub trait ProviderFactory: Send + Sync {
    fn create(&self, credential: ServiceAccountKey)
    -> Result<Arc<dyn MessagingProvider>, ProviderError>;
}
