//! Application state for Axum web framework.
//!
//! Contains shared services and the UI configuration that are accessible
//! across all request handlers.

use crate::config::UiConfig;
use crate::services::Services;
use std::sync::Arc;

/// Application state containing all shared services and resources.
///
/// This struct is designed to be used with Axum's State extractor.
/// Cloning is cheap since services and configuration sit behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// All business logic services
    pub services: Services,
    /// Feature flags for the HTML form
    pub ui: Arc<UiConfig>,
}

impl AppState {
    /// Creates a new AppState.
    ///
    /// # Example
    /// ```ignore
    /// let services = Services::from_settings(&settings)?;
    /// let state = AppState::new(services, settings.ui.clone());
    /// ```
    pub fn new(services: Services, ui: UiConfig) -> Self {
        Self {
            services,
            ui: Arc::new(ui),
        }
    }
}
