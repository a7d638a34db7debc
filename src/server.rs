//! Server module for managing HTTP server lifecycle
//!
//! This module handles server initialization, startup, and graceful shutdown.

use crate::api::routes::create_router;
use crate::config::{Environment, Settings};
use crate::services::Services;
use crate::state::AppState;
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;

/// HTTP server manager
pub struct Server {
    settings: Settings,
    environment: Environment,
}

impl Server {
    /// Create a new server with the given settings
    pub fn new(settings: Settings, environment: Environment) -> Self {
        Self {
            settings,
            environment,
        }
    }

    /// Builds the application router from the settings.
    ///
    /// The credential is not checked here: it is read on every relay, so a
    /// missing key only surfaces through `check-firebase` and `send-fcm`.
    pub fn build_router(&self) -> anyhow::Result<Router> {
        let services = Services::from_settings(&self.settings)?;

        let credential = services.credentials.check();
        if credential.is_ok() {
            tracing::info!(
                source = %services.credentials.source_name(),
                "Firebase credential found"
            );
        } else {
            tracing::warn!(
                source = %services.credentials.source_name(),
                reason = %credential.message(),
                "Firebase credential is not usable yet; sends will fail until it is fixed"
            );
        }

        let state = AppState::new(services, self.settings.ui.clone());
        tracing::info!("Application state created");

        Ok(create_router(state, self.settings.server.request_timeout()))
    }

    /// Start the server and run until shutdown signal
    ///
    /// This method:
    /// 1. Logs startup information
    /// 2. Creates application state and router
    /// 3. Binds to configured address
    /// 4. Starts the HTTP server with graceful shutdown
    ///
    /// # Errors
    /// - HTTP client construction errors
    /// - Address binding errors
    /// - Server runtime errors
    pub async fn run(self) -> anyhow::Result<()> {
        self.log_configuration();

        let router = self.build_router()?;
        tracing::info!("Router configured");

        let address = self.settings.server.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, address = %address, "Failed to bind to address");
            anyhow::anyhow!("Failed to bind to {}: {}", address, e)
        })?;

        tracing::info!(address = %address, "Server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }

    /// Validate everything `run` would do, without binding a port.
    pub fn dry_run(self) -> anyhow::Result<()> {
        self.log_configuration();
        self.build_router()?;
        tracing::info!(
            address = %self.settings.server.address(),
            "Dry run complete, server not started"
        );
        Ok(())
    }

    fn log_configuration(&self) {
        tracing::info!(
            app_name = %self.settings.application.name,
            app_version = %self.settings.application.version,
            environment = %self.environment,
            "Application starting"
        );

        tracing::info!(
            host = %self.settings.server.host,
            port = %self.settings.server.port,
            request_timeout = %self.settings.server.request_timeout,
            "Server configuration loaded"
        );

        tracing::info!(
            fcm_base_url = %self.settings.provider.fcm_base_url,
            request_timeout = %self.settings.provider.request_timeout,
            "Provider configuration loaded"
        );

        tracing::info!(
            credential_env = %self.settings.firebase.credential_env,
            inline_credential = %self.settings.firebase.credential.is_some(),
            "Firebase configuration loaded"
        );

        tracing::info!(
            level = %self.settings.logger.level,
            console_enabled = %self.settings.logger.console.enabled,
            file_enabled = %self.settings.logger.file.enabled,
            "Logger configuration loaded"
        );
    }
}

/// Waits for a shutdown signal (Ctrl+C or SIGTERM).
///
/// If a handler cannot be installed the error is logged and that signal
/// source is ignored.
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
