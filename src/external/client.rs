use std::time::Duration;

use crate::config::ProviderConfig;

/// Builds the HTTP client used for OAuth token exchange and FCM sends.
///
/// One client is built at startup and cloned into every provider instance,
/// so connections are pooled across credential changes.
///
/// # Features
/// - **Timeouts**: whole-request and connect timeouts from `[provider]`
/// - **HTTP/2**: adaptive window sizing and keep-alive
/// - **Compression**: gzip
/// - **Security**: Rustls for TLS (no OpenSSL dependency)
pub fn build_http_client(config: &ProviderConfig) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        // Timeouts
        .timeout(config.request_timeout())
        .connect_timeout(config.connect_timeout())
        // Connection pooling
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(90))
        // HTTP/2 settings
        .http2_adaptive_window(true)
        .http2_keep_alive_interval(Duration::from_secs(10))
        .http2_keep_alive_timeout(Duration::from_secs(20))
        .gzip(true)
        .user_agent(format!("fcm-relay/{}", crate::pkg_version()))
        .build()
}
