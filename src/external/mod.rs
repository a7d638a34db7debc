//! Outbound HTTP plumbing shared by provider clients.

pub mod client;

pub use client::build_http_client;
