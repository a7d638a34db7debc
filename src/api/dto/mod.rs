//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `message` - Send and preview request/response DTOs
//! - `firebase` - Credential status DTOs
//! - `health` - Health probe DTOs
//! - `error` - Common error response DTOs

mod error;
mod firebase;
mod health;
mod message;

pub use error::ErrorResponse;
pub use firebase::{CheckFirebaseResponse, CheckStatus};
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use message::{PreviewResponse, SendMessageRequest, SendMessageResponse};
