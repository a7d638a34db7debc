//! Domain models shared by the services and the HTTP layer.

mod credential;
mod message;

pub use credential::{DEFAULT_TOKEN_URI, ServiceAccountKey};
pub use message::{CustomField, FieldToggles, MessageSpec, MessageType, ProviderMessage};
