use utoipa::OpenApi;

pub const FIREBASE_TAG: &str = "Firebase";
pub const MESSAGING_TAG: &str = "Messaging";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "FCM Relay",
        description = "Send test push notifications through Firebase Cloud Messaging",
    ),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::models::MessageType,
            crate::models::CustomField,
        )
    ),
    tags(
        (name = FIREBASE_TAG, description = "Service account credential checks"),
        (name = MESSAGING_TAG, description = "Message preview and relay endpoints"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
