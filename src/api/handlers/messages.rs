//! Message relay handlers.
//!
//! Provides the send endpoint and the preview used by the form.

use crate::api::doc::MESSAGING_TAG;
use crate::api::dto::{ErrorResponse, PreviewResponse, SendMessageRequest, SendMessageResponse};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;
use axum::{Json, extract::State};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Creates message routes.
///
/// Routes:
/// - POST /send-fcm - Build and send one message
/// - POST /preview  - Build a message without sending it
pub fn message_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(send_fcm))
        .routes(routes!(preview_message))
}

/// POST /api/send-fcm - Send a test message
///
/// Initializes the provider from the current credential, checks the token,
/// builds the message and submits it once.
#[utoipa::path(
    post,
    path = "/send-fcm",
    tag = MESSAGING_TAG,
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "Message accepted by the provider", body = SendMessageResponse),
        (status = 400, description = "Missing token or malformed body", body = ErrorResponse),
        (status = 500, description = "Provider initialization or send failure", body = ErrorResponse)
    )
)]
async fn send_fcm(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SendMessageRequest>,
) -> AppResult<Json<SendMessageResponse>> {
    let spec = request.into_spec();
    let outcome = state.services.relay.relay(&spec).await?;

    Ok(Json(SendMessageResponse::new(
        outcome.message_id,
        outcome.sent_message,
    )))
}

/// POST /api/preview - Show the message that would be sent
///
/// Needs neither a credential nor a token.
#[utoipa::path(
    post,
    path = "/preview",
    tag = MESSAGING_TAG,
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "Constructed provider message", body = PreviewResponse),
        (status = 400, description = "Malformed body", body = ErrorResponse)
    )
)]
async fn preview_message(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SendMessageRequest>,
) -> Json<PreviewResponse> {
    let message = state.services.relay.preview(&request.into_spec());
    Json(PreviewResponse { message })
}
