//! Credential status handler.

use crate::api::doc::FIREBASE_TAG;
use crate::api::dto::CheckFirebaseResponse;
use crate::state::AppState;
use axum::{Json, extract::State};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Creates credential routes.
///
/// Routes:
/// - GET /check-firebase - Validate the configured service account key
pub fn firebase_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(check_firebase))
}

/// GET /api/check-firebase - Validate the configured credential
///
/// Reports whether the service account key is present, parses, and carries
/// every required field. Failures are reported in the body, never through
/// the status code.
#[utoipa::path(
    get,
    path = "/check-firebase",
    tag = FIREBASE_TAG,
    responses(
        (status = 200, description = "Credential status", body = CheckFirebaseResponse)
    )
)]
async fn check_firebase(State(state): State<AppState>) -> Json<CheckFirebaseResponse> {
    let result = state.services.credentials.check();
    tracing::debug!(valid = result.is_ok(), "Credential checked");
    Json(CheckFirebaseResponse::from(result))
}
