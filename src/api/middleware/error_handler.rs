//! Error handler for converting AppError to HTTP responses.
//!
//! Every failure leaves the API as `{ "error": ..., "hint"?: ... }`, whether
//! it came from a handler or from axum itself (unknown route, wrong method,
//! timeout).

use axum::{
    Json,
    body::Bytes,
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::dto::ErrorResponse;
use crate::error::AppError;
use crate::services::messaging::RelayError;

/// Largest framework error body worth echoing back.
const MAX_ERROR_BODY: usize = 16 * 1024;

impl AppError {
    /// HTTP status for this error.
    ///
    /// # Status Code Mapping
    /// - BadRequest, Validation, missing token → 400 BAD_REQUEST
    /// - Provider initialization or send failure → 500 INTERNAL_SERVER_ERROR
    /// - Internal (page rendering) → 500 INTERNAL_SERVER_ERROR
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } | AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Relay(RelayError::MissingToken) => StatusCode::BAD_REQUEST,
            AppError::Relay(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let error_response = match &self {
            AppError::Internal { source } => {
                tracing::error!(error = ?source, "Internal error");
                ErrorResponse::new("An internal server error occurred")
            }
            _ => {
                let response = ErrorResponse::new(self.to_string());
                match self.hint() {
                    Some(hint) => response.with_hint(hint),
                    None => response,
                }
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Rewrites error responses that are not JSON into the standard error body.
///
/// Handler errors already pass through [`AppError`]; this catches the ones
/// produced by routing and by the timeout layer.
pub async fn global_error_handler(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));
    if is_json {
        return response;
    }

    let (_parts, body) = response.into_parts();
    let body_bytes = axum::body::to_bytes(body, MAX_ERROR_BODY)
        .await
        .unwrap_or_else(|_| Bytes::new());
    let original_message = String::from_utf8_lossy(&body_bytes).trim().to_string();

    let message = if original_message.is_empty() {
        default_message(status).to_string()
    } else {
        original_message
    };

    (status, Json(ErrorResponse::new(message))).into_response()
}

fn default_message(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "Bad request - invalid or malformed request",
        StatusCode::NOT_FOUND => "The requested resource was not found",
        StatusCode::METHOD_NOT_ALLOWED => "HTTP method not allowed for this endpoint",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "Unsupported media type",
        StatusCode::REQUEST_TIMEOUT => "Request timeout",
        StatusCode::PAYLOAD_TOO_LARGE => "Request payload too large",
        StatusCode::SERVICE_UNAVAILABLE => "Service temporarily unavailable",
        StatusCode::INTERNAL_SERVER_ERROR => "An internal server error occurred",
        _ => "An unknown error occurred",
    }
}
