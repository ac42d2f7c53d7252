//! Webhook request errors and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Everything a webhook request can fail with.
///
/// Delivery failures are deliberately absent: they happen after the
/// acknowledgment and are reported to the delivery log instead.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Verification token or mode did not match.
    #[error("webhook verification failed")]
    AuthMismatch,

    /// Required parameters missing or body not decodable at all.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// POST body without the top-level `object` marker.
    #[error("not a WhatsApp webhook event")]
    UnrecognizedEnvelope,

    /// Unexpected shape while drilling into the event.
    #[error("failed to process webhook event: {0}")]
    ProcessingFault(String),
}

impl WebhookError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::AuthMismatch => StatusCode::FORBIDDEN,
            Self::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            Self::UnrecognizedEnvelope => StatusCode::NOT_FOUND,
            Self::ProcessingFault(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// A first entry, change, message or status that does not decode.
impl From<serde_json::Error> for WebhookError {
    fn from(e: serde_json::Error) -> Self {
        Self::ProcessingFault(e.to_string())
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = status.canonical_reason().unwrap_or("Error");
        (status, body).into_response()
    }
}
