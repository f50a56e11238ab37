use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::fmt;
use wert::WertError;

use crate::metrics::SESSIONS;

/// Failure of `POST /api/wert/session`, rendered as `{"error": ...}`.
#[derive(Debug)]
pub struct SessionError(pub WertError);

impl SessionError {
    fn outcome(&self) -> &'static str {
        match self.0 {
            WertError::InvalidQuantity(_) => "invalid_quantity",
            WertError::Encoding(_) => "encoding_failed",
            WertError::Signing(_) | WertError::InvalidKey(_) => "signing_failed",
        }
    }
}

impl From<WertError> for SessionError {
    fn from(e: WertError) -> Self {
        SessionError(e)
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for SessionError {}

impl ResponseError for SessionError {
    fn status_code(&self) -> StatusCode {
        if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse {
        SESSIONS.with_label_values(&[self.outcome()]).inc();
        match &self.0 {
            WertError::InvalidQuantity(reason) => {
                tracing::warn!(reason = %reason, "rejected session request");
                HttpResponse::BadRequest().json(serde_json::json!({
                    "error": "Invalid quantity"
                }))
            }
            other => {
                tracing::error!(error = %other, "session creation failed");
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": other.to_string()
                }))
            }
        }
    }
}
