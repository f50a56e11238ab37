use actix_web::{get, post, web, HttpRequest, HttpResponse};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use wert::PurchaseRequest;

use crate::error::SessionError;
use crate::metrics::{self, REQUESTS, SESSIONS, WEBHOOKS};
use crate::state::AppState;

/// Constant-time byte comparison. Both inputs are hashed first so timing
/// reveals neither content nor length.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let ha = Sha256::digest(a);
    let hb = Sha256::digest(b);
    ha.ct_eq(&hb).into()
}

#[post("/api/wert/session")]
pub async fn create_session(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, SessionError> {
    let request = match PurchaseRequest::from_json(&body) {
        Ok(r) => r,
        Err(e) => {
            REQUESTS.with_label_values(&["session", "400"]).inc();
            return Err(e.into());
        }
    };

    match state.sessions.create_session(&request) {
        Ok(session) => {
            REQUESTS.with_label_values(&["session", "200"]).inc();
            SESSIONS.with_label_values(&["created"]).inc();
            Ok(HttpResponse::Ok().json(session))
        }
        Err(e) => {
            let status = if e.is_client_error() { "400" } else { "500" };
            REQUESTS.with_label_values(&["session", status]).inc();
            Err(e.into())
        }
    }
}

/// Acknowledges Wert event deliveries. The payload is never read, so no body
/// size limit applies; it is not inspected or authenticated.
#[post("/api/wert/webhook")]
pub async fn webhook(req: HttpRequest) -> HttpResponse {
    WEBHOOKS.inc();
    REQUESTS.with_label_values(&["webhook", "200"]).inc();
    let content_length = req
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");
    tracing::debug!(content_length, "wert webhook received");
    HttpResponse::Ok().body("OK")
}

#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "wert-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[get("/metrics")]
pub async fn metrics_endpoint(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    match &state.metrics_token {
        Some(token) => {
            let authorized = req
                .headers()
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
                .map(|t| constant_time_eq(t.as_bytes(), token))
                .unwrap_or(false);

            if !authorized {
                return HttpResponse::Unauthorized().json(serde_json::json!({
                    "error": "unauthorized",
                    "message": "Valid Bearer token required for /metrics"
                }));
            }
        }
        None => {
            // No token configured — metrics are protected by default.
            if !state.public_metrics {
                return HttpResponse::Forbidden().json(serde_json::json!({
                    "error": "forbidden",
                    "message": "Set METRICS_TOKEN or WERT_PUBLIC_METRICS=true to access /metrics"
                }));
            }
        }
    }
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(metrics::metrics_output())
}
