use prometheus::{
    register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec,
    TextEncoder,
};
use std::sync::LazyLock;

pub static REQUESTS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "wert_server_requests_total",
        "Total HTTP requests",
        &["endpoint", "status"]
    )
    .unwrap()
});

pub static SESSIONS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "wert_server_sessions_total",
        "Session requests by outcome",
        &["result"]
    )
    .unwrap()
});

pub static WEBHOOKS: LazyLock<IntCounter> = LazyLock::new(|| {
    register_int_counter!("wert_server_webhooks_total", "Webhook deliveries received").unwrap()
});

pub fn metrics_output() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
