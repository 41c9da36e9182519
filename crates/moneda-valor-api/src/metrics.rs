use actix_web::http::StatusCode;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Encoder, Histogram,
    IntCounter, IntCounterVec, TextEncoder,
};
use std::sync::LazyLock;

pub static REQUESTS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "moneda_valor_requests_total",
        "Requests by matched route and status",
        &["route", "status"]
    )
    .unwrap()
});

pub static AUTH_FAILURES: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "moneda_valor_auth_failures_total",
        "Rejected API key checks",
        &["reason"]
    )
    .unwrap()
});

pub static DB_ERRORS: LazyLock<IntCounter> = LazyLock::new(|| {
    register_int_counter!("moneda_valor_db_errors_total", "Failed database queries").unwrap()
});

pub static QUERY_LATENCY: LazyLock<Histogram> = LazyLock::new(|| {
    register_histogram!(
        "moneda_valor_query_latency_seconds",
        "Database round trip latency, connection open included",
        vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    )
    .unwrap()
});

/// Count a finished request. `route` is the matched pattern, never the raw path.
pub fn observe_request(route: &str, status: StatusCode) {
    REQUESTS_TOTAL
        .with_label_values(&[route, status.as_str()])
        .inc();
}

pub fn metrics_output() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
