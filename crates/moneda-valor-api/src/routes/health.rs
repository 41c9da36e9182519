use actix_web::{web, HttpResponse};

use super::run_query;
use crate::metrics;
use crate::state::AppState;

/// GET /health - Liveness plus a database reachability flag.
///
/// Always 200: an unreachable database only flips `database` to
/// `"disconnected"`, so orchestrators can tell "process up" from "degraded".
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    let database = match run_query(&state, |store| store.ping()).await {
        Ok(()) => "connected",
        Err(e) => {
            tracing::warn!("Health check could not reach the database: {}", e);
            "disconnected"
        }
    };

    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "database": database,
        "service": "moneda-valor-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /metrics - Prometheus text format. Mounted behind the API key guard.
pub async fn metrics_endpoint() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(metrics::metrics_output())
}
