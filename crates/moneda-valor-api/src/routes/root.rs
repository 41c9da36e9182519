use actix_web::{web, HttpResponse};

use crate::state::AppState;

/// GET / - Service name, version and a map of the available endpoints.
pub async fn index(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "name": state.config.app_title,
        "version": state.config.app_version,
        "description": "Read-only REST access to the moneda_valor table, built for SAP",
        "health": "/health",
        "endpoints": {
            "list": "/api/moneda-valor",
            "list_filtered": "/api/moneda-valor?tipo_moneda={tipo_moneda}",
            "get_by_id": "/api/moneda-valor/{id}",
            "sap_format": "/api/moneda-valor/formato-sap",
        },
    }))
}
