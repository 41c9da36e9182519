use actix_web::{web, HttpResponse};
use moneda_valor::{format_sap_line, MonedaValorList};
use serde::Deserialize;

use super::{method_not_allowed, run_query};
use crate::error::ApiError;
use crate::state::AppState;

/// `?tipo_moneda=` filter. Read from the raw pairs so a repeated key keeps
/// its last value instead of failing the request.
#[derive(Debug, Default, Deserialize)]
#[serde(from = "Vec<(String, String)>")]
pub struct TipoMonedaQuery {
    pub tipo_moneda: Option<String>,
}

impl From<Vec<(String, String)>> for TipoMonedaQuery {
    fn from(pairs: Vec<(String, String)>) -> Self {
        let tipo_moneda = pairs
            .into_iter()
            .filter(|(key, _)| key == "tipo_moneda")
            .map(|(_, value)| value)
            .last();
        Self { tipo_moneda }
    }
}

/// GET /api/moneda-valor - Every row, or only one `tipo_moneda`
pub async fn list_moneda_valor(
    query: web::Query<TipoMonedaQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let filter = query.into_inner().tipo_moneda;
    let records = run_query(&state, move |store| store.list(filter.as_deref())).await?;

    Ok(HttpResponse::Ok().json(MonedaValorList::from(records)))
}

/// GET /api/moneda-valor/{id} - One row by id
pub async fn get_moneda_valor(
    path: web::Path<i64>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let record = run_query(&state, move |store| store.get(id))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Record {} not found", id)))?;

    Ok(HttpResponse::Ok().json(record))
}

/// GET /api/moneda-valor/formato-sap - Latest row as a 237-character SAP
/// TBD4/RINID datafeed line (plain text, no terminator)
pub async fn sap_format(
    query: web::Query<TipoMonedaQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let filter = query.into_inner().tipo_moneda;
    let record = run_query(&state, move |store| store.latest(filter.as_deref()))
        .await?
        .ok_or_else(|| ApiError::NotFound("No rows found in moneda_valor".to_string()))?;

    let line = format_sap_line(&record, &state.config.sap, chrono::Utc::now())?;

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(line))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    // formato-sap before {id}
    cfg.service(
        web::resource("/moneda-valor")
            .route(web::get().to(list_moneda_valor))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/moneda-valor/formato-sap")
            .route(web::get().to(sap_format))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/moneda-valor/{id}")
            .route(web::get().to(get_moneda_valor))
            .default_service(web::to(method_not_allowed)),
    );
}
