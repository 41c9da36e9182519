pub mod health;
pub mod moneda_valor;
pub mod root;

use actix_web::{web, HttpRequest, HttpResponse};
use ::moneda_valor::{MonedaValorError, MonedaValorStore};
use std::sync::Arc;

use crate::error::ApiError;
use crate::metrics;
use crate::state::AppState;

/// Run one store call on the blocking pool. The connection it opens lives and
/// dies inside the closure.
pub(crate) async fn run_query<T, F>(state: &AppState, query: F) -> Result<T, ApiError>
where
    F: FnOnce(&MonedaValorStore) -> Result<T, MonedaValorError> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(&state.store);
    let timer = metrics::QUERY_LATENCY.start_timer();
    let result = web::block(move || query(store.as_ref())).await?;
    timer.observe_duration();

    result.map_err(|e| {
        metrics::DB_ERRORS.inc();
        ApiError::Query(e)
    })
}

/// Fallback for paths no route matches.
pub async fn not_found(req: HttpRequest) -> Result<HttpResponse, ApiError> {
    Err(ApiError::NotFound(format!("No route for {}", req.path())))
}

/// Fallback for a known path called with anything but GET.
pub async fn method_not_allowed(req: HttpRequest) -> Result<HttpResponse, ApiError> {
    Err(ApiError::MethodNotAllowed(req.method().to_string()))
}
