use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{middleware::Logger, web, App, Error};

use crate::cors::build_cors;
use crate::error::ApiError;
use crate::metrics;
use crate::middleware::ApiKeyGuard;
use crate::routes;
use crate::state::AppState;

/// Assemble the full application: CORS, access log, request metrics, the
/// open routes (`/`, `/health`) and the key-guarded ones (`/api/*`, `/metrics`).
pub fn build_app(
    state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let api_key = state.config.api_key.clone();
    let cors = build_cors(&state.config.allowed_origins);

    App::new()
        .app_data(state)
        .app_data(web::PathConfig::default().error_handler(|err, _req| {
            ApiError::NotFound(format!("No record at this path: {}", err)).into()
        }))
        .app_data(web::QueryConfig::default().error_handler(|err, _req| {
            ApiError::BadRequest(format!("Invalid query string: {}", err)).into()
        }))
        .wrap_fn(|req, srv| {
            let fut = srv.call(req);
            async move {
                let res = fut.await?;
                let route = res
                    .request()
                    .match_pattern()
                    .unwrap_or_else(|| "unmatched".to_string());
                metrics::observe_request(&route, res.status());
                Ok(res)
            }
        })
        .wrap(Logger::default())
        .wrap(cors)
        .service(
            web::resource("/")
                .route(web::get().to(routes::root::index))
                .default_service(web::to(routes::method_not_allowed)),
        )
        .service(
            web::resource("/health")
                .route(web::get().to(routes::health::health))
                .default_service(web::to(routes::method_not_allowed)),
        )
        .service(
            web::resource("/metrics")
                .wrap(ApiKeyGuard::new(&api_key))
                .route(web::get().to(routes::health::metrics_endpoint))
                .default_service(web::to(routes::method_not_allowed)),
        )
        .service(
            web::scope("/api")
                .wrap(ApiKeyGuard::new(&api_key))
                .configure(routes::moneda_valor::configure)
                .default_service(web::to(routes::not_found)),
        )
        .default_service(web::to(routes::not_found))
}
