//! `X-API-Key` gate in front of protected routes.
//!
//! Wraps a scope or resource and runs [`check_api_key`] before routing into
//! it. A failed check short-circuits with the 401 body from
//! [`ApiError::Unauthorized`]; handlers and their extractors never run.

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, ResponseError};
use moneda_valor::{check_api_key, API_KEY_HEADER};
use std::future::{ready, Future, Ready};
use std::pin::Pin;
use std::sync::Arc;

use crate::error::ApiError;
use crate::metrics;

pub struct ApiKeyGuard {
    expected: Arc<str>,
}

impl ApiKeyGuard {
    pub fn new(expected: &str) -> Self {
        Self {
            expected: Arc::from(expected),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ApiKeyGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = ApiKeyGuardService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ApiKeyGuardService {
            service,
            expected: Arc::clone(&self.expected),
        }))
    }
}

pub struct ApiKeyGuardService<S> {
    service: S,
    expected: Arc<str>,
}

impl<S, B> Service<ServiceRequest> for ApiKeyGuardService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let outcome = check_api_key(
            req.headers().get(API_KEY_HEADER).map(|v| v.as_bytes()),
            &self.expected,
        );

        if let Err(reason) = outcome {
            tracing::warn!(
                path = %req.path(),
                reason = reason.reason(),
                "rejected request: {}",
                reason
            );
            metrics::AUTH_FAILURES
                .with_label_values(&[reason.reason()])
                .inc();

            let response = ApiError::Unauthorized(reason).error_response();
            let res = req.into_response(response).map_into_right_body();
            return Box::pin(async move { Ok(res) });
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpResponse};

    async fn ok() -> HttpResponse {
        HttpResponse::Ok().body("through")
    }

    #[actix_rt::test]
    async fn guard_blocks_and_admits() {
        let app = test::init_service(
            App::new().service(
                web::scope("/p")
                    .wrap(ApiKeyGuard::new("k-123"))
                    .route("", web::get().to(ok)),
            ),
        )
        .await;

        let req = test::TestRequest::get().uri("/p").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 401);

        let req = test::TestRequest::get()
            .uri("/p")
            .insert_header(("X-API-Key", "K-123"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 401);

        let req = test::TestRequest::get()
            .uri("/p")
            .insert_header(("x-api-key", "k-123"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(test::read_body(resp).await, "through");
    }
}
