use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use moneda_valor::{AuthError, MonedaValorError, SapFormatError};

/// Message for every 401. Identical for a missing and a wrong key.
pub const UNAUTHORIZED_MESSAGE: &str = "Invalid or missing API key. Send the X-API-Key header.";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or wrong `X-API-Key`
    #[error("unauthorized: {0}")]
    Unauthorized(AuthError),

    /// Lookup matched nothing
    #[error("{0}")]
    NotFound(String),

    /// Query string could not be decoded
    #[error("{0}")]
    BadRequest(String),

    /// Known path, wrong verb
    #[error("method {0} not allowed")]
    MethodNotAllowed(String),

    /// Connection, query or row mapping failure
    #[error("database query failed: {0}")]
    Query(#[from] MonedaValorError),

    /// Latest row does not fit the SAP datafeed columns
    #[error("SAP line could not be built: {0}")]
    SapFormat(#[from] SapFormatError),

    /// Blocking pool gone or the query closure panicked
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<BlockingError> for ApiError {
    fn from(e: BlockingError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::NotFound(_) => "not_found",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::MethodNotAllowed(_) => "method_not_allowed",
            ApiError::Query(_) => "query_failed",
            ApiError::SapFormat(_) => "sap_format_failed",
            ApiError::Internal(_) => "internal_error",
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Unauthorized(_) => UNAUTHORIZED_MESSAGE.to_string(),
            ApiError::NotFound(msg) | ApiError::BadRequest(msg) => msg.clone(),
            ApiError::MethodNotAllowed(_) => format!("{}. Only GET is supported.", self),
            // Carries the driver text to the caller, as the SAP integration expects.
            ApiError::Query(_) | ApiError::SapFormat(_) => self.to_string(),
            ApiError::Internal(_) => "An internal error occurred".to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Query(_) | ApiError::SapFormat(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        match self {
            ApiError::Query(e) => tracing::error!("Query error: {}", e),
            ApiError::SapFormat(e) => tracing::error!("SAP format error: {}", e),
            ApiError::Internal(msg) => tracing::error!("Internal error: {}", msg),
            _ => {}
        }

        HttpResponse::build(status).json(serde_json::json!({
            "error": self.code(),
            "status": status.as_u16(),
            "message": self.message(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_of(err: ApiError) -> (StatusCode, serde_json::Value) {
        let resp = err.error_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_rt::test]
    async fn missing_and_invalid_key_share_one_body() {
        let (s1, missing) = body_of(ApiError::Unauthorized(AuthError::MissingCredential)).await;
        let (s2, invalid) = body_of(ApiError::Unauthorized(AuthError::InvalidCredential)).await;

        assert_eq!(s1, StatusCode::UNAUTHORIZED);
        assert_eq!(s2, StatusCode::UNAUTHORIZED);
        assert_eq!(missing, invalid);
        assert_eq!(missing["status"], 401);
        assert_eq!(missing["message"], UNAUTHORIZED_MESSAGE);
    }

    #[actix_rt::test]
    async fn not_found_keeps_message() {
        let (status, body) = body_of(ApiError::NotFound("record 42 not found".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
        assert_eq!(body["message"], "record 42 not found");
    }

    #[actix_rt::test]
    async fn client_errors_share_the_json_shape() {
        let (status, body) = body_of(ApiError::BadRequest("bad query".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad_request");
        assert_eq!(body["status"], 400);

        let (status, body) = body_of(ApiError::MethodNotAllowed("POST".into())).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["status"], 405);
        assert_eq!(body["message"], "method POST not allowed. Only GET is supported.");
    }

    #[actix_rt::test]
    async fn query_failure_exposes_driver_text() {
        let err = MonedaValorError::InvalidValue {
            id: 3,
            reason: "\"abc\": invalid decimal".into(),
        };
        let (status, body) = body_of(ApiError::Query(err)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "query_failed");
        let message = body["message"].as_str().unwrap();
        assert!(message.starts_with("database query failed: "));
        assert!(message.contains("row 3"));
    }

    #[actix_rt::test]
    async fn internal_error_is_generic() {
        let (status, body) = body_of(ApiError::Internal("pool shut down".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "An internal error occurred");
    }
}
