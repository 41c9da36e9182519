//! MonedaValor API: read-only HTTP access to the `moneda_valor` table for SAP.
//!
//! # Modules
//!
//! - [`config`]: environment configuration ([`ApiConfig`])
//! - [`middleware`]: `X-API-Key` gate ([`ApiKeyGuard`](middleware::ApiKeyGuard))
//! - [`routes`]: `/`, `/health`, `/metrics` and `/api/moneda-valor/*`
//! - [`error`]: HTTP error mapping ([`ApiError`])
//! - [`app`]: the assembled actix [`App`](actix_web::App) used by `main` and tests

pub mod app;
pub mod config;
pub mod cors;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use app::build_app;
pub use config::ApiConfig;
pub use error::ApiError;
pub use state::AppState;
