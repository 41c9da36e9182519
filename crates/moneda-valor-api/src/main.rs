use actix_web::{web, HttpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use moneda_valor_api::{build_app, ApiConfig, AppState};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match ApiConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Refusing to start: {}", e);
            std::process::exit(1);
        }
    };

    let host = config.host.clone();
    let port = config.port;

    tracing::info!("Starting {} v{} on {}:{}", config.app_title, config.app_version, host, port);
    tracing::info!("Database: {}", config.db_path.display());
    tracing::info!("CORS origins: {:?}", config.allowed_origins);

    let state = web::Data::new(AppState::new(config));

    match state.store.ping() {
        Ok(()) => tracing::info!("Database reachable"),
        Err(e) => tracing::warn!("Database not reachable at startup: {}", e),
    }

    HttpServer::new(move || build_app(state.clone()))
        .bind((host.as_str(), port))?
        .run()
        .await
}
