use moneda_valor::SapFeedProfile;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_DB_TIMEOUT_SECS: u64 = 30;
const DEFAULT_APP_TITLE: &str = "MonedaValor API";

#[derive(Clone)]
pub struct ApiConfig {
    /// SQLite database file holding `moneda_valor`
    pub db_path: PathBuf,
    /// Busy timeout for each per-request connection
    pub db_timeout: Duration,
    /// Expected `X-API-Key` value
    pub api_key: String,
    pub host: String,
    pub port: u16,
    /// CORS allowed origins (`*` = any)
    pub allowed_origins: Vec<String>,
    pub app_title: String,
    pub app_version: String,
    /// Static columns of the SAP datafeed line
    pub sap: SapFeedProfile,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("db_path", &self.db_path)
            .field("db_timeout", &self.db_timeout)
            .field("api_key", &"[REDACTED]")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("allowed_origins", &self.allowed_origins)
            .field("app_title", &self.app_title)
            .field("app_version", &self.app_version)
            .field("sap", &self.sap)
            .finish()
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the config from any variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        // Required
        let db_path = var("DB_PATH")
            .map(PathBuf::from)
            .ok_or(ConfigError::MissingRequired("DB_PATH"))?;
        let api_key = var("API_KEY").ok_or(ConfigError::MissingRequired("API_KEY"))?;

        // Optional
        let host = var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or("PORT", var("PORT"), DEFAULT_PORT)?;
        let db_timeout = Duration::from_secs(parse_or(
            "DB_TIMEOUT_SECS",
            var("DB_TIMEOUT_SECS"),
            DEFAULT_DB_TIMEOUT_SECS,
        )?);

        let allowed_origins: Vec<String> = var("ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_else(|| vec!["*".to_string()]);

        let app_title = var("APP_TITLE").unwrap_or_else(|| DEFAULT_APP_TITLE.to_string());
        let app_version =
            var("APP_VERSION").unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

        let defaults = SapFeedProfile::default();
        let sap = SapFeedProfile {
            feed_name: var("SAP_FEED_NAME").unwrap_or(defaults.feed_name),
            rate_type: var("SAP_RATE_TYPE").unwrap_or(defaults.rate_type),
            currency: var("SAP_CURRENCY").unwrap_or(defaults.currency),
            instrument_suffix: var("SAP_INSTRUMENT_SUFFIX").unwrap_or(defaults.instrument_suffix),
        };

        if api_key.len() < 16 {
            tracing::warn!(
                "API_KEY is short ({} bytes), use a long random value in production",
                api_key.len()
            );
        }
        if allowed_origins.iter().any(|o| o == "*") {
            tracing::info!("CORS allows any origin");
        }

        Ok(Self {
            db_path,
            db_timeout,
            api_key,
            host,
            port,
            allowed_origins,
            app_title,
            app_version,
            sap,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid {
                name,
                value: value.clone(),
            }),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingRequired(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}
