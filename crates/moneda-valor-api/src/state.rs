use crate::config::ApiConfig;
use moneda_valor::MonedaValorStore;
use std::sync::Arc;

/// Shared application state. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ApiConfig>,
    pub store: Arc<MonedaValorStore>,
}

impl AppState {
    pub fn new(config: ApiConfig) -> Self {
        let store = MonedaValorStore::new(config.db_path.clone()).with_busy_timeout(config.db_timeout);

        Self {
            config: Arc::new(config),
            store: Arc::new(store),
        }
    }
}
