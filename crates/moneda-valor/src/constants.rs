use std::time::Duration;

/// Header carrying the shared secret on protected routes.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Busy timeout applied to every connection unless configured otherwise.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
