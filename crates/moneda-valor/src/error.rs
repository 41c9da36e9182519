use thiserror::Error;

/// Errors returned by store queries.
#[derive(Debug, Error)]
pub enum MonedaValorError {
    #[error("{0}")]
    Database(#[from] rusqlite::Error),

    #[error("row {id} has an unreadable valor: {reason}")]
    InvalidValue { id: i64, reason: String },
}
