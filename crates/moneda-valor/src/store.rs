use rusqlite::types::{Type, ValueRef};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::DEFAULT_CONNECT_TIMEOUT;
use crate::error::MonedaValorError;
use crate::record::MonedaValor;

/// `tipo_moneda` stripped of the same characters `str::trim` strips (Unicode
/// `White_Space`). One-argument `TRIM` only removes spaces.
macro_rules! trimmed_tipo {
    () => {
        "TRIM(tipo_moneda, char(9, 10, 11, 12, 13, 32, 133, 160, 5760, 8192, 8193, \
         8194, 8195, 8196, 8197, 8198, 8199, 8200, 8201, 8202, 8232, 8233, 8239, 8287, 12288))"
    };
}

const SELECT_ALL: &str = "SELECT id, tipo_moneda, valor FROM moneda_valor ORDER BY id";

const SELECT_BY_TIPO: &str = concat!(
    "SELECT id, tipo_moneda, valor FROM moneda_valor WHERE ",
    trimmed_tipo!(),
    " = ?1 ORDER BY id"
);

const SELECT_BY_ID: &str = "SELECT id, tipo_moneda, valor FROM moneda_valor WHERE id = ?1";

const SELECT_LATEST: &str =
    "SELECT id, tipo_moneda, valor FROM moneda_valor ORDER BY id DESC LIMIT 1";

const SELECT_LATEST_BY_TIPO: &str = concat!(
    "SELECT id, tipo_moneda, valor FROM moneda_valor WHERE ",
    trimmed_tipo!(),
    " = ?1 ORDER BY id DESC LIMIT 1"
);

/// Read-only query executor over the `moneda_valor` table.
///
/// Holds no connection. Every call opens its own read-only connection and
/// drops it before returning, whichever way the call ends.
#[derive(Debug, Clone)]
pub struct MonedaValorStore {
    path: PathBuf,
    busy_timeout: Duration,
}

impl MonedaValorStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    fn connect(&self) -> Result<Connection, MonedaValorError> {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(self.busy_timeout)?;
        Ok(conn)
    }

    /// All rows, or only those whose trimmed `tipo_moneda` equals the trimmed
    /// filter. A blank filter is the same as no filter.
    pub fn list(&self, tipo_moneda: Option<&str>) -> Result<Vec<MonedaValor>, MonedaValorError> {
        let conn = self.connect()?;

        let rows = match normalize_filter(tipo_moneda) {
            Some(tipo) => {
                let mut stmt = conn.prepare(SELECT_BY_TIPO)?;
                let rows = stmt
                    .query_map(params![tipo], RawRow::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt = conn.prepare(SELECT_ALL)?;
                let rows = stmt
                    .query_map([], RawRow::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
        };

        tracing::debug!(rows = rows.len(), "listed moneda_valor");
        rows.into_iter().map(RawRow::into_record).collect()
    }

    /// Single row by primary key.
    pub fn get(&self, id: i64) -> Result<Option<MonedaValor>, MonedaValorError> {
        let conn = self.connect()?;
        conn.query_row(SELECT_BY_ID, params![id], RawRow::from_row)
            .optional()?
            .map(RawRow::into_record)
            .transpose()
    }

    /// Row with the highest `id`, optionally restricted to one `tipo_moneda`.
    pub fn latest(&self, tipo_moneda: Option<&str>) -> Result<Option<MonedaValor>, MonedaValorError> {
        let conn = self.connect()?;
        let row = match normalize_filter(tipo_moneda) {
            Some(tipo) => conn
                .query_row(SELECT_LATEST_BY_TIPO, params![tipo], RawRow::from_row)
                .optional()?,
            None => conn.query_row(SELECT_LATEST, [], RawRow::from_row).optional()?,
        };
        row.map(RawRow::into_record).transpose()
    }

    /// Open a connection and run `SELECT 1`.
    pub fn ping(&self) -> Result<(), MonedaValorError> {
        let conn = self.connect()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }
}

fn normalize_filter(filter: Option<&str>) -> Option<&str> {
    filter.map(str::trim).filter(|s| !s.is_empty())
}

/// `valor` cell as read, before decimal conversion.
#[derive(Debug)]
enum RawValor {
    Text(String),
    Integer(i64),
    Real(f64),
    Unsupported(Type),
}

#[derive(Debug)]
struct RawRow {
    id: i64,
    tipo_moneda: String,
    valor: RawValor,
}

impl RawRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let valor = match row.get_ref(2)? {
            ValueRef::Text(bytes) => RawValor::Text(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Integer(n) => RawValor::Integer(n),
            ValueRef::Real(f) => RawValor::Real(f),
            other => RawValor::Unsupported(other.data_type()),
        };
        Ok(Self {
            id: row.get(0)?,
            tipo_moneda: row.get(1)?,
            valor,
        })
    }

    fn into_record(self) -> Result<MonedaValor, MonedaValorError> {
        let id = self.id;
        let invalid = |reason: String| MonedaValorError::InvalidValue { id, reason };

        let valor = match self.valor {
            RawValor::Text(text) => Decimal::from_str(text.trim())
                .map_err(|e| invalid(format!("{text:?}: {e}")))?,
            RawValor::Integer(n) => Decimal::from(n),
            // REAL cells are already binary floats; go through the shortest
            // round-trip text so the decimal does not pick up float noise.
            RawValor::Real(f) => Decimal::from_str(&f.to_string())
                .map_err(|e| invalid(format!("{f}: {e}")))?,
            RawValor::Unsupported(ty) => return Err(invalid(format!("unsupported column type {ty}"))),
        };

        Ok(MonedaValor::new(id, &self.tipo_moneda, valor))
    }
}
