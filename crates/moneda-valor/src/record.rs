use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the `moneda_valor` table as returned to callers.
///
/// `valor` serializes as a JSON string (`"4520.80"`), keeping the scale the
/// database stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonedaValor {
    pub id: i64,
    pub tipo_moneda: String,
    pub valor: Decimal,
}

impl MonedaValor {
    /// Build a record, trimming the padding CHAR columns tend to carry.
    pub fn new(id: i64, tipo_moneda: &str, valor: Decimal) -> Self {
        Self {
            id,
            tipo_moneda: tipo_moneda.trim().to_string(),
            valor,
        }
    }
}

/// `{count, data}` envelope for the list endpoint.
///
/// Only constructible from the records themselves, so `count` always equals
/// `data.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonedaValorList {
    count: usize,
    data: Vec<MonedaValor>,
}

impl MonedaValorList {
    pub fn count(&self) -> usize {
        self.count
    }
}

impl From<Vec<MonedaValor>> for MonedaValorList {
    fn from(data: Vec<MonedaValor>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}
