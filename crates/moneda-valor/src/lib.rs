//! Read-only access to the `moneda_valor` currency table.
//!
//! Everything the HTTP facade needs that is not HTTP:
//!
//! - [`record`]: [`MonedaValor`] rows and the `{count, data}` list envelope
//! - [`auth`]: the `X-API-Key` shared-secret check ([`check_api_key`])
//! - [`store`]: per-call SQLite connections and the parameterized queries ([`MonedaValorStore`])
//! - [`sap`]: the 237-column SAP TBD4/RINID exchange-rate line ([`format_sap_line`])
//!
//! Values are carried as [`rust_decimal::Decimal`] from the database cell to
//! the serialized response, so `4520.80` never turns into `4520.799999`.

pub mod auth;
pub mod constants;
pub mod error;
pub mod record;
pub mod sap;
pub mod store;

pub use auth::{check_api_key, AuthError};
pub use constants::API_KEY_HEADER;
pub use error::MonedaValorError;
pub use record::{MonedaValor, MonedaValorList};
pub use sap::{format_sap_line, SapFeedProfile, SapFormatError, SAP_LINE_WIDTH};
pub use store::MonedaValorStore;
