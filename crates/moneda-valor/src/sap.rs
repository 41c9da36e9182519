//! SAP TBD4/RINID exchange-rate datafeed line.
//!
//! SAP's datafeed reads one fixed-width record per rate. Columns (1-based):
//!
//! | Cols    | Field    | Content                                  |
//! |---------|----------|------------------------------------------|
//! | 1-20    | RINID1   | instrument, left-aligned                 |
//! | 21-35   | RINID2   | feed name, left-aligned                  |
//! | 36-50   | SPRPTY   | rate type, left-aligned                  |
//! | 51-52   | SSTATS   | blank (OK)                               |
//! | 53-132  | ERROR    | blank                                    |
//! | 133-157 | RSUPID, RCONID, RCONCN | blank                      |
//! | 158-165 | DATE     | `YYYYMMDD`                               |
//! | 166-171 | TIME     | `HHMMSS`                                 |
//! | 172-191 | VALUE    | signed value, six decimals, right-aligned|
//! | 192-196 | CURRENCY | left-aligned                             |
//! | 197-237 | MKIND, CFFACT, CTFACT, UNAME, RZUSATZ | blank       |

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::record::MonedaValor;

/// Length of a datafeed line, without line terminator.
pub const SAP_LINE_WIDTH: usize = 237;

const RINID1_WIDTH: usize = 20;
const RINID2_WIDTH: usize = 15;
const SPRPTY_WIDTH: usize = 15;
const SSTATS_WIDTH: usize = 2;
const ERROR_WIDTH: usize = 80;
const RSUPID_WIDTH: usize = 10;
const RCONID_WIDTH: usize = 10;
const RCONCN_WIDTH: usize = 5;
const VALUE_WIDTH: usize = 20;
const CURRENCY_WIDTH: usize = 5;
const MKIND_WIDTH: usize = 5;
const CFFACT_WIDTH: usize = 7;
const CTFACT_WIDTH: usize = 7;
const UNAME_WIDTH: usize = 12;
const RZUSATZ_WIDTH: usize = 10;

const VALUE_DECIMALS: u32 = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SapFormatError {
    #[error("{field} value {value:?} is wider than its {width}-character column")]
    FieldTooLong {
        field: &'static str,
        value: String,
        width: usize,
    },

    #[error("assembled line has {0} characters, expected {width}", width = SAP_LINE_WIDTH)]
    LineLength(usize),
}

/// Static parts of the feed that the table does not carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SapFeedProfile {
    /// RINID2
    pub feed_name: String,
    /// SPRPTY
    pub rate_type: String,
    /// Quote currency written to the CURRENCY column.
    pub currency: String,
    /// Appended to `tipo_moneda` to form RINID1 (`USD` + `COPTRM`).
    pub instrument_suffix: String,
}

impl Default for SapFeedProfile {
    fn default() -> Self {
        Self {
            feed_name: "MIF".to_string(),
            rate_type: "MID".to_string(),
            currency: "COP".to_string(),
            instrument_suffix: "COPTRM".to_string(),
        }
    }
}

impl SapFeedProfile {
    pub fn instrument(&self, record: &MonedaValor) -> String {
        format!("{}{}", record.tipo_moneda, self.instrument_suffix)
    }
}

/// Render `record` as one datafeed line stamped with `quoted_at`.
pub fn format_sap_line(
    record: &MonedaValor,
    profile: &SapFeedProfile,
    quoted_at: DateTime<Utc>,
) -> Result<String, SapFormatError> {
    let mut line = String::with_capacity(SAP_LINE_WIDTH);

    line.push_str(&left("RINID1", &profile.instrument(record), RINID1_WIDTH)?);
    line.push_str(&left("RINID2", &profile.feed_name, RINID2_WIDTH)?);
    line.push_str(&left("SPRPTY", &profile.rate_type, SPRPTY_WIDTH)?);
    push_blank(
        &mut line,
        SSTATS_WIDTH + ERROR_WIDTH + RSUPID_WIDTH + RCONID_WIDTH + RCONCN_WIDTH,
    );
    line.push_str(&quoted_at.format("%Y%m%d%H%M%S").to_string());
    line.push_str(&right("VALUE", &signed_value(record), VALUE_WIDTH)?);
    line.push_str(&left("CURRENCY", &profile.currency, CURRENCY_WIDTH)?);
    push_blank(
        &mut line,
        MKIND_WIDTH + CFFACT_WIDTH + CTFACT_WIDTH + UNAME_WIDTH + RZUSATZ_WIDTH,
    );

    let len = line.chars().count();
    if len != SAP_LINE_WIDTH {
        return Err(SapFormatError::LineLength(len));
    }
    Ok(line)
}

/// `+4235.500000` / `-0.125000`
fn signed_value(record: &MonedaValor) -> String {
    let rounded = record.valor.round_dp(VALUE_DECIMALS);
    // -0.00 keeps its sign bit, so zero is checked after rounding.
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        '-'
    } else {
        '+'
    };
    let magnitude = rounded.abs();
    format!("{sign}{magnitude:.prec$}", prec = VALUE_DECIMALS as usize)
}

fn check_width(field: &'static str, value: &str, width: usize) -> Result<(), SapFormatError> {
    if value.chars().count() > width {
        return Err(SapFormatError::FieldTooLong {
            field,
            value: value.to_string(),
            width,
        });
    }
    Ok(())
}

fn left(field: &'static str, value: &str, width: usize) -> Result<String, SapFormatError> {
    check_width(field, value, width)?;
    Ok(format!("{value:<width$}"))
}

fn right(field: &'static str, value: &str, width: usize) -> Result<String, SapFormatError> {
    check_width(field, value, width)?;
    Ok(format!("{value:>width$}"))
}

fn push_blank(line: &mut String, width: usize) {
    line.extend(std::iter::repeat(' ').take(width));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn quoted_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 23, 14, 0, 0).unwrap()
    }

    fn record(tipo: &str, valor: &str) -> MonedaValor {
        MonedaValor::new(1, tipo, Decimal::from_str(valor).unwrap())
    }

    /// 1-based inclusive column slice, as the SAP layout documents it.
    fn cols(line: &str, from: usize, to: usize) -> &str {
        &line[from - 1..to]
    }

    #[test]
    fn line_has_documented_layout() {
        let line =
            format_sap_line(&record("USD", "4235.5"), &SapFeedProfile::default(), quoted_at())
                .unwrap();

        assert_eq!(line.len(), SAP_LINE_WIDTH);
        assert_eq!(cols(&line, 1, 20), "USDCOPTRM           ");
        assert_eq!(cols(&line, 21, 35), "MIF            ");
        assert_eq!(cols(&line, 36, 50), "MID            ");
        assert!(cols(&line, 51, 157).chars().all(|c| c == ' '));
        assert_eq!(cols(&line, 158, 165), "20260223");
        assert_eq!(cols(&line, 166, 171), "140000");
        assert_eq!(cols(&line, 172, 191), "        +4235.500000");
        assert_eq!(cols(&line, 192, 196), "COP  ");
        assert!(cols(&line, 197, 237).chars().all(|c| c == ' '));
        assert!(!line.ends_with('\n'));
    }

    #[test]
    fn negative_values_keep_sign_and_scale() {
        let line =
            format_sap_line(&record("EUR", "-0.125"), &SapFeedProfile::default(), quoted_at())
                .unwrap();
        assert_eq!(cols(&line, 172, 191).trim_start(), "-0.125000");
    }

    #[test]
    fn negative_zero_is_written_as_positive() {
        for valor in ["-0.00", "-0.0000001"] {
            let line =
                format_sap_line(&record("USD", valor), &SapFeedProfile::default(), quoted_at())
                    .unwrap();
            assert_eq!(cols(&line, 172, 191).trim_start(), "+0.000000", "{valor}");
        }
    }

    #[test]
    fn line_length_error_names_expected_width() {
        let err = SapFormatError::LineLength(236);
        assert_eq!(
            err.to_string(),
            "assembled line has 236 characters, expected 237"
        );
    }

    #[test]
    fn extra_precision_is_rounded_to_six_places() {
        let line = format_sap_line(
            &record("USD", "1.23456789"),
            &SapFeedProfile::default(),
            quoted_at(),
        )
        .unwrap();
        assert_eq!(cols(&line, 172, 191).trim_start(), "+1.234568");
    }

    #[test]
    fn oversized_instrument_is_rejected() {
        let profile = SapFeedProfile {
            instrument_suffix: "X".repeat(30),
            ..SapFeedProfile::default()
        };
        let err = format_sap_line(&record("USD", "1"), &profile, quoted_at()).unwrap_err();
        assert!(matches!(err, SapFormatError::FieldTooLong { field: "RINID1", .. }));
    }

    #[test]
    fn custom_profile_fields_land_in_their_columns() {
        let profile = SapFeedProfile {
            feed_name: "BANREP".to_string(),
            rate_type: "M".to_string(),
            currency: "USD".to_string(),
            instrument_suffix: String::new(),
        };
        let line = format_sap_line(&record("EUR", "1.08"), &profile, quoted_at()).unwrap();
        assert_eq!(cols(&line, 1, 20).trim_end(), "EUR");
        assert_eq!(cols(&line, 21, 35).trim_end(), "BANREP");
        assert_eq!(cols(&line, 36, 50).trim_end(), "M");
        assert_eq!(cols(&line, 192, 196).trim_end(), "USD");
    }
}
