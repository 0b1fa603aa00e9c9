// ==========================================
// Vendas Ingest - Brazilian-locale parsers
// ==========================================
// Pure functions converting locale-formatted ledger tokens
// into canonical values. The date parser returns an explicit
// Err for unparsable tokens; the fallback policy (reference
// date vs. skip) belongs to the pipeline variant, not here.
// The currency parser is total and never fails.
// ==========================================

use crate::ingest::error::{IngestError, IngestResult};
use chrono::NaiveDate;

/// Portuguese month names, in calendar order.
const MONTH_NAMES: [&str; 12] = [
    "janeiro", "fevereiro", "março", "abril", "maio", "junho", "julho", "agosto", "setembro",
    "outubro", "novembro", "dezembro",
];

/// Map a Portuguese month name to its 1-12 number.
///
/// Unrecognized names default to January (lenient fallback the
/// ledger format has always relied on, not an error).
pub fn month_number(name: &str) -> u32 {
    let lowered = name.trim().to_lowercase();
    MONTH_NAMES
        .iter()
        .position(|m| *m == lowered)
        .map(|idx| idx as u32 + 1)
        .unwrap_or(1)
}

/// Parse a ledger date token of the form `<day> de <MonthName>`
/// (e.g. "01 de Setembro") into a date in the given reference year.
///
/// The exports never carry a year; the caller supplies it from the
/// configured YearPolicy.
///
/// # Errors
/// - UnparsableDate: missing "de" separator, non-numeric day,
///   day outside 1-31, or a day invalid for the resolved month
pub fn parse_ledger_date(token: &str, reference_year: i32) -> IngestResult<NaiveDate> {
    let unparsable = || IngestError::UnparsableDate {
        value: token.to_string(),
    };

    let mut parts = token.split_whitespace();
    let day_token = parts.next().ok_or_else(unparsable)?;
    let separator = parts.next().ok_or_else(unparsable)?;
    let month_token = parts.next().ok_or_else(unparsable)?;

    if !separator.eq_ignore_ascii_case("de") {
        return Err(unparsable());
    }

    let day: u32 = day_token.parse().map_err(|_| unparsable())?;
    if !(1..=31).contains(&day) {
        return Err(unparsable());
    }

    let month = month_number(month_token);
    NaiveDate::from_ymd_opt(reference_year, month, day).ok_or_else(unparsable)
}

/// Parse a Brazilian-formatted money string (e.g. "R$ 1.234,56",
/// "-R$ 12,00") into a signed decimal value.
///
/// Strips the currency symbol and whitespace, drops thousands
/// separators, swaps the decimal comma for a dot, and preserves a
/// leading minus. Blank or unparsable input normalizes to 0.0; a
/// missing or blank monetary field is stored as zero, never as a
/// missing value.
pub fn parse_currency(token: &str) -> f64 {
    let cleaned: String = token
        .replace("R$", "")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if cleaned.is_empty() {
        return 0.0;
    }

    if let Some(rest) = cleaned.strip_prefix('-') {
        return rest.parse::<f64>().map(|v| -v).unwrap_or(0.0);
    }

    cleaned.parse::<f64>().unwrap_or(0.0)
}
