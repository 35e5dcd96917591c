//! Payment due date normalization.

use chrono::{Datelike, NaiveDate};

use super::patterns::WHITESPACE;
use crate::error::ExtractionError;

/// Candidate formats, tried in order. Day-first forms precede month-first ones.
pub const DATE_FORMATS: [&str; 11] = [
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d/%m/%y",
    "%d-%m-%y",
    "%m/%d/%y",
    "%d-%b-%Y",
    "%d-%b-%y",
    "%B %d, %Y",
    "%b %d, %Y",
];

const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 2100;

/// Parse a statement date using the first candidate format that fits.
///
/// Four-digit-year formats also accept short years, so results outside
/// 1900..=2100 are discarded and the next candidate is tried.
pub fn parse_statement_date(raw: &str) -> Option<NaiveDate> {
    let cleaned = WHITESPACE.replace_all(raw.trim(), " ");
    let cleaned = cleaned.trim_end_matches(['.', ',', ';']);

    DATE_FORMATS.iter().find_map(|format| {
        NaiveDate::parse_from_str(cleaned, format)
            .ok()
            .filter(|date| (MIN_YEAR..=MAX_YEAR).contains(&date.year()))
    })
}

/// Normalize a date to ISO 8601 (`YYYY-MM-DD`).
pub fn normalize_date(raw: &str) -> Result<String, ExtractionError> {
    parse_statement_date(raw)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .ok_or_else(|| ExtractionError::UnrecognizedDate(raw.trim().to_string()))
}
