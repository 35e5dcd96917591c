//! Amount normalization for credit limits and dues.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::AMOUNT_TOKEN;
use crate::error::ExtractionError;

/// Parse an amount such as `Rs. 15,000.00`, `₹1,32,000` or `2,500.50 Dr`.
///
/// Currency markers and `Dr`/`Cr` suffixes are ignored; the first numeric token wins.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let token = AMOUNT_TOKEN.find(raw)?;
    let cleaned = token.as_str().replace(',', "");
    Decimal::from_str(&cleaned).ok()
}

/// Normalize an amount to a fixed-point string with two decimals.
pub fn normalize_amount(raw: &str) -> Result<String, ExtractionError> {
    parse_amount(raw)
        .map(|amount| format!("{:.2}", amount))
        .ok_or_else(|| ExtractionError::InvalidAmount(raw.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("15,000.00"), Some(Decimal::from_str("15000.00").unwrap()));
        assert_eq!(parse_amount("Rs. 15,000.00"), Some(Decimal::from_str("15000").unwrap()));
        assert_eq!(parse_amount("₹1,32,000.50"), Some(Decimal::from_str("132000.50").unwrap()));
        assert_eq!(parse_amount("`2,500.50 Dr"), Some(Decimal::from_str("2500.50").unwrap()));
        assert_eq!(parse_amount("n/a"), None);
    }

    #[test]
    fn test_normalize_amount() {
        assert_eq!(normalize_amount("Rs. 15,000.00").unwrap(), "15000.00");
        assert_eq!(normalize_amount("30,000").unwrap(), "30000.00");
        assert_eq!(normalize_amount("1,234.5").unwrap(), "1234.50");
        assert_eq!(normalize_amount("30,000,").unwrap(), "30000.00");
    }

    #[test]
    fn test_normalize_amount_rejects_text() {
        assert_eq!(
            normalize_amount(" NIL "),
            Err(ExtractionError::InvalidAmount("NIL".to_string()))
        );
    }
}
