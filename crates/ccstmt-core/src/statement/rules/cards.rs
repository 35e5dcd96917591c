//! Card number post-processing.

use crate::error::ExtractionError;

/// Keep only the last four digits of a (usually masked) card number.
///
/// `"XXXX XXXX XXXX 1234"` and `"4375-5100-0000-1234"` both yield `"1234"`.
pub fn last_four(raw: &str) -> Result<String, ExtractionError> {
    let digits: Vec<char> = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 4 {
        return Err(ExtractionError::ShortCardNumber(raw.trim().to_string()));
    }
    Ok(digits[digits.len() - 4..].iter().collect())
}
