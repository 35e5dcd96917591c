//! Cardholder name cleanup and plausibility checks.

use super::patterns::WHITESPACE;
use crate::error::ExtractionError;
use crate::models::FieldName;

/// Longest name accepted by [`plausible_name`].
pub const MAX_NAME_LEN: usize = 50;

/// Collapse internal whitespace and trim.
pub fn clean_name(raw: &str) -> Result<String, ExtractionError> {
    let name = WHITESPACE.replace_all(raw.trim(), " ").into_owned();
    if name.is_empty() {
        return Err(ExtractionError::EmptyValue(FieldName::CardholderName.to_string()));
    }
    Ok(name)
}

/// A name has `min_words..=max_words` words, no single-letter words and stays
/// under [`MAX_NAME_LEN`] characters.
pub fn plausible_name(raw: &str, min_words: usize, max_words: usize) -> bool {
    let trimmed = raw.trim();
    if trimmed.chars().count() >= MAX_NAME_LEN {
        return false;
    }
    let words: Vec<&str> = trimmed.split_whitespace().collect();
    (min_words..=max_words).contains(&words.len()) && words.iter().all(|w| w.chars().count() > 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("  JOHN   A\nDOE ").unwrap(), "JOHN A DOE");
        assert!(clean_name("   ").is_err());
    }

    #[test]
    fn test_plausible_name() {
        assert!(plausible_name("RAHUL KUMAR", 2, 5));
        assert!(plausible_name("Priya Ramesh Sharma", 2, 5));
        assert!(!plausible_name("RAHUL", 2, 5));
        assert!(!plausible_name("A B", 2, 5));
        assert!(!plausible_name("ONE TWO THREE FOUR FIVE SIX", 2, 5));
        assert!(!plausible_name(
            "ABCDEFGHIJKLMNOPQRSTUVWXYZ ABCDEFGHIJKLMNOPQRSTUVWXYZ",
            2,
            5
        ));
    }
}
