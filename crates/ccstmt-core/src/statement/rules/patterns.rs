//! Shared regex building blocks and the generic fallback patterns.
//!
//! Bank-specific patterns live in the profile table. The generic patterns here are
//! appended after them so that every field gets a layout-independent last resort.

use lazy_static::lazy_static;
use regex::Regex;

/// Amount with optional comma grouping and two decimals, e.g. `1,23,456.00` or
/// `12345.00`. Without decimals the token must end on a word boundary, so a match
/// never stops inside a number.
pub const AMOUNT: &str = r"\d[\d,]*(?:\.\d{2}|\b)";

/// Substitute the `{AMT}` placeholder used in profile patterns.
pub fn expand(pattern: &str) -> String {
    pattern.replace("{AMT}", AMOUNT)
}

/// Generic cardholder name patterns.
pub const GENERIC_NAME: &[&str] = &[
    r"(?i)(?:Cardholder'?s?\s*Name|Name\s*[:=])\s*([A-Z][A-Za-z ]+)",
    r"(?i)(?:Card\s*Name|Account\s*Name)\s*[:=]?\s*([A-Z][A-Za-z ]+)",
];

/// Generic card number patterns: labeled, plain 16 digits, then masked forms.
pub const GENERIC_CARD: &[&str] = &[
    r"(?i)(?:Card\s*Number|Card\s*No\.?|CC\s*No\.?)[:\s]+([0-9X\*][0-9X\* -]*[0-9X\*])",
    r"\b(\d{4}[ -]?\d{4}[ -]?\d{4}[ -]?\d{4})\b",
    r"(?i)\b(\d{4}[ -]?(?:[X\*]{4}|\d{2}[X\*]{2})[ -]?[X\*]{4}[ -]?\d{4})\b",
    r"(?i)((?:[X\*]{4}[ -]?){3}\d{4})\b",
];

/// Generic credit limit patterns.
pub const GENERIC_CREDIT_LIMIT: &[&str] = &[
    r"(?i)(?:Total\s*Credit\s*Limit|Credit\s*Limit)[:\s=]+(?:₹|Rs\.?|INR)?\s*(\d[\d,]*(?:\.\d{2})?)",
    r"(?i)Credit\s*Limit[:\s=]+(?:\$|€|£)?\s*(\d[\d,]*(?:\.\d{2})?)",
];

/// Generic total due patterns.
pub const GENERIC_TOTAL_DUE: &[&str] = &[
    r"(?i)(?:Total\s*(?:Amount|Payment)?\s*Due|Total\s*Dues)[:\s=]+(?:₹|Rs\.?|INR)?\s*(\d[\d,]*(?:\.\d{2})?)",
    r"(?i)(?:Amount\s*Due|Total\s*Outstanding)[:\s=]+(?:\$|€|£|₹|Rs\.?|INR)?\s*(\d[\d,]*(?:\.\d{2})?)",
];

/// Generic payment due date patterns.
pub const GENERIC_DUE_DATE: &[&str] = &[
    r"(?i)(?:Payment\s*)?Due\s*Date[:\s=]+(\d{1,2}[/-]\d{1,2}[/-]\d{2,4}|\d{1,2}-[A-Za-z]{3}-\d{2,4}|[A-Za-z]{3,9}\.?\s+\d{1,2},\s*\d{4})",
];

lazy_static! {
    /// First numeric token in a captured amount.
    pub static ref AMOUNT_TOKEN: Regex = Regex::new(
        r"\d[\d,]*(?:\.\d+)?"
    ).unwrap();

    /// `--- Page N ---` separators inserted by the PDF text source.
    pub static ref PAGE_MARKER: Regex = Regex::new(
        r"(?m)^\s*-{3}\s*Page\s+\d+\s*-{3}\s*$"
    ).unwrap();

    /// Horizontal whitespace runs (newlines excluded).
    pub static ref HORIZONTAL_SPACE: Regex = Regex::new(
        r"[^\S\n]+"
    ).unwrap();

    /// Any whitespace run.
    pub static ref WHITESPACE: Regex = Regex::new(
        r"\s+"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_amount_placeholder() {
        let pattern = expand(r"Total\s+({AMT})");
        let re = Regex::new(&pattern).unwrap();
        let caps = re.captures("Total 1,234.50").unwrap();
        assert_eq!(&caps[1], "1,234.50");
    }

    #[test]
    fn test_amount_takes_whole_number() {
        let re = Regex::new(&expand(r"Due\s+({AMT})")).unwrap();
        for (text, expected) in [
            ("Due 12345.00 Dr", "12345.00"),
            ("Due 1,32,000.00", "1,32,000.00"),
            ("Due 250000", "250000"),
            ("Due 1,234.50, thanks", "1,234.50"),
            ("Due 2,500.50Dr", "2,500.50"),
        ] {
            assert_eq!(&re.captures(text).unwrap()[1], expected, "{}", text);
        }
    }

    #[test]
    fn test_generic_patterns_compile() {
        for p in GENERIC_NAME
            .iter()
            .chain(GENERIC_CARD)
            .chain(GENERIC_CREDIT_LIMIT)
            .chain(GENERIC_TOTAL_DUE)
            .chain(GENERIC_DUE_DATE)
        {
            assert!(Regex::new(p).is_ok(), "pattern failed to compile: {}", p);
        }
    }

    #[test]
    fn test_page_marker() {
        assert!(PAGE_MARKER.is_match("--- Page 2 ---"));
        assert!(!PAGE_MARKER.is_match("Page 2 of 3"));
    }
}
