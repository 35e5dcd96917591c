//! Text cleanup before detection and field matching.

use super::rules::patterns::{HORIZONTAL_SPACE, PAGE_MARKER, WHITESPACE};

/// Prepare extracted text for field patterns.
///
/// Line structure and case are kept because the bank patterns anchor on both.
/// Page markers are dropped, runs of spaces and tabs collapse to one space, and
/// blank lines disappear.
pub fn clean_text(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");
    let without_markers = PAGE_MARKER.replace_all(&unified, "");

    without_markers
        .lines()
        .map(|line| HORIZONTAL_SPACE.replace_all(line, " ").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Lowercase with all whitespace collapsed to single spaces; the form keywords are matched against.
pub fn normalize_for_matching(raw: &str) -> String {
    WHITESPACE.replace_all(raw, " ").trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_clean_text() {
        let raw = "--- Page 1 ---\r\n  HDFC   Bank\t Credit Card \r\n\r\n\nName : JOHN  DOE\n--- Page 2 ---\nTotal Dues";
        assert_eq!(
            clean_text(raw),
            "HDFC Bank Credit Card\nName : JOHN DOE\nTotal Dues"
        );
    }

    #[test]
    fn test_normalize_for_matching() {
        assert_eq!(
            normalize_for_matching("  AXIS\n  BANK   Limited\t"),
            "axis bank limited"
        );
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(clean_text(" \n \n"), "");
        assert_eq!(normalize_for_matching(""), "");
    }
}
