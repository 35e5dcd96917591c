//! Ordered regex field extraction.

use regex::Regex;
use tracing::{debug, trace};

use super::profiles::BankProfile;
use super::rules::{ExtractionMatch, FieldExtractor, Guard, PostProcess};
use crate::error::ExtractionError;
use crate::models::{FieldName, FieldResults};

/// One regex for a field, optionally guarded.
///
/// The value comes from the named group `value` when present, otherwise group 1.
#[derive(Debug, Clone)]
pub struct FieldPattern {
    regex: Regex,
    guard: Option<Guard>,
}

impl FieldPattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            guard: None,
        })
    }

    pub fn with_guard(mut self, guard: Guard) -> Self {
        self.guard = Some(guard);
        self
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// First match whose capture passes the guard.
    fn first_match(&self, text: &str, index: usize) -> Option<ExtractionMatch<String>> {
        self.matches(text, index).into_iter().next()
    }

    fn matches(&self, text: &str, index: usize) -> Vec<ExtractionMatch<String>> {
        self.regex
            .captures_iter(text)
            .filter_map(|caps| {
                let value = caps.name("value").or_else(|| caps.get(1))?;
                if let Some(guard) = &self.guard {
                    if !guard.accepts(value.as_str()) {
                        trace!("guard rejected {:?} for /{}/", value.as_str(), self.as_str());
                        return None;
                    }
                }
                let whole = caps.get(0)?;
                Some(
                    ExtractionMatch::new(value.as_str().to_string(), index, whole.as_str())
                        .with_position(value.start(), value.end()),
                )
            })
            .collect()
    }
}

/// Ordered patterns for one field plus its post-processing rule.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub field: FieldName,
    pub post: PostProcess,
    patterns: Vec<FieldPattern>,
}

impl FieldRule {
    pub fn new(field: FieldName, patterns: Vec<FieldPattern>) -> Self {
        Self {
            field,
            post: PostProcess::for_field(field),
            patterns,
        }
    }

    pub fn patterns(&self) -> &[FieldPattern] {
        &self.patterns
    }

    /// Run the first matching pattern and post-process its capture.
    ///
    /// `Ok(None)` means no pattern matched. `Err` means a pattern matched but the
    /// value could not be normalized; later patterns are not consulted.
    pub fn apply(&self, text: &str) -> Result<Option<String>, ExtractionError> {
        match self.extract(text) {
            Some(hit) => {
                debug!(
                    "{} matched pattern #{}: {:?}",
                    self.field, hit.pattern_index, hit.value
                );
                self.post.apply(&hit.value).map(Some)
            }
            None => Ok(None),
        }
    }
}

impl FieldExtractor for FieldRule {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.patterns
            .iter()
            .enumerate()
            .find_map(|(i, pattern)| pattern.first_match(text, i))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.patterns
            .iter()
            .enumerate()
            .flat_map(|(i, pattern)| pattern.matches(text, i))
            .collect()
    }
}

/// Apply every rule of a profile to cleaned text.
///
/// Returns the post-processed values and the warnings raised by post-processing.
pub fn extract_fields(profile: &BankProfile, text: &str) -> (FieldResults, Vec<ExtractionError>) {
    let mut fields = FieldResults::new();
    let mut warnings = Vec::new();

    for rule in &profile.rules {
        match rule.apply(text) {
            Ok(Some(value)) => fields.insert(rule.field, value),
            Ok(None) => debug!("{}: no pattern matched for {}", profile.bank, rule.field),
            Err(e) => warnings.push(e),
        }
    }

    (fields, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::rules::patterns::GENERIC_TOTAL_DUE;

    fn rule(field: FieldName, patterns: &[&str]) -> FieldRule {
        FieldRule::new(
            field,
            patterns.iter().map(|p| FieldPattern::new(p).unwrap()).collect(),
        )
    }

    #[test]
    fn test_first_pattern_wins() {
        let r = rule(FieldName::TotalDue, &[r"Due:\s*(\d+)", r"Total:\s*(\d+)"]);
        let hit = r.extract("Total: 10\nDue: 20").unwrap();
        assert_eq!(hit.value, "20");
        assert_eq!(hit.pattern_index, 0);
    }

    #[test]
    fn test_fallback_pattern() {
        let r = rule(FieldName::TotalDue, &[r"Due:\s*(\d+)", r"Total:\s*(\d+)"]);
        let hit = r.extract("Total: 10").unwrap();
        assert_eq!(hit.value, "10");
        assert_eq!(hit.pattern_index, 1);
    }

    #[test]
    fn test_guard_skips_to_next_match() {
        let pattern = FieldPattern::new(r"LIMIT\s+([\d,]+)")
            .unwrap()
            .with_guard(Guard::MinAmount(50_000));
        let r = FieldRule::new(FieldName::CreditLimit, vec![pattern]);

        assert_eq!(
            r.apply("LIMIT 2,000\nLIMIT 1,50,000").unwrap(),
            Some("150000.00".to_string())
        );
    }

    #[test]
    fn test_named_value_group() {
        let r = rule(FieldName::TotalDue, &[r"(\d{2}/\d{2}/\d{4})\s+(?P<value>[\d,.]+)"]);
        assert_eq!(r.apply("12/05/2023 4,500.00").unwrap(), Some("4500.00".to_string()));
    }

    #[test]
    fn test_generic_total_due() {
        let r = rule(FieldName::TotalDue, GENERIC_TOTAL_DUE);
        assert_eq!(
            r.apply("Total Amount Due: Rs. 15,000.00").unwrap(),
            Some("15000.00".to_string())
        );
    }

    #[test]
    fn test_unparseable_value_is_error() {
        let r = rule(FieldName::PaymentDueDate, &[r"Due Date:\s*(\S+)"]);
        assert_eq!(
            r.apply("Due Date: 99/99/9999"),
            Err(ExtractionError::UnrecognizedDate("99/99/9999".to_string()))
        );
        assert_eq!(r.apply("nothing here"), Ok(None));
    }

    #[test]
    fn test_extract_all_in_pattern_order() {
        let r = rule(FieldName::TotalDue, &[r"B(\d)", r"A(\d)"]);
        let all: Vec<String> = r.extract_all("A1 B2 A3").into_iter().map(|m| m.value).collect();
        assert_eq!(all, vec!["2", "1", "3"]);
    }
}
