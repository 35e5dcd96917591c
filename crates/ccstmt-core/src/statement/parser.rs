//! Rule-based statement parser: normalize, detect, extract, aggregate.

use std::time::Instant;

use tracing::info;

use super::aggregator::{aggregate, bank_not_detected, extraction_failed};
use super::detector::{BankDetection, BankDetector};
use super::extractor::extract_fields;
use super::normalizer::{clean_text, normalize_for_matching};
use super::profiles::{profiles, BankProfile};
use crate::error::ExtractionError;
use crate::models::{Bank, ExtractionRecord, ExtractionRequest};

/// Result of parsing one statement text.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// The record that gets exported.
    pub record: ExtractionRecord,
    /// Detection scores behind the record's bank.
    pub detection: BankDetection,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for statement parsing.
pub trait StatementParser {
    /// Parse a statement from extracted text. Failures are reported inside the record.
    fn parse(&self, request: &ExtractionRequest) -> ParseResult;
}

/// Parser driven by a table of bank profiles.
pub struct RuleStatementParser<'a> {
    profiles: &'a [BankProfile],
}

impl RuleStatementParser<'static> {
    /// Parser over the built-in profile table.
    pub fn new() -> Self {
        Self { profiles: profiles() }
    }
}

impl Default for RuleStatementParser<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> RuleStatementParser<'a> {
    pub fn with_profiles(profiles: &'a [BankProfile]) -> Self {
        Self { profiles }
    }

    /// Detection only, without field extraction.
    pub fn detect(&self, text: &str) -> BankDetection {
        BankDetector::with_profiles(self.profiles).detect(text)
    }

    fn profile(&self, bank: Bank) -> Option<&'a BankProfile> {
        self.profiles.iter().find(|p| p.bank == bank)
    }
}

impl StatementParser for RuleStatementParser<'_> {
    fn parse(&self, request: &ExtractionRequest) -> ParseResult {
        let start = Instant::now();
        let filename = request.filename();
        let cleaned = clean_text(request.text());
        let detection = BankDetector::with_profiles(self.profiles)
            .detect_normalized(&normalize_for_matching(&cleaned));

        let record = if cleaned.is_empty() {
            extraction_failed(filename, ExtractionError::NoText)
        } else {
            match self.profile(detection.bank) {
                Some(profile) => {
                    let (fields, warnings) = extract_fields(profile, &cleaned);
                    aggregate(profile.bank, filename, fields, warnings)
                }
                None => bank_not_detected(filename),
            }
        };

        info!(
            "{}: bank={} status={} ({} messages)",
            filename,
            record.bank,
            record.status,
            record.errors.len()
        );

        ParseResult {
            record,
            detection,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExtractionStatus;

    #[test]
    fn test_empty_text() {
        let parser = RuleStatementParser::new();
        let result = parser.parse(&ExtractionRequest::new("  \n--- Page 1 ---\n", "empty.pdf"));
        assert_eq!(result.record.status, ExtractionStatus::Error);
        assert_eq!(result.record.errors, vec!["could not extract text from PDF".to_string()]);
    }

    #[test]
    fn test_unknown_bank() {
        let parser = RuleStatementParser::new();
        let result = parser.parse(&ExtractionRequest::new(
            "Monthly statement\nTotal Amount Due: Rs. 15,000.00",
            "other.pdf",
        ));
        assert_eq!(result.record.status, ExtractionStatus::Error);
        assert_eq!(result.record.bank, Bank::Unknown);
        assert_eq!(result.record.errors, vec!["bank not detected".to_string()]);
        assert_eq!(result.record.total_due, None);
    }

    #[test]
    fn test_generic_fallbacks() {
        let parser = RuleStatementParser::new();
        let text = "HDFC Bank Credit Card Statement\n\
                    Card Number: XXXX XXXX XXXX 1234\n\
                    Total Amount Due: Rs. 15,000.00";
        let record = parser.parse(&ExtractionRequest::new(text, "hdfc.pdf")).record;

        assert_eq!(record.bank, Bank::Hdfc);
        assert_eq!(record.status, ExtractionStatus::Partial);
        assert_eq!(record.card_number.as_deref(), Some("1234"));
        assert_eq!(record.total_due.as_deref(), Some("15000.00"));
    }
}
