//! Field post-processing rules and pattern guards.

pub mod amounts;
pub mod cards;
pub mod dates;
pub mod names;
pub mod patterns;

pub use amounts::{normalize_amount, parse_amount};
pub use cards::last_four;
pub use dates::{normalize_date, parse_statement_date, DATE_FORMATS};
pub use names::{clean_name, plausible_name};

use rust_decimal::Decimal;

use crate::error::ExtractionError;
use crate::models::FieldName;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A pattern hit with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Index of the pattern (within its field rule) that produced the match.
    pub pattern_index: usize,
    /// Position of the captured value in the source text.
    pub position: Option<(usize, usize)>,
    /// Full text matched by the pattern.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, pattern_index: usize, source: impl Into<String>) -> Self {
        Self {
            value,
            pattern_index,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

/// How a raw captured string becomes a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostProcess {
    /// Collapse whitespace.
    Name,
    /// Digits only, last four kept.
    CardLast4,
    /// Fixed-point decimal with two places.
    Amount,
    /// ISO 8601 date.
    IsoDate,
}

impl PostProcess {
    pub fn for_field(field: FieldName) -> Self {
        match field {
            FieldName::CardholderName => PostProcess::Name,
            FieldName::CardNumber => PostProcess::CardLast4,
            FieldName::CreditLimit | FieldName::TotalDue => PostProcess::Amount,
            FieldName::PaymentDueDate => PostProcess::IsoDate,
        }
    }

    pub fn apply(&self, raw: &str) -> Result<String, ExtractionError> {
        match self {
            PostProcess::Name => clean_name(raw),
            PostProcess::CardLast4 => last_four(raw),
            PostProcess::Amount => normalize_amount(raw),
            PostProcess::IsoDate => normalize_date(raw),
        }
    }
}

/// Extra condition a raw capture must meet for its pattern to count as a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Word count within bounds; see [`plausible_name`].
    Name { min_words: usize, max_words: usize },
    /// Amount strictly greater than the bound.
    MinAmount(u64),
    /// Amount strictly between the bounds.
    AmountBetween(u64, u64),
}

impl Guard {
    pub fn accepts(&self, raw: &str) -> bool {
        match *self {
            Guard::Name { min_words, max_words } => plausible_name(raw, min_words, max_words),
            Guard::MinAmount(min) => parse_amount(raw).is_some_and(|v| v > Decimal::from(min)),
            Guard::AmountBetween(low, high) => parse_amount(raw)
                .is_some_and(|v| v > Decimal::from(low) && v < Decimal::from(high)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_process_by_field() {
        assert_eq!(PostProcess::for_field(FieldName::TotalDue), PostProcess::Amount);
        assert_eq!(
            PostProcess::for_field(FieldName::CardNumber).apply("XXXX XXXX XXXX 1234").unwrap(),
            "1234"
        );
        assert_eq!(
            PostProcess::for_field(FieldName::PaymentDueDate).apply("04/11/2021").unwrap(),
            "2021-11-04"
        );
    }

    #[test]
    fn test_guards() {
        assert!(Guard::MinAmount(10_000).accepts("2,50,000.00"));
        assert!(!Guard::MinAmount(10_000).accepts("9,999.00"));
        assert!(Guard::AmountBetween(5_000, 10_000_000).accepts("150,000"));
        assert!(!Guard::AmountBetween(5_000, 10_000_000).accepts("5,000"));
        assert!(Guard::Name { min_words: 2, max_words: 5 }.accepts("JOHN DOE"));
        assert!(!Guard::Name { min_words: 2, max_words: 5 }.accepts("STATEMENT"));
    }
}
