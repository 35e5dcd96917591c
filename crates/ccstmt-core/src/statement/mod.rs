//! Bank detection and field extraction for statement text.

pub mod aggregator;
pub mod detector;
pub mod extractor;
pub mod normalizer;
mod parser;
pub mod profiles;
pub mod rules;

pub use aggregator::{aggregate, bank_not_detected, extraction_failed};
pub use detector::{BankDetection, BankDetector};
pub use extractor::{extract_fields, FieldPattern, FieldRule};
pub use normalizer::{clean_text, normalize_for_matching};
pub use parser::{ParseResult, RuleStatementParser, StatementParser};
pub use profiles::{profile_for, profiles, BankProfile};
