//! Core library for credit-card statement extraction.
//!
//! This crate provides:
//! - PDF text extraction with an OCR fallback for scanned statements
//! - Keyword-based bank detection (Axis, Citi, HDFC, ICICI, Silk)
//! - Ordered per-bank field patterns with normalization of names, card
//!   numbers, amounts and dates
//! - Success/partial/error aggregation and JSON/CSV export

pub mod error;
pub mod export;
pub mod models;
pub mod ocr;
pub mod pdf;
pub mod pipeline;
pub mod statement;

pub use error::{Result, StatementError};
pub use models::{
    validate_bank, AppConfig, Bank, BatchSummary, ExtractionRecord, ExtractionRequest,
    ExtractionStatus, FieldName,
};
pub use ocr::{LazyOcr, OcrBackend};
#[cfg(feature = "native")]
pub use ocr::PureOcrEngine;
pub use pdf::{validate_pdf, PdfProcessor, PdfType, TextSource};
pub use pipeline::StatementPipeline;
pub use statement::{
    BankDetection, BankDetector, ParseResult, RuleStatementParser, StatementParser,
};
