//! Error types for the ccstmt-core library.

use thiserror::Error;

/// Main error type for the ccstmt library.
#[derive(Error, Debug)]
pub enum StatementError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Field extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Upload or input validation error.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Export (JSON/CSV) error.
    #[error("export error: {0}")]
    Export(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for StatementError {
    fn from(err: serde_json::Error) -> Self {
        StatementError::Export(err.to_string())
    }
}

impl From<csv::Error> for StatementError {
    fn from(err: csv::Error) -> Self {
        StatementError::Export(err.to_string())
    }
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors related to the OCR fallback.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// No OCR engine is available in this build or configuration.
    #[error("OCR unavailable: {0}")]
    Unavailable(String),
}

/// Errors related to statement field extraction.
///
/// These end up as messages in a record's `errors` list rather than as `Err` returns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// No keyword of any bank profile was found.
    #[error("bank not detected")]
    BankNotDetected,

    /// A field had no matching pattern.
    #[error("missing field: {0}")]
    MissingField(String),

    /// A pattern matched but captured only whitespace.
    #[error("empty field: {0}")]
    EmptyValue(String),

    /// No candidate format parsed the captured date.
    #[error("date format unrecognized: {0}")]
    UnrecognizedDate(String),

    /// The captured amount contained no number.
    #[error("amount not numeric: {0}")]
    InvalidAmount(String),

    /// The captured card number had fewer than four digits.
    #[error("card number has fewer than 4 digits: {0}")]
    ShortCardNumber(String),

    /// Text extraction produced nothing to work with.
    #[error("could not extract text from PDF")]
    NoText,
}

/// Input rejected before the pipeline runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No files were provided.
    #[error("no files uploaded")]
    NoFiles,

    /// More files than the configured limit.
    #[error("maximum {max} files allowed, got {count}")]
    TooManyFiles { max: usize, count: usize },

    /// A file exceeds the size limit.
    #[error("{filename}: file too large ({size} bytes). Maximum size: {max_mb}MB")]
    FileTooLarge {
        filename: String,
        size: usize,
        max_mb: usize,
    },

    /// The file extension is not allowed.
    #[error("{0}: invalid file type. Only PDF files allowed")]
    InvalidFileType(String),

    /// The content does not start with a PDF header.
    #[error("{0}: not a PDF document")]
    NotPdf(String),

    /// The file is empty.
    #[error("{0}: file is empty")]
    Empty(String),
}

/// Result type for the ccstmt library.
pub type Result<T> = std::result::Result<T, StatementError>;
