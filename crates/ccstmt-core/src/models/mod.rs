//! Data models and configuration.

pub mod config;
pub mod statement;

pub use config::AppConfig;
pub use statement::{
    validate_bank, Bank, BatchSummary, ExtractionRecord, ExtractionRequest, ExtractionStatus,
    FieldName, FieldResults, StatusCounts,
};
