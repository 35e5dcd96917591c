//! End-to-end processing: PDF bytes in, one record per file out.

use tracing::{info, warn};

use crate::error::ValidationError;
use crate::models::{AppConfig, ExtractionRecord, ExtractionRequest};
use crate::ocr::OcrBackend;
use crate::pdf::{validate_pdf, ExtractionMethod, TextSource};
use crate::statement::{extraction_failed, ParseResult, RuleStatementParser, StatementParser};

/// Text extraction plus rule-based parsing, configured once and reused per file.
pub struct StatementPipeline {
    config: AppConfig,
    parser: RuleStatementParser<'static>,
    source: TextSource,
}

impl StatementPipeline {
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let source = TextSource::new(config.pdf.clone());
        Self {
            config,
            parser: RuleStatementParser::new(),
            source,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse text that was already extracted from a statement.
    pub fn parse_text(&self, text: &str, filename: &str) -> ParseResult {
        self.parser.parse(&ExtractionRequest::new(text, filename))
    }

    /// Extract and parse one PDF. Every failure ends up in the returned record.
    pub fn process_pdf(
        &self,
        filename: &str,
        data: &[u8],
        ocr: Option<&dyn OcrBackend>,
    ) -> ExtractionRecord {
        let extracted = match self.source.extract(data, ocr) {
            Ok(extracted) => extracted,
            Err(e) => {
                warn!("{}: {}", filename, e);
                return extraction_failed(filename, e);
            }
        };

        if extracted.method == ExtractionMethod::Ocr {
            info!("{}: using OCR text ({} pages)", filename, extracted.page_count);
        }
        self.parse_text(&extracted.text, filename).record
    }

    /// Process files one after another. A failing file never affects the others.
    pub fn process_batch<'a, I>(&self, files: I, ocr: Option<&dyn OcrBackend>) -> Vec<ExtractionRecord>
    where
        I: IntoIterator<Item = (&'a str, &'a [u8])>,
    {
        let records: Vec<ExtractionRecord> = files
            .into_iter()
            .map(|(filename, data)| self.process_pdf(filename, data, ocr))
            .collect();
        info!("Processed {} files", records.len());
        records
    }

    /// Check an upload against the configured limits before anything is processed.
    pub fn validate_upload<'a, I>(&self, files: I) -> Result<(), ValidationError>
    where
        I: IntoIterator<Item = (&'a str, &'a [u8])>,
    {
        let files: Vec<(&str, &[u8])> = files.into_iter().collect();
        let limits = &self.config.upload;
        if files.is_empty() {
            return Err(ValidationError::NoFiles);
        }
        if files.len() > limits.max_files {
            return Err(ValidationError::TooManyFiles {
                max: limits.max_files,
                count: files.len(),
            });
        }
        for (filename, data) in files {
            validate_pdf(filename, data, limits)?;
        }
        Ok(())
    }
}

impl Default for StatementPipeline {
    fn default() -> Self {
        Self::new()
    }
}
