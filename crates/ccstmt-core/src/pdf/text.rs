//! Statement text from a PDF, with OCR over page images when the text layer is too thin.

use serde::Serialize;
use tracing::{debug, info, warn};

use super::{PdfExtractor, PdfProcessor, Result, PDF_HEADER};
use crate::error::PdfError;
use crate::models::config::PdfConfig;
use crate::ocr::OcrBackend;

/// Where the returned text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    Embedded,
    Ocr,
}

/// Text extracted from one PDF.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub text: String,
    pub method: ExtractionMethod,
    pub page_count: u32,
}

impl ExtractedText {
    /// Characters of content, ignoring whitespace around pages and the page markers.
    pub fn content_len(&self) -> usize {
        content_len_of(&self.text)
    }
}

fn content_len_of(text: &str) -> usize {
    text.lines()
        .map(str::trim)
        .filter(|line| !(line.starts_with("--- Page ") && line.ends_with("---")))
        .map(|line| line.chars().count())
        .sum()
}

/// Produces statement text from PDF bytes.
pub struct TextSource {
    config: PdfConfig,
}

impl TextSource {
    pub fn new(config: PdfConfig) -> Self {
        Self { config }
    }

    fn join_pages(&self, pages: &[String]) -> String {
        if !self.config.page_markers {
            return pages.join("\n");
        }
        pages
            .iter()
            .enumerate()
            .map(|(i, page)| format!("--- Page {} ---\n{}", i + 1, page.trim()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn page_limit(&self, page_count: u32) -> u32 {
        match self.config.max_pages {
            0 => page_count,
            max => page_count.min(max as u32),
        }
    }

    /// Extract the text of `data`.
    ///
    /// The text layer is read first. When its content is shorter than
    /// `min_text_length` and an OCR backend is given, every page image is
    /// recognized and the OCR text replaces the embedded text if it is longer.
    pub fn extract(&self, data: &[u8], ocr: Option<&dyn OcrBackend>) -> Result<ExtractedText> {
        if !data.starts_with(PDF_HEADER) {
            return Err(PdfError::Parse("missing %PDF header".to_string()));
        }

        let mut extractor = PdfExtractor::new();
        extractor.load(data)?;
        let page_count = extractor.page_count();
        let limit = self.page_limit(page_count) as usize;

        let (embedded, text_error) = match extractor.extract_page_texts() {
            Ok(mut pages) => {
                pages.truncate(limit);
                (self.join_pages(&pages), None)
            }
            Err(e) => {
                warn!("Text layer unreadable: {}", e);
                (String::new(), Some(e))
            }
        };

        let mut result = ExtractedText {
            text: embedded,
            method: ExtractionMethod::Embedded,
            page_count,
        };
        let embedded_len = result.content_len();
        debug!("Embedded text: {} chars over {} pages", embedded_len, page_count);

        let wants_ocr = self.config.use_ocr_fallback && embedded_len < self.config.min_text_length;
        if let (true, Some(ocr)) = (wants_ocr, ocr) {
            info!(
                "Embedded text too short ({} < {}), running OCR",
                embedded_len, self.config.min_text_length
            );
            match self.ocr_pages(&extractor, limit as u32, ocr) {
                Ok(ocr_text) if content_len_of(&ocr_text) > embedded_len => {
                    result.text = ocr_text;
                    result.method = ExtractionMethod::Ocr;
                }
                Ok(_) => debug!("OCR produced no more text than the text layer"),
                Err(e) => warn!("OCR fallback failed: {}", e),
            }
        }

        match text_error {
            Some(e) if result.method == ExtractionMethod::Embedded => Err(e),
            _ => Ok(result),
        }
    }

    fn ocr_pages(
        &self,
        extractor: &PdfExtractor,
        pages: u32,
        ocr: &dyn OcrBackend,
    ) -> std::result::Result<String, crate::error::OcrError> {
        let mut texts = Vec::with_capacity(pages as usize);
        for page in 1..=pages {
            let images = extractor.extract_images(page).unwrap_or_else(|e| {
                warn!("No images for page {}: {}", page, e);
                Vec::new()
            });
            let mut page_text = Vec::new();
            for image in &images {
                page_text.push(ocr.recognize(image)?);
            }
            texts.push(page_text.join("\n"));
        }
        Ok(self.join_pages(&texts))
    }
}

impl Default for TextSource {
    fn default() -> Self {
        Self::new(PdfConfig::default())
    }
}
