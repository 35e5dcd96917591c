//! PDF processing module.

mod extractor;
mod text;

pub use extractor::PdfExtractor;
pub use text::{ExtractedText, ExtractionMethod, TextSource};

use crate::error::{PdfError, ValidationError};
use crate::models::config::UploadConfig;
use image::DynamicImage;

/// Type of PDF content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfType {
    /// Contains extractable text.
    Text,
    /// Contains only images (scanned document).
    Image,
    /// Contains both text and images.
    Hybrid,
    /// Empty or unreadable.
    Empty,
}

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Magic bytes every PDF starts with.
pub const PDF_HEADER: &[u8] = b"%PDF";

/// Trait for PDF processing implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Analyze the PDF to determine its type.
    fn analyze(&self) -> PdfType;

    /// Extract text from the entire PDF.
    fn extract_text(&self) -> Result<String>;

    /// Extract text of every page, in page order.
    fn extract_page_texts(&self) -> Result<Vec<String>>;

    /// Extract embedded images from a page.
    fn extract_images(&self, page: u32) -> Result<Vec<DynamicImage>>;
}

/// Check an uploaded file before it reaches the pipeline.
pub fn validate_pdf(
    filename: &str,
    data: &[u8],
    limits: &UploadConfig,
) -> std::result::Result<(), ValidationError> {
    if !limits.extension_allowed(filename) {
        return Err(ValidationError::InvalidFileType(filename.to_string()));
    }
    if data.is_empty() {
        return Err(ValidationError::Empty(filename.to_string()));
    }
    if data.len() > limits.max_file_size {
        return Err(ValidationError::FileTooLarge {
            filename: filename.to_string(),
            size: data.len(),
            max_mb: limits.max_file_size_mb(),
        });
    }
    if !data.starts_with(PDF_HEADER) {
        return Err(ValidationError::NotPdf(filename.to_string()));
    }
    Ok(())
}
