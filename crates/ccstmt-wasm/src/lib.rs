//! WASM bindings for credit-card statement extraction.
//!
//! Text comes from the browser (pdf.js or a JS OCR engine); detection,
//! field extraction and export run here.

use wasm_bindgen::prelude::*;

use ccstmt_core::export;
use ccstmt_core::models::{ExtractionRecord, ExtractionRequest};
use ccstmt_core::ocr::{reading_order_text, TextBox};
use ccstmt_core::statement::rules::{normalize_amount as core_normalize_amount, normalize_date as core_normalize_date};
use ccstmt_core::{RuleStatementParser, StatementParser};

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Extract the statement fields from already-extracted text.
#[wasm_bindgen]
pub fn extract_statement_from_text(text: &str, filename: &str) -> Result<JsValue, JsValue> {
    let record = RuleStatementParser::new()
        .parse(&ExtractionRequest::new(text, filename))
        .record;
    to_js(&record)
}

/// Detect the issuing bank. Returns the bank name, `"unknown"` when nothing matched.
#[wasm_bindgen]
pub fn detect_bank(text: &str) -> String {
    RuleStatementParser::new().detect(text).bank.to_string()
}

/// Whether `name` is one of the supported banks.
#[wasm_bindgen]
pub fn validate_bank(name: &str) -> bool {
    ccstmt_core::validate_bank(name)
}

/// Normalize a statement date to `YYYY-MM-DD`.
#[wasm_bindgen]
pub fn normalize_date(date: &str) -> Option<String> {
    core_normalize_date(date).ok()
}

/// Normalize an amount such as `"Rs. 1,234.5"` to `"1234.50"`.
#[wasm_bindgen]
pub fn normalize_amount(amount: &str) -> Option<String> {
    core_normalize_amount(amount).ok()
}

/// Render records (as returned by the extractors) as CSV.
#[wasm_bindgen]
pub fn records_to_csv(records: JsValue) -> Result<String, JsValue> {
    let records: Vec<ExtractionRecord> = serde_wasm_bindgen::from_value(records)?;
    export::to_csv(&records).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Statement extractor class for browser use.
#[wasm_bindgen]
pub struct StatementExtractor {
    parser: RuleStatementParser<'static>,
}

#[wasm_bindgen]
impl StatementExtractor {
    /// Create a new statement extractor.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            parser: RuleStatementParser::new(),
        }
    }

    /// Extract a record from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str, filename: &str) -> Result<JsValue, JsValue> {
        let result = self.parser.parse(&ExtractionRequest::new(text, filename));
        to_js(&result.record)
    }

    /// Extract a record together with the detection scores and timing.
    #[wasm_bindgen]
    pub fn extract_with_detection(&self, text: &str, filename: &str) -> Result<JsValue, JsValue> {
        let result = self.parser.parse(&ExtractionRequest::new(text, filename));

        #[derive(serde::Serialize)]
        struct ExtractResult {
            record: ExtractionRecord,
            detection: ccstmt_core::BankDetection,
            processing_time_ms: u64,
        }

        to_js(&ExtractResult {
            record: result.record,
            detection: result.detection,
            processing_time_ms: result.processing_time_ms,
        })
    }
}

impl Default for StatementExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Text boxes from browser-side OCR, joined into reading order before extraction.
#[wasm_bindgen]
pub struct OcrPage {
    boxes: Vec<TextBox>,
}

#[wasm_bindgen]
impl OcrPage {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self { boxes: Vec::new() }
    }

    /// Add a recognized box given its axis-aligned corners.
    #[wasm_bindgen]
    pub fn add_box(&mut self, text: &str, x1: f32, y1: f32, x2: f32, y2: f32, confidence: f32) {
        self.boxes.push(TextBox::from_points(
            &[(x1, y1), (x2, y2)],
            text.to_string(),
            confidence,
        ));
    }

    /// Page text, one visual row per line.
    #[wasm_bindgen]
    pub fn text(&self) -> String {
        reading_order_text(self.boxes.clone())
    }

    /// Extract a record from this page.
    #[wasm_bindgen]
    pub fn extract(&self, filename: &str) -> Result<JsValue, JsValue> {
        extract_statement_from_text(&self.text(), filename)
    }
}

impl Default for OcrPage {
    fn default() -> Self {
        Self::new()
    }
}
