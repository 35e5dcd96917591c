//! OCR fallback for scanned statements.
//!
//! Recognition runs through [`OcrBackend`]. The native build ships
//! [`PureOcrEngine`], and [`LazyOcr`] defers loading its models until a
//! statement actually needs them.

#[cfg(feature = "native")]
mod pure_engine;

#[cfg(feature = "native")]
pub use pure_engine::PureOcrEngine;

use std::cell::OnceCell;

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::OcrError;
use crate::models::config::OcrConfig;

/// Text recognizer for a page image.
pub trait OcrBackend {
    /// Recognize the text on `image` in reading order, one visual row per line.
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError>;
}

/// A recognized text region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBox {
    /// Axis-aligned rectangle (min_x, min_y, max_x, max_y).
    pub rect: (f32, f32, f32, f32),

    /// Recognized text content.
    pub text: String,

    /// Recognition confidence score (0.0 - 1.0).
    pub confidence: f32,
}

impl TextBox {
    /// Rectangle around a quadrilateral given as (x, y) corner points.
    pub fn from_points(points: &[(f32, f32)], text: String, confidence: f32) -> Self {
        let min_x = points.iter().map(|p| p.0).fold(f32::INFINITY, f32::min);
        let max_x = points.iter().map(|p| p.0).fold(f32::NEG_INFINITY, f32::max);
        let min_y = points.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
        let max_y = points.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max);
        Self {
            rect: (min_x, min_y, max_x, max_y),
            text,
            confidence,
        }
    }

    /// Visual row bucket, 20 pixels high.
    fn row(&self) -> i32 {
        (self.rect.1 / ROW_HEIGHT) as i32
    }
}

const ROW_HEIGHT: f32 = 20.0;

/// Join boxes top-to-bottom, left-to-right. Boxes in the same row share a line.
///
/// Labels and their values usually land in separate boxes on one row, so
/// keeping them on one line lets the field patterns see `Label: value`.
pub fn reading_order_text(mut boxes: Vec<TextBox>) -> String {
    boxes.sort_by(|a, b| {
        a.row()
            .cmp(&b.row())
            .then(a.rect.0.partial_cmp(&b.rect.0).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut lines: Vec<String> = Vec::new();
    let mut current_row = None;
    for b in boxes {
        let text = b.text.trim();
        if text.is_empty() {
            continue;
        }
        match (current_row, lines.last_mut()) {
            (Some(row), Some(line)) if row == b.row() => {
                line.push(' ');
                line.push_str(text);
            }
            _ => lines.push(text.to_string()),
        }
        current_row = Some(b.row());
    }
    lines.join("\n")
}

/// OCR backend that loads its engine on first use.
///
/// A load failure is remembered, so missing models cost one warning per
/// instance rather than one per page.
pub struct LazyOcr {
    config: OcrConfig,
    engine: OnceCell<Result<Box<dyn OcrBackend>, String>>,
}

impl LazyOcr {
    pub fn new(config: OcrConfig) -> Self {
        Self {
            config,
            engine: OnceCell::new(),
        }
    }

    /// Whether OCR can run in this build with the configured model files.
    pub fn available(&self) -> bool {
        cfg!(feature = "native") && self.config.models_present()
    }

    fn load(config: &OcrConfig) -> Result<Box<dyn OcrBackend>, String> {
        #[cfg(feature = "native")]
        {
            if !config.models_present() {
                return Err(format!(
                    "OCR models not found in {}",
                    config.model_dir.display()
                ));
            }
            PureOcrEngine::from_config(config)
                .map(|engine| Box::new(engine) as Box<dyn OcrBackend>)
                .map_err(|e| e.to_string())
        }
        #[cfg(not(feature = "native"))]
        {
            let _ = config;
            Err("built without the native OCR engine".to_string())
        }
    }
}

impl OcrBackend for LazyOcr {
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        let engine = self.engine.get_or_init(|| {
            let loaded = Self::load(&self.config);
            if let Err(msg) = &loaded {
                warn!("OCR unavailable: {}", msg);
            }
            loaded
        });
        match engine {
            Ok(engine) => engine.recognize(image),
            Err(msg) => Err(OcrError::Unavailable(msg.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_box(x: f32, y: f32, text: &str) -> TextBox {
        TextBox::from_points(
            &[(x, y), (x + 50.0, y), (x + 50.0, y + 10.0), (x, y + 10.0)],
            text.to_string(),
            0.9,
        )
    }

    #[test]
    fn test_from_points() {
        let b = text_box(10.0, 5.0, "x");
        assert_eq!(b.rect, (10.0, 5.0, 60.0, 15.0));
    }

    #[test]
    fn test_reading_order_text() {
        let boxes = vec![
            text_box(200.0, 42.0, "Rs. 15,000.00"),
            text_box(10.0, 2.0, "HDFC Bank"),
            text_box(10.0, 45.0, "Total Amount Due:"),
            text_box(10.0, 80.0, " "),
        ];
        assert_eq!(
            reading_order_text(boxes),
            "HDFC Bank\nTotal Amount Due: Rs. 15,000.00"
        );
    }

    #[test]
    fn test_lazy_ocr_without_models() {
        let ocr = LazyOcr::new(OcrConfig {
            model_dir: "/nonexistent/models".into(),
            ..OcrConfig::default()
        });
        assert!(!ocr.available());

        let image = DynamicImage::new_rgb8(4, 4);
        let err = ocr.recognize(&image).unwrap_err();
        assert!(matches!(err, OcrError::Unavailable(_)));
        // Second call reuses the remembered failure
        assert!(matches!(ocr.recognize(&image), Err(OcrError::Unavailable(_))));
    }
}
