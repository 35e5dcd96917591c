//! Helpers shared by the commands.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use ccstmt_core::models::AppConfig;
use ccstmt_core::LazyOcr;

/// `<config dir>/ccstmt/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ccstmt")
        .join("config.json")
}

/// The file `--config` points at, or the default location.
pub fn config_file(config_path: Option<&str>) -> PathBuf {
    config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

/// Load configuration. An explicit path must exist; the default path may not.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<AppConfig> {
    if let Some(path) = config_path {
        debug!("Loading config from {}", path);
        return AppConfig::from_file(Path::new(path))
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {}", path, e));
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Loading config from {}", default_path.display());
        Ok(AppConfig::from_file(&default_path)?)
    } else {
        Ok(AppConfig::default())
    }
}

/// OCR fallback for this run, or `None` when disabled.
pub fn ocr_backend(config: &AppConfig, enabled: bool) -> Option<LazyOcr> {
    if !enabled || !config.pdf.use_ocr_fallback {
        return None;
    }
    let ocr = LazyOcr::new(config.ocr.clone());
    if !ocr.available() {
        info!(
            "OCR models not found in {}, scanned statements will fail",
            config.ocr.model_dir.display()
        );
    }
    Some(ocr)
}

/// File name part of a path, for records and messages.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Lowercase extension of a path, empty when there is none.
pub fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}
