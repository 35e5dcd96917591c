//! Route handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::header,
    response::IntoResponse,
};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info};

use ccstmt_core::export::{write_csv_file, write_json_file};
use ccstmt_core::models::{Bank, BatchSummary, ExtractionRecord};
use ccstmt_core::OcrBackend;

use super::AppState;
use super::error::ServerError;

/// Successful upload response.
#[derive(Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub results: Vec<ExtractionRecord>,
    pub summary: BatchSummary,
}

/// An uploaded file held in memory.
struct Upload {
    filename: String,
    data: Vec<u8>,
}

/// `POST /upload`
pub async fn handle_upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ServerError> {
    let mut uploads = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        if !matches!(field.name(), Some("files") | Some("files[]")) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await?;

        // Browsers send an empty, nameless part when no file was chosen
        if filename.is_empty() && data.is_empty() {
            continue;
        }
        debug!("Received {} ({} bytes)", filename, data.len());
        uploads.push(Upload {
            filename,
            data: data.to_vec(),
        });
    }

    state
        .pipeline
        .validate_upload(uploads.iter().map(|u| (u.filename.as_str(), u.data.as_slice())))?;

    info!("Processing {} uploaded statements", uploads.len());

    let worker = Arc::clone(&state);
    let records = tokio::task::spawn_blocking(move || -> Result<_, ServerError> {
        let ocr = worker.ocr();
        let records = worker.pipeline.process_batch(
            uploads.iter().map(|u| (u.filename.as_str(), u.data.as_slice())),
            ocr.as_ref().map(|o| o as &dyn OcrBackend),
        );

        let output = &worker.pipeline.config().output;
        std::fs::create_dir_all(&output.dir)?;
        write_json_file(&output.json_path(), &records)?;
        write_csv_file(&output.csv_path(), &records)?;
        Ok(records)
    })
    .await
    .map_err(|e| ServerError::Internal(format!("processing task failed: {}", e)))??;

    let summary = BatchSummary::from_records(&records);
    info!(
        "Upload done: {} success, {} partial, {} error",
        summary.successful, summary.partial, summary.errors
    );

    Ok(Json(UploadResponse {
        success: true,
        results: records,
        summary,
    }))
}

/// `GET /download/:file_type`
pub async fn handle_download(
    State(state): State<Arc<AppState>>,
    Path(file_type): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    let output = &state.pipeline.config().output;
    let (path, content_type) = match file_type.as_str() {
        "json" => (output.json_path(), "application/json"),
        "csv" => (output.csv_path(), "text/csv"),
        other => {
            return Err(ServerError::InvalidRequest(format!(
                "unknown file type '{}', expected json or csv",
                other
            )));
        }
    };

    let data = match tokio::fs::read(&path).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ServerError::NotFound(format!(
                "no {} export yet, upload statements first",
                file_type
            )));
        }
        Err(e) => return Err(e.into()),
    };

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("parsed_data.{}", file_type));

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        data,
    ))
}

/// `GET /health`
pub async fn handle_health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let banks: Vec<&str> = Bank::SUPPORTED.iter().map(Bank::as_str).collect();
    Json(json!({
        "status": "healthy",
        "supported_banks": banks,
        "max_files": state.pipeline.config().upload.max_files,
    }))
}
