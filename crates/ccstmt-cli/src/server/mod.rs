//! HTTP upload server: multipart PDF upload, export download and health check.

mod error;
mod handlers;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use ccstmt_core::models::AppConfig;
use ccstmt_core::{LazyOcr, StatementPipeline};

/// Multipart framing allowance on top of the file bytes.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// Shared application state
pub struct AppState {
    pub pipeline: StatementPipeline,
    pub ocr_enabled: bool,
}

impl AppState {
    pub fn new(config: AppConfig, ocr_enabled: bool) -> Self {
        Self {
            pipeline: StatementPipeline::with_config(config),
            ocr_enabled,
        }
    }

    /// OCR backend for one request. Models load on the first scanned page.
    fn ocr(&self) -> Option<LazyOcr> {
        let config = self.pipeline.config();
        (self.ocr_enabled && config.pdf.use_ocr_fallback).then(|| LazyOcr::new(config.ocr.clone()))
    }

    fn body_limit(&self) -> usize {
        let upload = &self.pipeline.config().upload;
        upload.max_files * upload.max_file_size + MULTIPART_OVERHEAD
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let body_limit = state.body_limit();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::handle_health))
        .route("/upload", post(handlers::handle_upload))
        .route("/download/:file_type", get(handlers::handle_download))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use pretty_assertions::assert_eq;
    use serde_json::Value;
    use tower::ServiceExt;

    const BOUNDARY: &str = "ccstmt-test-boundary";

    fn test_config(dir: &std::path::Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.output.dir = dir.to_path_buf();
        config
    }

    fn multipart_body(parts: &[(&str, &str, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (field, filename, data) in parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    field, filename
                )
                .as_bytes(),
            );
            body.extend_from_slice(b"Content-Type: application/pdf\r\n\r\n");
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    fn upload_request(parts: &[(&str, &str, &[u8])]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(AppState::new(test_config(dir.path()), false));

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["max_files"], 5);
        assert_eq!(body["supported_banks"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_upload_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(AppState::new(test_config(dir.path()), false));

        let response = app
            .oneshot(upload_request(&[("other", "a.pdf", b"%PDF-1.4")]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "NO_FILES");
    }

    #[tokio::test]
    async fn test_upload_too_many_files() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(AppState::new(test_config(dir.path()), false));

        let parts: Vec<(&str, &str, &[u8])> =
            (0..6).map(|_| ("files", "a.pdf", b"%PDF-1.4".as_slice())).collect();
        let response = app.oneshot(upload_request(&parts)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["code"], "TOO_MANY_FILES");
    }

    #[tokio::test]
    async fn test_upload_rejects_non_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(AppState::new(test_config(dir.path()), false));

        let response = app
            .oneshot(upload_request(&[("files", "notes.txt", b"hello")]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["code"], "INVALID_FILE");
    }

    #[tokio::test]
    async fn test_upload_oversize_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.upload.max_file_size = 16;
        let app = router(AppState::new(config, false));

        let mut data = b"%PDF-1.4 ".to_vec();
        data.extend_from_slice(&[b'x'; 64]);
        let response = app
            .oneshot(upload_request(&[("files", "big.pdf", &data)]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_upload_unreadable_pdf_is_error_record() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(AppState::new(test_config(dir.path()), false));

        let response = app
            .oneshot(upload_request(&[("files[]", "broken.pdf", b"%PDF-1.4 broken")]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["results"][0]["filename"], "broken.pdf");
        assert_eq!(body["results"][0]["status"], "error");
        assert_eq!(body["summary"]["errors"], 1);

        assert!(dir.path().join("parsed_data.json").exists());
        assert!(dir.path().join("parsed_data.csv").exists());
    }

    #[tokio::test]
    async fn test_upload_creates_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("exports").join("today");
        let app = router(AppState::new(test_config(&out), false));

        let response = app
            .oneshot(upload_request(&[("files", "broken.pdf", b"%PDF-1.4 broken")]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = std::fs::read_to_string(out.join("parsed_data.json")).unwrap();
        assert!(json.contains("broken.pdf"));
        assert!(out.join("parsed_data.csv").exists());
    }

    #[tokio::test]
    async fn test_download() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(AppState::new(test_config(dir.path()), false));

        let response = app
            .clone()
            .oneshot(Request::get("/download/xml").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .clone()
            .oneshot(Request::get("/download/csv").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        std::fs::write(dir.path().join("parsed_data.csv"), "bank\n").unwrap();
        let response = app
            .oneshot(Request::get("/download/csv").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "text/csv");
    }
}
