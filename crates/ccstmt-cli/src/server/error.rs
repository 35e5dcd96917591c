//! Error responses for the upload server.

use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use ccstmt_core::StatementError;
use ccstmt_core::error::ValidationError;

/// Server error types
#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Malformed upload: {0}")]
    Multipart(String),

    #[error("Upload exceeds the size limit")]
    PayloadTooLarge,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<MultipartError> for ServerError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ServerError::PayloadTooLarge
        } else {
            ServerError::Multipart(err.body_text())
        }
    }
}

impl From<StatementError> for ServerError {
    fn from(err: StatementError) -> Self {
        match err {
            StatementError::Validation(e) => ServerError::Validation(e),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Internal(err.to_string())
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: String,
}

impl ServerError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ServerError::Validation(ValidationError::FileTooLarge { .. })
            | ServerError::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, "FILE_TOO_LARGE"),
            ServerError::Validation(ValidationError::NoFiles) => {
                (StatusCode::BAD_REQUEST, "NO_FILES")
            }
            ServerError::Validation(ValidationError::TooManyFiles { .. }) => {
                (StatusCode::BAD_REQUEST, "TOO_MANY_FILES")
            }
            ServerError::Validation(_) => (StatusCode::BAD_REQUEST, "INVALID_FILE"),
            ServerError::Multipart(_) | ServerError::InvalidRequest(_) => {
                (StatusCode::BAD_REQUEST, "INVALID_REQUEST")
            }
            ServerError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ServerError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::info!("Rejected request: {}", self);
        }

        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_status_codes() {
        let too_large = ServerError::from(ValidationError::FileTooLarge {
            filename: "a.pdf".to_string(),
            size: 11 * 1024 * 1024,
            max_mb: 10,
        });
        assert_eq!(too_large.status_and_code().0, StatusCode::PAYLOAD_TOO_LARGE);

        let too_many = ServerError::from(ValidationError::TooManyFiles { max: 5, count: 6 });
        assert_eq!(too_many.status_and_code(), (StatusCode::BAD_REQUEST, "TOO_MANY_FILES"));

        let not_pdf = ServerError::from(ValidationError::NotPdf("a.pdf".to_string()));
        assert_eq!(not_pdf.status_and_code().0, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found() {
        let err = ServerError::NotFound("parsed_data.json".to_string());
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
