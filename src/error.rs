//! Error types for the OCR server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::extract::ExtractError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("No file uploaded")]
    MissingFile,

    #[error("No file selected")]
    EmptyFilename,

    #[error("File is too large (limit is {} MB)", .max / (1024 * 1024))]
    FileTooLarge { max: usize },

    #[error("Unsupported file format")]
    UnsupportedFormat(String),

    #[error("Failed to read upload: {0}")]
    BadRequest(String),

    #[error("OCR processing failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("OCR processing failed: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingFile
            | Self::EmptyFilename
            | Self::FileTooLarge { .. }
            | Self::UnsupportedFormat(_)
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Extraction(_) | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "OCR request failed");
        } else {
            tracing::warn!(error = %self, "OCR request rejected");
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}
