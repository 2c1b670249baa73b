//! OCR upload endpoint
//!
//! `POST /ocr` takes a multipart form with a single `file` field, validates
//! it, writes it to scratch space, runs the extraction policy, and removes the
//! scratch copy before responding.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, State,
    },
    http::StatusCode,
    routing::post,
    Json, Router,
};

use crate::error::{AppError, Result};
use crate::extract::ExtractionResult;
use crate::state::AppState;
use crate::upload::{FileKind, ScratchFile, Upload};

/// Allowance for multipart boundaries and part headers on top of the file itself
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// Create the OCR router
pub fn router(max_file_size: usize) -> Router<AppState> {
    Router::new()
        .route("/ocr", post(ocr_upload))
        .layer(DefaultBodyLimit::max(max_file_size + MULTIPART_OVERHEAD))
}

/// POST /ocr
async fn ocr_upload(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<ExtractionResult>> {
    tracing::info!("OCR request received");

    let multipart = multipart.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let config = &state.config().upload;

    let upload = read_upload(multipart, config.max_file_size).await?;
    tracing::info!(
        file_name = %upload.file_name,
        size = upload.size(),
        kind = %upload.kind,
        "Upload accepted"
    );

    let scratch = ScratchFile::write(&config.scratch_dir, &upload.scratch_suffix(), &upload.data)?;

    let result = state.extractor().extract(scratch.path(), upload.kind).await;
    scratch.release();
    let extraction = result?;

    tracing::info!(
        file_name = %upload.file_name,
        chars = extraction.text.chars().count(),
        method = ?extraction.method,
        "OCR request complete"
    );

    Ok(Json(ExtractionResult::new(
        extraction,
        upload.kind,
        upload.file_name,
    )))
}

/// Pull the `file` field out of the form and validate it.
///
/// Checks run in order: field present, filename non-empty, size within
/// `max_file_size` (counted while streaming), accepted extension.
async fn read_upload(mut multipart: Multipart, max_file_size: usize) -> Result<Upload> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_file_size))?
    {
        // Parts without a filename are plain form values, not files
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        if field.name() != Some("file") {
            continue;
        }

        if file_name.is_empty() {
            return Err(AppError::EmptyFilename);
        }

        let mut data = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| multipart_error(e, max_file_size))?
        {
            if data.len() + chunk.len() > max_file_size {
                tracing::warn!(
                    file_name = %file_name,
                    received = data.len() + chunk.len(),
                    "Upload exceeds size limit"
                );
                return Err(AppError::FileTooLarge { max: max_file_size });
            }
            data.extend_from_slice(&chunk);
        }

        let kind = FileKind::from_filename(&file_name)
            .ok_or_else(|| AppError::UnsupportedFormat(file_name.clone()))?;

        return Ok(Upload {
            file_name,
            kind,
            data,
        });
    }

    Err(AppError::MissingFile)
}

fn multipart_error(e: MultipartError, max_file_size: usize) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::FileTooLarge { max: max_file_size }
    } else {
        AppError::BadRequest(e.body_text())
    }
}
