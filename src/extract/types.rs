//! Extraction types

use serde::Serialize;

use crate::ocr::OcrError;
use crate::pdf::PdfError;
use crate::upload::FileKind;

/// Which strategy produced the text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Embedded PDF text
    TextLayer,
    /// OCR over an image or rasterized pages
    Ocr,
    /// OCR engine unavailable; text is a fixed explanation
    Guidance,
}

/// Text produced by the extraction policy
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub text: String,
    pub method: ExtractionMethod,
}

impl Extraction {
    pub fn text_layer(text: String) -> Self {
        Self {
            text,
            method: ExtractionMethod::TextLayer,
        }
    }

    pub fn ocr(text: String) -> Self {
        Self {
            text,
            method: ExtractionMethod::Ocr,
        }
    }

    pub fn guidance(message: &str) -> Self {
        Self {
            text: message.to_string(),
            method: ExtractionMethod::Guidance,
        }
    }
}

/// Response body for a successful extraction
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    pub success: bool,
    pub text: String,
    pub file_type: FileKind,
    pub file_name: String,
}

impl ExtractionResult {
    pub fn new(extraction: Extraction, file_type: FileKind, file_name: String) -> Self {
        Self {
            success: true,
            text: extraction.text,
            file_type,
            file_name,
        }
    }
}

/// Extraction error types
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("PDF processing failed: {0}")]
    Pdf(#[from] PdfError),

    #[error("{0}")]
    Ocr(#[from] OcrError),

    #[error("Failed to decode image: {0}")]
    Image(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Extraction task failed: {0}")]
    Task(String),
}
