//! OCR Engines
//!
//! Defines the engine trait and the Tesseract implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;

use super::types::OcrError;

/// OCR engine trait
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Engine name used in logs and errors
    fn name(&self) -> &'static str;

    /// Recognize the text in the image at `image_path`
    async fn recognize(&self, image_path: &Path, language: &str) -> Result<String, OcrError>;
}

/// Tesseract OCR engine, driven through its command line
pub struct TesseractEngine {
    executable: PathBuf,
}

impl TesseractEngine {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    async fn recognize(&self, image_path: &Path, language: &str) -> Result<String, OcrError> {
        // `stdout` as the output base makes tesseract print instead of writing a file
        let output = Command::new(&self.executable)
            .arg(image_path)
            .arg("stdout")
            .arg("-l")
            .arg(language)
            .output()
            .await
            .map_err(|source| OcrError::Spawn {
                engine: self.name(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::EngineFailed {
                engine: self.name(),
                status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Mock engine for testing
#[cfg(test)]
pub struct MockEngine {
    pub response: Result<String, String>,
    pub calls: std::sync::Mutex<Vec<PathBuf>>,
}

#[cfg(test)]
impl MockEngine {
    pub fn returning(text: &str) -> Self {
        Self {
            response: Ok(text.to_string()),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl OcrEngine for MockEngine {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn recognize(&self, image_path: &Path, _language: &str) -> Result<String, OcrError> {
        // Page rasters must still be on disk while they are being recognized
        assert!(image_path.exists(), "{} missing during OCR", image_path.display());
        self.calls.lock().unwrap().push(image_path.to_path_buf());
        self.response.clone().map_err(OcrError::ProcessingError)
    }
}
