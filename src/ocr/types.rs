//! OCR Types

/// OCR error types
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("Failed to run {engine}: {source}")]
    Spawn {
        engine: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{engine} exited with {status}: {stderr}")]
    EngineFailed {
        engine: &'static str,
        status: String,
        stderr: String,
    },

    #[error("{0}")]
    ProcessingError(String),
}
