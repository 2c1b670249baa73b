//! Upload types

use serde::Serialize;

// ============================================================================
// Constants
// ============================================================================

/// Suffixes routed to the PDF pipeline
pub const PDF_EXTENSIONS: &[&str] = &["pdf"];

/// Suffixes routed to image OCR
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp"];

// ============================================================================
// File Kind
// ============================================================================

/// What an upload is treated as. Inferred from the filename suffix only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Pdf,
    Image,
}

impl FileKind {
    /// Infer the kind from a filename. `None` means the format is unsupported.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = extension(filename)?;

        if PDF_EXTENSIONS.contains(&ext.as_str()) {
            Some(FileKind::Pdf)
        } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(FileKind::Image)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Pdf => "pdf",
            FileKind::Image => "image",
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower-cased suffix after the last dot, without the dot
pub fn extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

// ============================================================================
// Upload
// ============================================================================

/// A validated upload, held in memory until it is written to scratch space
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub kind: FileKind,
    pub data: Vec<u8>,
}

impl Upload {
    /// Suffix used for the scratch copy, so extension-driven tools see the right type
    pub fn scratch_suffix(&self) -> String {
        extension(&self.file_name)
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default()
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}
