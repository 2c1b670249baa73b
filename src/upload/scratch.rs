//! Scoped scratch files
//!
//! Every upload and every rasterized PDF page lives in a `ScratchFile` for
//! exactly as long as it is needed. The file is removed when the guard is
//! released or dropped, whichever comes first, including during unwinding.
//! Removal failures are logged and never propagated.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

const PREFIX: &str = "ocr-";

/// RAII guard around a uniquely named temporary file
#[derive(Debug)]
pub struct ScratchFile {
    file: Option<NamedTempFile>,
    path: PathBuf,
}

impl ScratchFile {
    /// Create a scratch file in `dir` whose name ends with `suffix` and
    /// write `data` to it.
    pub fn write(dir: &Path, suffix: &str, data: &[u8]) -> io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix(PREFIX)
            .suffix(suffix)
            .tempfile_in(dir)?;

        file.write_all(data)?;
        file.flush()?;

        let path = file.path().to_path_buf();
        tracing::debug!(path = %path.display(), bytes = data.len(), "Scratch file written");

        Ok(Self {
            file: Some(file),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the file now instead of waiting for the guard to drop
    pub fn release(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        let Some(file) = self.file.take() else {
            return;
        };

        match file.close() {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Scratch file removed"),
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove scratch file"
            ),
        }
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        self.remove();
    }
}
