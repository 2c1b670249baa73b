//! OCR engine availability probe
//!
//! Runs once at startup. The result decides whether OCR strategies run or
//! answer with guidance text for the lifetime of the process.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::config::ENGINE_CANDIDATES;

/// Whether the OCR engine can be found at one of the default locations
pub fn probe() -> bool {
    locate_engine(ENGINE_CANDIDATES).is_some()
}

/// Return the first candidate that exists, logging the outcome
pub fn locate_engine<S: AsRef<str>>(candidates: &[S]) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH");
    let found = locate_in(candidates, path_var.as_deref());

    match &found {
        Some(path) => tracing::info!(path = %path.display(), "OCR engine found"),
        None => tracing::warn!(
            candidates = ?candidates.iter().map(|c| c.as_ref()).collect::<Vec<&str>>(),
            "OCR engine not found; OCR requests will return guidance text"
        ),
    }

    found
}

/// Candidates containing a path separator must exist as files; bare names
/// are searched for in each `path_var` directory in order.
pub fn locate_in<S: AsRef<str>>(candidates: &[S], path_var: Option<&OsStr>) -> Option<PathBuf> {
    candidates.iter().find_map(|candidate| {
        let candidate = candidate.as_ref();
        let as_path = Path::new(candidate);

        if as_path.components().count() > 1 {
            as_path.is_file().then(|| as_path.to_path_buf())
        } else {
            search_path(candidate, path_var?)
        }
    })
}

fn search_path(name: &str, path_var: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(path_var)
        .map(|dir| dir.join(name))
        .find(|full| full.is_file())
}
