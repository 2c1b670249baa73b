//! PDF module
//!
//! Embedded text extraction and page rasterization using MuPDF, behind the
//! [`PdfBackend`] trait so the extraction policy can be exercised without it.

mod backend;
mod parser;

pub use backend::PdfBackend;
pub use parser::{MupdfBackend, PdfError};

#[cfg(test)]
pub use backend::MockPdfBackend;
