//! Text extraction policy
//!
//! Chooses between the PDF text layer, rasterize-then-OCR, and image OCR,
//! and reports every failure as a typed [`ExtractError`].

pub mod guidance;
mod service;
mod types;

pub use service::{Extractor, ExtractorConfig};
pub use types::{ExtractError, Extraction, ExtractionMethod, ExtractionResult};
