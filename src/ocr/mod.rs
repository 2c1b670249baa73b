//! OCR Module
//!
//! Optical character recognition for uploaded images and rasterized PDF pages.
//!
//! The engine is Tesseract, invoked as a child process. Whether it is
//! installed is decided once at startup by [`probe::locate_engine`]; the
//! resulting engine (or its absence) is handed to the extractor explicitly.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ocr_server::ocr::{locate_engine, OcrEngine, TesseractEngine};
//!
//! let engine = locate_engine(&["tesseract"]).map(TesseractEngine::new);
//! if let Some(engine) = engine {
//!     let text = engine.recognize(Path::new("scan.png"), "jpn").await?;
//! }
//! ```

pub mod probe;
mod provider;
mod types;

pub use probe::{locate_engine, probe};
pub use provider::{OcrEngine, TesseractEngine};
pub use types::OcrError;

#[cfg(test)]
pub use provider::MockEngine;
