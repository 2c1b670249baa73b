//! OCR Server Library
//!
//! Accepts an uploaded PDF or image over HTTP and returns its text as JSON.
//! The main server binary is in main.rs.
//!
//! # Modules
//!
//! - `extract`: Extraction policy (PDF text layer first, OCR as fallback)
//! - `ocr`: Tesseract engine and its startup availability probe
//! - `pdf`: Text extraction and page rasterization via MuPDF
//! - `upload`: Upload types and scoped scratch files
//! - `routes`: HTTP endpoints

pub mod config;
pub mod error;
pub mod extract;
pub mod ocr;
pub mod pdf;
pub mod routes;
pub mod state;
pub mod upload;
