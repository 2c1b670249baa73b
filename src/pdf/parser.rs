//! PDF access using MuPDF
//!
//! Embedded text extraction and page rasterization for uploaded PDFs.
//!
//! MuPDF's fz_context is not thread-safe, so every call opens a fresh
//! document and drops it before returning. Callers run these methods on the
//! blocking thread pool.

use std::io::Cursor;
use std::path::Path;

use mupdf::{Colorspace, Document, Matrix};
use thiserror::Error;

use super::backend::PdfBackend;

/// PDF errors
#[derive(Error, Debug)]
pub enum PdfError {
    #[error("Failed to load PDF: {0}")]
    LoadError(String),
    #[error("Page {0} not found (document has {1} pages)")]
    PageNotFound(usize, usize),
    #[error("Image encoding error: {0}")]
    ImageError(String),
    #[error("MuPDF error: {0}")]
    MuPdfError(String),
}

impl From<mupdf::Error> for PdfError {
    fn from(e: mupdf::Error) -> Self {
        PdfError::MuPdfError(e.to_string())
    }
}

/// MuPDF-backed implementation of [`PdfBackend`]
#[derive(Debug, Default, Clone, Copy)]
pub struct MupdfBackend;

impl MupdfBackend {
    pub fn new() -> Self {
        Self
    }

    fn open_document(path: &Path) -> Result<Document, PdfError> {
        let path_str = path.to_string_lossy();
        Document::open(&*path_str)
            .map_err(|e| PdfError::LoadError(format!("{}: {}", path.display(), e)))
    }
}

impl PdfBackend for MupdfBackend {
    fn page_count(&self, path: &Path) -> Result<usize, PdfError> {
        let doc = Self::open_document(path)?;
        Ok(doc.page_count()? as usize)
    }

    fn extract_page_texts(&self, path: &Path) -> Result<Vec<String>, PdfError> {
        let doc = Self::open_document(path)?;
        let page_count = doc.page_count()? as usize;

        let mut pages = Vec::with_capacity(page_count);
        for index in 0..page_count {
            let page = doc.load_page(index as i32)?;
            let text = page.to_text()?;
            tracing::debug!(page = index + 1, chars = text.chars().count(), "Page text extracted");
            pages.push(text);
        }

        Ok(pages)
    }

    fn render_page_png(&self, path: &Path, page_index: usize, scale: f32) -> Result<Vec<u8>, PdfError> {
        let doc = Self::open_document(path)?;
        let page_count = doc.page_count()? as usize;
        if page_index >= page_count {
            return Err(PdfError::PageNotFound(page_index + 1, page_count));
        }

        let page = doc.load_page(page_index as i32)?;

        // Clamp scale to keep raster sizes bounded (0.1 to 4.0)
        let scale = scale.clamp(0.1, 4.0);
        let matrix = Matrix::new_scale(scale, scale);

        // to_pixmap signature: (ctm, colorspace, alpha, show_extras) -> Pixmap
        let colorspace = Colorspace::device_rgb();
        let pixmap = page.to_pixmap(&matrix, &colorspace, false, true)?;

        encode_png(&pixmap)
    }
}

/// Encode an RGB pixmap without alpha as PNG
fn encode_png(pixmap: &mupdf::Pixmap) -> Result<Vec<u8>, PdfError> {
    let width = pixmap.width() as u32;
    let height = pixmap.height() as u32;

    let img = image::RgbImage::from_raw(width, height, pixmap.samples().to_vec())
        .ok_or_else(|| PdfError::ImageError(format!("unexpected pixmap layout ({} components)", pixmap.n())))?;

    let mut output = Vec::new();
    img.write_to(&mut Cursor::new(&mut output), image::ImageFormat::Png)
        .map_err(|e| PdfError::ImageError(e.to_string()))?;

    Ok(output)
}
