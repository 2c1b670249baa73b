//! PDF backend trait
//!
//! The two PDF capabilities the extractor relies on: reading embedded text
//! page by page, and rasterizing a page for OCR. All methods block.

use std::path::Path;

use super::parser::PdfError;

pub trait PdfBackend: Send + Sync {
    /// Number of pages in the document
    fn page_count(&self, path: &Path) -> Result<usize, PdfError>;

    /// Embedded text of every page, in page order
    fn extract_page_texts(&self, path: &Path) -> Result<Vec<String>, PdfError>;

    /// Render one page (0-indexed) to PNG bytes at the given linear scale
    fn render_page_png(&self, path: &Path, page_index: usize, scale: f32) -> Result<Vec<u8>, PdfError>;
}

/// Mock backend for testing
#[cfg(test)]
pub struct MockPdfBackend {
    /// Text layer result; `Err` simulates a document the library cannot read
    pub texts: Result<Vec<String>, String>,
    /// Pages available for rasterization
    pub pages: usize,
    pub renders: std::sync::Mutex<Vec<(usize, f32)>>,
}

#[cfg(test)]
impl MockPdfBackend {
    pub fn with_text(pages: &[&str]) -> Self {
        Self {
            texts: Ok(pages.iter().map(|p| p.to_string()).collect()),
            pages: pages.len(),
            renders: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str, pages: usize) -> Self {
        Self {
            texts: Err(message.to_string()),
            pages,
            renders: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn renders(&self) -> Vec<(usize, f32)> {
        self.renders.lock().unwrap().clone()
    }

    /// A small valid PNG
    pub fn blank_png() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(8, 8, image::Rgb([255, 255, 255]));
        let mut output = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut std::io::Cursor::new(&mut output), image::ImageFormat::Png)
            .unwrap();
        output
    }
}

#[cfg(test)]
impl PdfBackend for MockPdfBackend {
    fn page_count(&self, _path: &Path) -> Result<usize, PdfError> {
        Ok(self.pages)
    }

    fn extract_page_texts(&self, _path: &Path) -> Result<Vec<String>, PdfError> {
        self.texts.clone().map_err(PdfError::LoadError)
    }

    fn render_page_png(&self, _path: &Path, page_index: usize, scale: f32) -> Result<Vec<u8>, PdfError> {
        if page_index >= self.pages {
            return Err(PdfError::PageNotFound(page_index + 1, self.pages));
        }
        self.renders.lock().unwrap().push((page_index, scale));
        Ok(Self::blank_png())
    }
}
