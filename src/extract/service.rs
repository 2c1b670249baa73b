//! Extraction Service
//!
//! Decides how an upload's text is obtained:
//!
//! - images go straight to OCR
//! - PDFs try their embedded text first and fall back to rasterize-then-OCR
//!   when extraction fails or finds nothing
//!
//! OCR availability is fixed when the service is built. Without an engine,
//! the OCR strategies answer with guidance text instead of failing.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::ImageFormat;

use crate::config::Config;
use crate::ocr::OcrEngine;
use crate::pdf::PdfBackend;
use crate::upload::{FileKind, ScratchFile};

use super::guidance::{IMAGE_OCR_UNAVAILABLE, PDF_OCR_UNAVAILABLE};
use super::types::{ExtractError, Extraction};

/// Extraction service configuration
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// OCR language pack
    pub language: String,
    /// Linear scale for page rasters
    pub render_scale: f32,
    /// Where page rasters are written
    pub scratch_dir: PathBuf,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for ExtractorConfig {
    fn from(config: &Config) -> Self {
        Self {
            language: config.ocr.language.clone(),
            render_scale: config.ocr.render_scale,
            scratch_dir: config.upload.scratch_dir.clone(),
        }
    }
}

/// Extraction policy over a PDF backend and an optional OCR engine
pub struct Extractor {
    pdf: Arc<dyn PdfBackend>,
    ocr: Option<Arc<dyn OcrEngine>>,
    config: ExtractorConfig,
}

impl Extractor {
    pub fn new(
        pdf: Arc<dyn PdfBackend>,
        ocr: Option<Arc<dyn OcrEngine>>,
        config: ExtractorConfig,
    ) -> Self {
        Self { pdf, ocr, config }
    }

    pub fn ocr_available(&self) -> bool {
        self.ocr.is_some()
    }

    /// Extract the text of the file at `path`
    pub async fn extract(&self, path: &Path, kind: FileKind) -> Result<Extraction, ExtractError> {
        match kind {
            FileKind::Image => self.recognize_image(path).await,
            FileKind::Pdf => {
                match self.extract_pdf_text(path).await {
                    Ok(text) if !text.trim().is_empty() => {
                        tracing::info!(chars = text.chars().count(), "PDF text layer extracted");
                        return Ok(Extraction::text_layer(text));
                    }
                    Ok(_) => {
                        tracing::info!("PDF has no embedded text, falling back to OCR");
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "PDF text extraction failed, falling back to OCR");
                    }
                }

                self.recognize_pdf(path).await
            }
        }
    }

    /// Embedded text of every page, concatenated in page order with no separator
    pub async fn extract_pdf_text(&self, path: &Path) -> Result<String, ExtractError> {
        let pdf = Arc::clone(&self.pdf);
        let path = path.to_path_buf();

        let pages = blocking(move || Ok(pdf.extract_page_texts(&path)?)).await?;
        tracing::debug!(pages = pages.len(), "PDF pages read");

        Ok(pages.concat())
    }

    /// OCR a single image.
    ///
    /// The upload is decoded and re-encoded as a PNG scratch file, so the
    /// engine only ever reads a format it supports and corrupt images fail
    /// before it runs.
    pub async fn recognize_image(&self, path: &Path) -> Result<Extraction, ExtractError> {
        let Some(engine) = &self.ocr else {
            tracing::warn!("OCR engine not available, returning guidance message");
            return Ok(Extraction::guidance(IMAGE_OCR_UNAVAILABLE));
        };

        let normalized = {
            let path = path.to_path_buf();
            let dir = self.config.scratch_dir.clone();
            blocking(move || {
                let png = normalize_image(&path)?;
                Ok(ScratchFile::write(&dir, ".png", &png)?)
            })
            .await?
        };

        let text = self.recognize_with(engine.as_ref(), normalized.path()).await;
        normalized.release();

        Ok(Extraction::ocr(text?))
    }

    /// Rasterize every page and OCR it, one page at a time
    pub async fn recognize_pdf(&self, path: &Path) -> Result<Extraction, ExtractError> {
        let Some(engine) = &self.ocr else {
            tracing::warn!("OCR engine not available, skipping PDF OCR");
            return Ok(Extraction::guidance(PDF_OCR_UNAVAILABLE));
        };

        let page_count = {
            let pdf = Arc::clone(&self.pdf);
            let path = path.to_path_buf();
            blocking(move || Ok(pdf.page_count(&path)?)).await?
        };
        tracing::info!(pages = page_count, "PDF OCR started");

        let mut text = String::new();
        for index in 0..page_count {
            let page_number = index + 1;

            let raster = {
                let pdf = Arc::clone(&self.pdf);
                let path = path.to_path_buf();
                let scale = self.config.render_scale;
                let dir = self.config.scratch_dir.clone();
                blocking(move || {
                    let png = pdf.render_page_png(&path, index, scale)?;
                    Ok(ScratchFile::write(&dir, ".png", &png)?)
                })
                .await?
            };

            let page_text = self.recognize_with(engine.as_ref(), raster.path()).await?;
            tracing::debug!(page = page_number, chars = page_text.chars().count(), "Page OCR complete");

            text.push_str(&format!("\n--- Page {} ---\n{}\n", page_number, page_text));
            raster.release();
        }

        Ok(Extraction::ocr(text.trim().to_string()))
    }

    async fn recognize_with(&self, engine: &dyn OcrEngine, path: &Path) -> Result<String, ExtractError> {
        let text = engine.recognize(path, &self.config.language).await?;
        Ok(text.trim().to_string())
    }
}

/// Decode an image of any accepted format and encode it as PNG
fn normalize_image(path: &Path) -> Result<Vec<u8>, ExtractError> {
    let image = image::ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| ExtractError::Image(e.to_string()))?;

    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| ExtractError::Image(e.to_string()))?;

    Ok(png)
}

/// Run blocking PDF/image work off the async runtime
async fn blocking<F, T>(f: F) -> Result<T, ExtractError>
where
    F: FnOnce() -> Result<T, ExtractError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ExtractError::Task(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ExtractionMethod;
    use crate::ocr::MockEngine;
    use crate::pdf::MockPdfBackend;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        pdf: Arc<MockPdfBackend>,
        ocr: Option<Arc<MockEngine>>,
    }

    impl Fixture {
        fn new(pdf: MockPdfBackend, ocr: Option<MockEngine>) -> Self {
            Self {
                dir: TempDir::new().unwrap(),
                pdf: Arc::new(pdf),
                ocr: ocr.map(Arc::new),
            }
        }

        fn extractor(&self) -> Extractor {
            let config = ExtractorConfig {
                scratch_dir: self.dir.path().to_path_buf(),
                ..ExtractorConfig::default()
            };
            let ocr = self.ocr.clone().map(|e| e as Arc<dyn OcrEngine>);
            Extractor::new(self.pdf.clone(), ocr, config)
        }

        fn write(&self, name: &str, data: &[u8]) -> PathBuf {
            let path = self.dir.path().join(name);
            std::fs::write(&path, data).unwrap();
            path
        }

        fn ocr_calls(&self) -> Vec<PathBuf> {
            self.ocr.as_ref().map(|e| e.calls()).unwrap_or_default()
        }

        /// Files left in the scratch dir other than the given inputs
        fn leftovers(&self, inputs: &[&Path]) -> Vec<PathBuf> {
            std::fs::read_dir(self.dir.path())
                .unwrap()
                .map(|entry| entry.unwrap().path())
                .filter(|p| !inputs.contains(&p.as_path()))
                .collect()
        }
    }

    #[tokio::test]
    async fn test_pdf_with_text_skips_ocr() {
        let fx = Fixture::new(
            MockPdfBackend::with_text(&["First page\n", "Second page\n"]),
            Some(MockEngine::returning("should not be used")),
        );
        let input = fx.write("doc.pdf", b"%PDF");

        let result = fx.extractor().extract(&input, FileKind::Pdf).await.unwrap();

        assert_eq!(result.text, "First page\nSecond page\n");
        assert_eq!(result.method, ExtractionMethod::TextLayer);
        assert!(fx.ocr_calls().is_empty());
        assert!(fx.pdf.renders().is_empty());
    }

    #[tokio::test]
    async fn test_pdf_pages_joined_without_separator() {
        let fx = Fixture::new(MockPdfBackend::with_text(&["abc", "", "def"]), None);
        let input = fx.write("doc.pdf", b"%PDF");

        let result = fx.extractor().extract(&input, FileKind::Pdf).await.unwrap();
        assert_eq!(result.text, "abcdef");
    }

    #[tokio::test]
    async fn test_blank_pdf_falls_back_to_ocr_with_page_headers() {
        let fx = Fixture::new(
            MockPdfBackend::with_text(&["  \n", "\n", ""]),
            Some(MockEngine::returning("  recognized  \n")),
        );
        let input = fx.write("scan.pdf", b"%PDF");

        let result = fx.extractor().extract(&input, FileKind::Pdf).await.unwrap();

        assert_eq!(result.method, ExtractionMethod::Ocr);
        assert_eq!(
            result.text,
            "--- Page 1 ---\nrecognized\n\n--- Page 2 ---\nrecognized\n\n--- Page 3 ---\nrecognized"
        );
        assert_eq!(fx.ocr_calls().len(), 3);

        let first = result.text.find("--- Page 1 ---").unwrap();
        let second = result.text.find("--- Page 2 ---").unwrap();
        let third = result.text.find("--- Page 3 ---").unwrap();
        assert!(first < second && second < third);
    }

    #[tokio::test]
    async fn test_pages_rendered_in_order_at_double_scale() {
        let fx = Fixture::new(
            MockPdfBackend::with_text(&["", ""]),
            Some(MockEngine::returning("x")),
        );
        let input = fx.write("scan.pdf", b"%PDF");

        fx.extractor().extract(&input, FileKind::Pdf).await.unwrap();

        assert_eq!(fx.pdf.renders(), vec![(0, 2.0), (1, 2.0)]);
    }

    #[tokio::test]
    async fn test_extraction_error_falls_back_to_ocr() {
        let fx = Fixture::new(
            MockPdfBackend::failing("corrupt xref", 1),
            Some(MockEngine::returning("scanned text")),
        );
        let input = fx.write("broken.pdf", b"%PDF");

        let result = fx.extractor().extract(&input, FileKind::Pdf).await.unwrap();

        assert_eq!(result.text, "--- Page 1 ---\nscanned text");
        assert_eq!(fx.ocr_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_page_rasters_removed_after_ocr() {
        let fx = Fixture::new(
            MockPdfBackend::with_text(&["", "", ""]),
            Some(MockEngine::returning("x")),
        );
        let input = fx.write("scan.pdf", b"%PDF");

        fx.extractor().extract(&input, FileKind::Pdf).await.unwrap();

        let calls = fx.ocr_calls();
        assert_eq!(calls.len(), 3);
        for raster in &calls {
            assert!(raster.extension().is_some_and(|ext| ext == "png"));
            assert!(!raster.exists());
        }
        assert!(fx.leftovers(&[input.as_path()]).is_empty());
    }

    #[tokio::test]
    async fn test_ocr_failure_propagates_and_cleans_up() {
        let fx = Fixture::new(
            MockPdfBackend::with_text(&["", ""]),
            Some(MockEngine::failing("engine crashed")),
        );
        let input = fx.write("scan.pdf", b"%PDF");

        let err = fx.extractor().extract(&input, FileKind::Pdf).await.unwrap_err();

        assert!(matches!(err, ExtractError::Ocr(_)));
        assert!(err.to_string().contains("engine crashed"));
        assert!(fx.leftovers(&[input.as_path()]).is_empty());
    }

    #[tokio::test]
    async fn test_blank_pdf_without_ocr_returns_guidance() {
        let fx = Fixture::new(MockPdfBackend::with_text(&[""]), None);
        let input = fx.write("scan.pdf", b"%PDF");

        let result = fx.extractor().extract(&input, FileKind::Pdf).await.unwrap();

        assert_eq!(result.method, ExtractionMethod::Guidance);
        assert_eq!(result.text, PDF_OCR_UNAVAILABLE);
        assert!(fx.pdf.renders().is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_pdf_without_ocr_returns_guidance() {
        let fx = Fixture::new(MockPdfBackend::failing("not a pdf", 0), None);
        let input = fx.write("scan.pdf", b"garbage");

        let result = fx.extractor().extract(&input, FileKind::Pdf).await.unwrap();
        assert_eq!(result.method, ExtractionMethod::Guidance);
    }

    #[tokio::test]
    async fn test_zero_page_pdf_ocr_is_empty() {
        let fx = Fixture::new(
            MockPdfBackend::with_text(&[]),
            Some(MockEngine::returning("x")),
        );
        let input = fx.write("empty.pdf", b"%PDF");

        let result = fx.extractor().extract(&input, FileKind::Pdf).await.unwrap();
        assert_eq!(result.text, "");
        assert!(fx.ocr_calls().is_empty());
    }

    #[tokio::test]
    async fn test_image_ocr() {
        let fx = Fixture::new(
            MockPdfBackend::with_text(&[]),
            Some(MockEngine::returning("\n  receipt total 1200 \n")),
        );
        let input = fx.write("photo.png", &MockPdfBackend::blank_png());

        let result = fx.extractor().extract(&input, FileKind::Image).await.unwrap();

        assert_eq!(result.text, "receipt total 1200");
        assert_eq!(result.method, ExtractionMethod::Ocr);

        let calls = fx.ocr_calls();
        assert_eq!(calls.len(), 1);
        assert_ne!(calls[0], input);
        assert!(fx.leftovers(&[input.as_path()]).is_empty());
    }

    #[tokio::test]
    async fn test_image_is_handed_to_engine_as_png() {
        let fx = Fixture::new(
            MockPdfBackend::with_text(&[]),
            Some(MockEngine::returning("bitmap text")),
        );

        let mut bmp = Vec::new();
        image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(4, 4, image::Rgb([0, 0, 0])))
            .write_to(&mut Cursor::new(&mut bmp), ImageFormat::Bmp)
            .unwrap();
        let input = fx.write("scan.bmp", &bmp);

        let result = fx.extractor().extract(&input, FileKind::Image).await.unwrap();
        assert_eq!(result.text, "bitmap text");

        let calls = fx.ocr_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].extension().and_then(|e| e.to_str()), Some("png"));
        assert!(fx.leftovers(&[input.as_path()]).is_empty());
    }

    #[test]
    fn test_normalize_image_produces_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("photo.jpg");
        std::fs::write(&path, MockPdfBackend::blank_png()).unwrap();

        let png = normalize_image(&path).unwrap();
        assert_eq!(image::guess_format(&png).unwrap(), ImageFormat::Png);
    }

    #[tokio::test]
    async fn test_image_without_ocr_returns_guidance() {
        let fx = Fixture::new(MockPdfBackend::with_text(&[]), None);
        let input = fx.write("photo.png", b"not even decoded");

        let result = fx.extractor().extract(&input, FileKind::Image).await.unwrap();

        assert_eq!(result.method, ExtractionMethod::Guidance);
        assert!(result.text.contains("OCR processing is not available"));
    }

    #[tokio::test]
    async fn test_undecodable_image_is_an_error() {
        let fx = Fixture::new(
            MockPdfBackend::with_text(&[]),
            Some(MockEngine::returning("x")),
        );
        let input = fx.write("photo.png", b"definitely not an image");

        let err = fx.extractor().extract(&input, FileKind::Image).await.unwrap_err();

        assert!(matches!(err, ExtractError::Image(_)));
        assert!(fx.ocr_calls().is_empty());
    }

    #[test]
    fn test_ocr_available_flag() {
        let with = Fixture::new(MockPdfBackend::with_text(&[]), Some(MockEngine::returning("")));
        let without = Fixture::new(MockPdfBackend::with_text(&[]), None);
        assert!(with.extractor().ocr_available());
        assert!(!without.extractor().ocr_available());
    }
}
