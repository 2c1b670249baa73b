//! Fixed messages returned in place of OCR output when no engine is installed

/// Returned for image uploads
pub const IMAGE_OCR_UNAVAILABLE: &str = "[Image file - OCR processing is not available]

The image was uploaded successfully, but OCR processing requires Tesseract to be installed on the server.

Currently available:
- Text extraction from PDF files
- Not available: OCR of image files (Tesseract is not installed)

Recommendations:
- Upload a PDF file with selectable text instead
- Or convert the image to PDF before uploading

Installing Tesseract:
- Homebrew: brew install tesseract
- Debian/Ubuntu: apt install tesseract-ocr
- Or install it manually from the official site";

/// Returned for PDFs without embedded text
pub const PDF_OCR_UNAVAILABLE: &str = "[PDF file] The PDF was uploaded successfully, but OCR processing requires Tesseract to be installed; only embedded text extraction is available.";
