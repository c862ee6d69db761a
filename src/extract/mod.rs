//! PDF text extraction
//!
//! Best-effort, page-by-page text extraction. A page that cannot be read
//! contributes an empty string; only a document that cannot be opened at
//! all is an error. No OCR and no layout reconstruction.

mod pdf_extractor;
mod types;

pub use pdf_extractor::{extract_pages, PdfTextExtractor};
pub use types::{ExtractError, ExtractedText, PDF_MAGIC};

/// Text extractor seam
pub trait TextExtractor: Send + Sync {
    /// Extract per-page text from raw PDF bytes
    fn extract(&self, data: &[u8]) -> Result<ExtractedText, ExtractError>;
}
