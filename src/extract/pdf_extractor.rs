//! Text extraction backed by lopdf, with pdf-extract for CID fonts

use std::panic::{self, AssertUnwindSafe};

use lopdf::Document;

use super::types::{ExtractError, ExtractedText, PDF_MAGIC};
use super::TextExtractor;

/// What lopdf's `decode_text` emits for text in an `Identity-H` font
const UNDECODED_MARKER: &str = "?Identity-H Unimplemented?";

/// Pure-Rust extractor.
///
/// lopdf reads each page's content stream. Pages drawn with composite
/// (`Identity-H`) fonts are decoded again through their ToUnicode maps by
/// pdf-extract.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, data: &[u8]) -> Result<ExtractedText, ExtractError> {
        if !data.starts_with(PDF_MAGIC) {
            return Err(ExtractError::UnsupportedFormat);
        }

        let doc = Document::load_mem(data).map_err(|e| ExtractError::Load(e.to_string()))?;
        let mut pages = page_texts(&doc);

        if pages.iter().any(|page| matches!(page, PageText::Undecoded)) {
            match extract_with_cmaps(data) {
                Some(decoded) if decoded.len() == pages.len() => {
                    for (page, text) in pages.iter_mut().zip(decoded) {
                        if matches!(page, PageText::Undecoded) {
                            *page = PageText::Decoded(trim_page_breaks(&text));
                        }
                    }
                }
                Some(decoded) => {
                    tracing::warn!(
                        expected = pages.len(),
                        actual = decoded.len(),
                        "pdf-extract page count mismatch, dropping undecoded pages"
                    );
                }
                None => {}
            }
        }

        Ok(ExtractedText::new(
            pages.into_iter().map(PageText::into_text).collect(),
        ))
    }
}

/// Per-page outcome of the lopdf pass
#[derive(Debug, PartialEq)]
enum PageText {
    Decoded(String),
    /// Drawn in a font lopdf cannot decode
    Undecoded,
    Failed,
}

impl PageText {
    fn into_text(self) -> String {
        match self {
            PageText::Decoded(text) => text,
            PageText::Undecoded | PageText::Failed => String::new(),
        }
    }
}

fn page_texts(doc: &Document) -> Vec<PageText> {
    doc.get_pages()
        .into_keys()
        .map(|page_number| match doc.extract_text(&[page_number]) {
            Ok(text) if text.contains(UNDECODED_MARKER) => {
                tracing::debug!(page = page_number, "Page uses an Identity-H font");
                PageText::Undecoded
            }
            Ok(text) => PageText::Decoded(strip_trailing_breaks(text)),
            Err(e) => {
                tracing::debug!(page = page_number, error = %e, "Page text extraction failed");
                PageText::Failed
            }
        })
        .collect()
}

/// Extract every page of an already loaded document with lopdf alone.
///
/// Pages are visited in page-number order. A page that fails to decode
/// contributes an empty string.
pub fn extract_pages(doc: &Document) -> ExtractedText {
    ExtractedText::new(
        page_texts(doc)
            .into_iter()
            .map(PageText::into_text)
            .collect(),
    )
}

/// Run pdf-extract over the whole document, one string per page.
///
/// pdf-extract panics on some malformed input, so the call runs inside an
/// unwind boundary.
fn extract_with_cmaps(data: &[u8]) -> Option<Vec<String>> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(data)
    }));

    match result {
        Ok(Ok(pages)) => Some(pages),
        Ok(Err(e)) => {
            tracing::debug!(error = %e, "pdf-extract failed");
            None
        }
        Err(_) => {
            tracing::warn!("pdf-extract panicked on malformed document");
            None
        }
    }
}

/// lopdf terminates every text object with a line break; drop the ones at
/// the end of the page so pages concatenate cleanly.
fn strip_trailing_breaks(mut text: String) -> String {
    let trimmed = text.trim_end_matches(['\n', '\r']).len();
    text.truncate(trimmed);
    text
}

fn trim_page_breaks(text: &str) -> String {
    text.trim_matches(['\n', '\r']).to_string()
}
