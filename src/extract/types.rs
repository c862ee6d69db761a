//! Extraction types

use serde::Serialize;
use thiserror::Error;

/// Leading bytes of every PDF file
pub const PDF_MAGIC: &[u8] = b"%PDF";

/// Extraction errors
///
/// Only whole-document failures are errors. Page failures are absorbed.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Not a PDF document")]
    UnsupportedFormat,

    #[error("Failed to load PDF: {0}")]
    Load(String),
}

/// Text extracted from a PDF, one entry per page in document order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedText {
    pub pages: Vec<String>,
}

impl ExtractedText {
    pub fn new(pages: Vec<String>) -> Self {
        Self { pages }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// 1-based numbers of pages that produced no text
    pub fn empty_pages(&self) -> Vec<usize> {
        self.pages
            .iter()
            .enumerate()
            .filter(|(_, text)| text.is_empty())
            .map(|(i, _)| i + 1)
            .collect()
    }

    /// Concatenation of all pages
    pub fn text(&self) -> String {
        self.pages.concat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_concatenates_in_order() {
        let extracted = ExtractedText::new(vec!["Hello ".into(), String::new(), "World".into()]);
        assert_eq!(extracted.text(), "Hello World");
        assert_eq!(extracted.page_count(), 3);
        assert_eq!(extracted.empty_pages(), vec![2]);
    }
}
