//! PDF export
//!
//! Re-typesets the edited plain text as a new PDF. The original layout,
//! fonts and images are not carried over.

mod layout;
mod metrics;
mod render;

pub use layout::{layout, Element, BLANK_LINE_SPACER, EXPORT_TITLE, TITLE_SPACER};
pub use render::{render, wrap, MAX_PAGES, PAGE_HEIGHT, PAGE_WIDTH};

use thiserror::Error;

/// File name offered for the download
pub const EXPORT_FILE_NAME: &str = "Edited_Doc.pdf";

/// Export errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to encode page content: {0}")]
    Encode(String),

    #[error("Failed to write PDF: {0}")]
    Write(String),

    #[error("Document exceeds {max_pages} pages")]
    TooLarge { max_pages: usize },
}

/// Lay out and render `text` as a PDF
pub fn export_pdf(text: &str) -> Result<Vec<u8>, ExportError> {
    let elements = layout(text);
    let bytes = render(&elements)?;

    tracing::debug!(
        elements = elements.len(),
        bytes = bytes.len(),
        "Rendered export PDF"
    );

    Ok(bytes)
}
