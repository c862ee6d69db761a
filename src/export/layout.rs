//! Document flow for exported PDFs

use serde::Serialize;

/// Title printed at the top of every export
pub const EXPORT_TITLE: &str = "SmartScan AI - Edited Export";

/// Space after the title, in points
pub const TITLE_SPACER: f32 = 12.0;

/// Space emitted for each blank line, in points
pub const BLANK_LINE_SPACER: f32 = 10.0;

/// One flowable in the exported document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Element {
    Heading(String),
    Paragraph(String),
    /// Vertical gap in points
    Spacer(f32),
}

/// Lay out plain text: a title, then one paragraph per non-blank line and
/// one spacer per blank line.
pub fn layout(text: &str) -> Vec<Element> {
    let mut elements = vec![
        Element::Heading(EXPORT_TITLE.to_string()),
        Element::Spacer(TITLE_SPACER),
    ];

    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim().is_empty() {
            elements.push(Element::Spacer(BLANK_LINE_SPACER));
        } else {
            elements.push(Element::Paragraph(collapse_whitespace(line)));
        }
    }

    elements
}

fn collapse_whitespace(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}
