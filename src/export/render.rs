//! Page-flow PDF writer
//!
//! Flows layout elements top to bottom through a fixed frame on US Letter
//! pages, starting a new page whenever the frame is full.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

use super::layout::{Element, EXPORT_TITLE};
use super::metrics::{encode_win_ansi, text_width};
use super::ExportError;

/// US Letter, in points
pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;
pub const MARGIN: f32 = 72.0;

/// Refuse to produce documents longer than this
pub const MAX_PAGES: usize = 5000;

const FRAME_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const FRAME_TOP: f32 = PAGE_HEIGHT - MARGIN;
const FRAME_BOTTOM: f32 = MARGIN;

const BODY_FONT: &str = "F1";
const HEADING_FONT: &str = "F2";

#[derive(Debug, Clone, Copy)]
struct TextStyle {
    font: &'static str,
    size: f32,
    leading: f32,
    space_after: f32,
}

const BODY: TextStyle = TextStyle {
    font: BODY_FONT,
    size: 10.0,
    leading: 12.0,
    space_after: 0.0,
};

const HEADING: TextStyle = TextStyle {
    font: HEADING_FONT,
    size: 18.0,
    leading: 22.0,
    space_after: 6.0,
};

/// Accumulates page content while flowing elements
struct PageFlow {
    pages: Vec<Vec<Operation>>,
    cursor: f32,
}

impl PageFlow {
    fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            cursor: FRAME_TOP,
        }
    }

    fn new_page(&mut self) -> Result<(), ExportError> {
        if self.pages.len() >= MAX_PAGES {
            return Err(ExportError::TooLarge { max_pages: MAX_PAGES });
        }
        self.pages.push(Vec::new());
        self.cursor = FRAME_TOP;
        Ok(())
    }

    fn current(&mut self) -> &mut Vec<Operation> {
        // pages is never empty
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn spacer(&mut self, height: f32) -> Result<(), ExportError> {
        if self.cursor - height < FRAME_BOTTOM {
            // a spacer never carries over to the next page
            return self.new_page();
        }
        self.cursor -= height;
        Ok(())
    }

    fn paragraph(&mut self, text: &str, style: TextStyle) -> Result<(), ExportError> {
        for line in wrap(text, style.size, FRAME_WIDTH) {
            if self.cursor - style.leading < FRAME_BOTTOM {
                self.new_page()?;
            }
            let baseline = self.cursor - style.size;
            self.cursor -= style.leading;

            let ops = self.current();
            ops.push(Operation::new("BT", vec![]));
            ops.push(Operation::new("Tf", vec![style.font.into(), style.size.into()]));
            ops.push(Operation::new("Td", vec![MARGIN.into(), baseline.into()]));
            ops.push(Operation::new(
                "Tj",
                vec![Object::String(encode_win_ansi(&line), StringFormat::Literal)],
            ));
            ops.push(Operation::new("ET", vec![]));
        }
        self.cursor = (self.cursor - style.space_after).max(FRAME_BOTTOM);
        Ok(())
    }
}

/// Greedy word wrap to `width` points. Words wider than a line are broken
/// between characters.
pub fn wrap(text: &str, font_size: f32, width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split(' ').filter(|w| !w.is_empty()) {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if text_width(&candidate, font_size) <= width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if text_width(word, font_size) <= width {
            current = word.to_string();
        } else {
            for c in word.chars() {
                let mut next = current.clone();
                next.push(c);
                if !current.is_empty() && text_width(&next, font_size) > width {
                    lines.push(std::mem::take(&mut current));
                    current.push(c);
                } else {
                    current = next;
                }
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Render layout elements into a serialized PDF
pub fn render(elements: &[Element]) -> Result<Vec<u8>, ExportError> {
    let mut flow = PageFlow::new();
    for element in elements {
        match element {
            Element::Heading(text) => flow.paragraph(text, HEADING)?,
            Element::Paragraph(text) => flow.paragraph(text, BODY)?,
            Element::Spacer(height) => flow.spacer(*height)?,
        }
    }

    let mut doc = build_document(flow.pages)?;

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| ExportError::Write(e.to_string()))?;
    Ok(bytes)
}

fn build_document(pages: Vec<Vec<Operation>>) -> Result<Document, ExportError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let body_font = doc.add_object(standard_font("Helvetica"));
    let heading_font = doc.add_object(standard_font("Helvetica-Bold"));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            BODY_FONT => body_font,
            HEADING_FONT => heading_font,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations };
        let encoded = content
            .encode()
            .map_err(|e| ExportError::Encode(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(EXPORT_TITLE),
        "Producer" => Object::string_literal(concat!("smartscan-server ", env!("CARGO_PKG_VERSION"))),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    Ok(doc)
}

fn standard_font(base_font: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}
