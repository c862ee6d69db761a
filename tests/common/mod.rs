//! Shared helpers for integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use parking_lot::Mutex;
use tokio::sync::Notify;

use smartscan_server::config::Config;
use smartscan_server::extract::PdfTextExtractor;
use smartscan_server::session::SessionStore;
use smartscan_server::state::AppState;
use smartscan_server::summarize::{
    SummaryError, SummaryProvider, SummaryProviderKind, SummaryService,
};

/// Build a PDF with one text line per page
pub fn build_pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
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
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Text drawn by every `Tj` operator, in page order
pub fn shown_text(pdf: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(pdf).unwrap();
    doc.get_pages()
        .into_values()
        .flat_map(|page_id| {
            Content::decode(&doc.get_page_content(page_id).unwrap())
                .unwrap()
                .operations
        })
        .filter(|op| op.operator == "Tj")
        .map(|op| match &op.operands[0] {
            Object::String(bytes, _) => String::from_utf8_lossy(bytes).into_owned(),
            other => panic!("unexpected operand {:?}", other),
        })
        .collect()
}

/// A multipart/form-data request with a single `file` field
pub fn multipart_request(method: Method, uri: &str, file_name: &str, data: &[u8]) -> Request<Body> {
    let boundary = "smartscan-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/pdf\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Provider that replays queued replies and records prompts
pub struct StubProvider {
    replies: Mutex<VecDeque<Result<String, String>>>,
    pub prompts: Mutex<Vec<String>>,
    /// When set, each call waits for a notification before replying
    pub gate: Option<Arc<Notify>>,
}

impl StubProvider {
    pub fn new(replies: Vec<Result<&str, &str>>) -> Self {
        Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            prompts: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    pub fn gated(replies: Vec<Result<&str, &str>>, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new(replies)
        }
    }
}

#[async_trait]
impl SummaryProvider for StubProvider {
    fn provider_type(&self) -> SummaryProviderKind {
        SummaryProviderKind::Stub
    }

    fn model(&self) -> &str {
        "stub-model"
    }

    async fn generate(&self, prompt: &str) -> Result<String, SummaryError> {
        self.prompts.lock().push(prompt.to_string());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let reply = self.replies.lock().pop_front();
        match reply {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(SummaryError::Api {
                status: 401,
                body: message,
            }),
            None => Err(SummaryError::EmptyResponse),
        }
    }
}

/// App state around a summary service
pub fn state_with(summarizer: SummaryService) -> AppState {
    let config = Config::default();
    let sessions = SessionStore::from_config(&config.session);
    AppState::with_parts(config, sessions, summarizer, Arc::new(PdfTextExtractor::new()))
}
