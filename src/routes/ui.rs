//! Browser front end
//!
//! A single page: sidebar preferences, upload, and the Workspace / AI
//! Analysis / Export tabs. All state lives behind the session API; the page
//! only keeps the session id in memory, so a reload starts over.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
