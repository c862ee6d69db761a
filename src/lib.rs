//! SmartScan Server
//!
//! Upload a PDF, edit its extracted text next to the original, summarize it
//! with a remote LLM, and export the edited text as a new PDF.
//!
//! # Modules
//!
//! - `extract`: best-effort per-page PDF text extraction
//! - `session`: ephemeral per-browser-session document state
//! - `summarize`: prompt construction and AI providers
//! - `export`: plain-text re-typesetting to PDF
//! - `routes`: HTTP API and the browser front end

pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod routes;
pub mod session;
pub mod state;
pub mod summarize;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the application router
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let max_upload_bytes = state.config().server.max_upload_bytes;

    Router::new()
        .route("/", get(routes::ui::index))
        .route("/health", get(routes::health::health_check))
        .route("/api/v1/health", get(routes::health::health_check))
        .nest("/api/v1/sessions", routes::sessions::router(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
