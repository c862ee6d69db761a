//! Document session endpoints
//!
//! Endpoints:
//! - POST /api/v1/sessions - Upload a PDF and start a session
//! - GET /api/v1/sessions/:id - Session snapshot
//! - DELETE /api/v1/sessions/:id - Discard a session
//! - PUT /api/v1/sessions/:id/document - Upload a new PDF into the session
//! - GET /api/v1/sessions/:id/original - Original PDF bytes for the viewer
//! - PUT /api/v1/sessions/:id/text - Replace the edited text
//! - PUT /api/v1/sessions/:id/preferences - Update display preferences
//! - POST /api/v1/sessions/:id/summary - Generate an AI summary
//! - GET /api/v1/sessions/:id/export - Download the edited text as a PDF

use axum::{
    body::{Body, Bytes},
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header, StatusCode},
    response::Response,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::export::{export_pdf, EXPORT_FILE_NAME};
use crate::session::{DocumentUpload, Preferences, PreferencesUpdate, SessionSnapshot};
use crate::state::AppState;
use crate::summarize::Summary;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TextUpdate {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextUpdateResponse {
    pub chars: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    #[serde(flatten)]
    pub summary: Summary,
    /// False when the document was replaced while the summary was generated
    pub stored: bool,
}

// ============================================================================
// Router
// ============================================================================

/// Create the sessions router
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", post(create_session))
        .route("/:id", get(get_session).delete(delete_session))
        .route("/:id/document", put(replace_document))
        .route("/:id/original", get(get_original))
        .route("/:id/text", put(update_text))
        .route("/:id/preferences", put(update_preferences))
        .route("/:id/summary", post(summarize))
        .route("/:id/export", get(export))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

// ============================================================================
// Handlers
// ============================================================================

/// Upload a PDF and start a new session
async fn create_session(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<SessionSnapshot>)> {
    let upload = read_upload(&state, multipart).await?;
    let snapshot = state.sessions().create(upload)?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>> {
    Ok(Json(state.sessions().get(id)?))
}

async fn delete_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    state.sessions().remove(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Upload a new PDF into an existing session, replacing the edit buffer
async fn replace_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<SessionSnapshot>> {
    // fail fast before extracting a document nobody can receive
    state.sessions().get(id)?;
    let upload = read_upload(&state, multipart).await?;
    Ok(Json(state.sessions().reseed(id, upload)?))
}

/// Serve the untouched upload for the in-page viewer
async fn get_original(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Response> {
    let original = state.sessions().original(id)?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(header::CONTENT_DISPOSITION, "inline")
        .header(header::CONTENT_LENGTH, original.bytes.len())
        .body(Body::from(original.bytes))
        .map_err(|e| AppError::Internal(e.to_string()))
}

async fn update_text(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<TextUpdate>,
) -> Result<Json<TextUpdateResponse>> {
    let chars = state.sessions().update_text(id, update.text)?;
    Ok(Json(TextUpdateResponse { chars }))
}

async fn update_preferences(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<PreferencesUpdate>,
) -> Result<Json<Preferences>> {
    Ok(Json(state.sessions().update_preferences(id, update)?))
}

/// Summarize the current edited text at the session's detail level
///
/// The session is marked busy for the duration of the call. On failure the
/// stored summary is left as it was.
async fn summarize(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SummaryResponse>> {
    let job = state.sessions().begin_summary(id)?;

    let summary = match state.summarizer().summarize(&job.text, job.detail).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::warn!(session_id = %job.session_id, error = %e, "Summary request failed");
            return Err(e.into());
        }
    };

    let stored = state
        .sessions()
        .store_summary(id, job.generation, summary.text.clone())?;

    tracing::info!(
        session_id = %job.session_id,
        generation = job.generation,
        detail = %summary.detail,
        chars = summary.text.len(),
        stored = stored,
        "Summary generated"
    );

    Ok(Json(SummaryResponse { summary, stored }))
}

/// Render the edited text as a PDF download
async fn export(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Response> {
    let text = state.sessions().export_source(id)?;

    let bytes = tokio::task::spawn_blocking(move || export_pdf(&text))
        .await
        .map_err(|e| AppError::Internal(format!("Export task failed: {}", e)))??;

    tracing::info!(session_id = %id, bytes = bytes.len(), "Exported edited PDF");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
        )
        .header(header::CONTENT_LENGTH, bytes.len())
        .body(Body::from(bytes))
        .map_err(|e| AppError::Internal(e.to_string()))
}

// ============================================================================
// Helpers
// ============================================================================

/// Read the `file` field of a multipart upload and extract its text
async fn read_upload(state: &AppState, mut multipart: Multipart) -> Result<DocumentUpload> {
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();

        tracing::debug!(
            "Received field: name='{}', filename={:?}, content_type={:?}",
            name,
            field.file_name(),
            field.content_type()
        );

        if name != "file" && name != "document" {
            continue;
        }

        let file_name = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "document.pdf".to_string());
        let bytes = field.bytes().await?;

        tracing::debug!("Read {} bytes of file data", bytes.len());

        return extract_upload(state, file_name, bytes).await;
    }

    tracing::warn!("No file field found in multipart upload");
    Err(AppError::BadRequest("No file field in upload".to_string()))
}

async fn extract_upload(state: &AppState, file_name: String, bytes: Bytes) -> Result<DocumentUpload> {
    let extractor = state.extractor();
    let data = bytes.clone();

    let extracted = tokio::task::spawn_blocking(move || extractor.extract(&data))
        .await
        .map_err(|e| AppError::Internal(format!("Extraction task failed: {}", e)))??;

    Ok(DocumentUpload {
        file_name,
        bytes,
        extracted,
    })
}
