//! Session types

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::body::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::extract::ExtractedText;
use crate::summarize::SummaryDetail;

// ============================================================================
// Constants
// ============================================================================

/// Idle time after which a session is evicted: 60 minutes
pub const DEFAULT_IDLE_MINUTES: i64 = 60;

/// Maximum live sessions (0 = unlimited)
pub const DEFAULT_MAX_SESSIONS: usize = 1000;

// ============================================================================
// Upload
// ============================================================================

/// A freshly uploaded and extracted PDF
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub file_name: String,
    pub bytes: Bytes,
    pub extracted: ExtractedText,
}

/// The untouched uploaded document, for the viewer
#[derive(Debug, Clone)]
pub struct OriginalDocument {
    pub file_name: String,
    pub bytes: Bytes,
}

// ============================================================================
// Preferences
// ============================================================================

/// Display preferences. Cosmetic, except that the detail level shapes the
/// summary prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub dark_mode: bool,
    pub summary_detail: SummaryDetail,
}

/// Partial preferences update
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesUpdate {
    #[serde(default)]
    pub dark_mode: Option<bool>,
    #[serde(default)]
    pub summary_detail: Option<SummaryDetail>,
}

impl Preferences {
    pub fn apply(&mut self, update: PreferencesUpdate) {
        if let Some(dark_mode) = update.dark_mode {
            self.dark_mode = dark_mode;
        }
        if let Some(detail) = update.summary_detail {
            self.summary_detail = detail;
        }
    }
}

// ============================================================================
// Session
// ============================================================================

/// Per-session document state
#[derive(Debug)]
pub struct DocumentSession {
    pub id: Uuid,
    pub file_name: String,
    /// Never mutated; a new upload replaces it wholesale
    pub original_bytes: Bytes,
    pub page_count: usize,
    pub empty_pages: Vec<usize>,
    pub edited_text: String,
    pub summary_text: Option<String>,
    pub preferences: Preferences,
    /// Bumped on every reseed so stale summaries can be discarded
    pub generation: u64,
    pub created_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
    pub(crate) summary_in_flight: Arc<AtomicBool>,
}

impl DocumentSession {
    /// Create a session seeded from an upload
    pub fn new(upload: DocumentUpload) -> Self {
        let now = Utc::now();
        let mut session = Self {
            id: Uuid::new_v4(),
            file_name: String::new(),
            original_bytes: Bytes::new(),
            page_count: 0,
            empty_pages: Vec::new(),
            edited_text: String::new(),
            summary_text: None,
            preferences: Preferences::default(),
            generation: 0,
            created_at: now,
            last_active_at: now,
            summary_in_flight: Arc::new(AtomicBool::new(false)),
        };
        session.seed(upload);
        session
    }

    /// Replace the document and the edit buffer. The summary belongs to the
    /// previous document and is cleared; preferences are kept.
    pub fn seed(&mut self, upload: DocumentUpload) {
        self.file_name = upload.file_name;
        self.original_bytes = upload.bytes;
        self.page_count = upload.extracted.page_count();
        self.empty_pages = upload.extracted.empty_pages();
        self.edited_text = upload.extracted.text();
        self.summary_text = None;
        self.generation += 1;
    }

    pub fn touch(&mut self) {
        self.last_active_at = Utc::now();
    }

    pub fn is_idle_since(&self, cutoff: DateTime<Utc>) -> bool {
        self.last_active_at < cutoff
    }

    pub fn summary_in_flight(&self) -> bool {
        self.summary_in_flight.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            file_name: self.file_name.clone(),
            size: self.original_bytes.len(),
            page_count: self.page_count,
            empty_pages: self.empty_pages.clone(),
            text: self.edited_text.clone(),
            summary: self.summary_text.clone(),
            preferences: self.preferences,
            summary_in_flight: self.summary_in_flight(),
            created_at: self.created_at,
            last_active_at: self.last_active_at,
        }
    }
}

/// Serializable view of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub file_name: String,
    /// Size of the original PDF in bytes
    pub size: usize,
    pub page_count: usize,
    /// Pages that yielded no text (1-based)
    pub empty_pages: Vec<usize>,
    pub text: String,
    pub summary: Option<String>,
    pub preferences: Preferences,
    pub summary_in_flight: bool,
    pub created_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
}

// ============================================================================
// Summary job
// ============================================================================

/// Marks a session's summary request as in flight until dropped
#[derive(Debug)]
pub struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl InFlightGuard {
    /// Claim the flag, or `None` if it is already held
    pub(crate) fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag: flag.clone() })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Inputs captured for one summary request
#[derive(Debug)]
pub struct SummaryJob {
    pub session_id: Uuid,
    pub generation: u64,
    pub text: String,
    pub detail: SummaryDetail,
    pub guard: InFlightGuard,
}

// ============================================================================
// Error Types
// ============================================================================

/// Session error types
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Too many active sessions (max: {max})")]
    TooManySessions { max: usize },

    #[error("A summary is already being generated for session {0}")]
    SummaryInFlight(Uuid),
}

impl SessionError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::TooManySessions { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::SummaryInFlight(_) => StatusCode::CONFLICT,
        }
    }
}
