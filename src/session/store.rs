//! Session Store
//!
//! Holds document sessions in memory:
//! - One entry per browser session, keyed by a random UUID
//! - Idle sessions are evicted by a background cleanup task
//! - Nothing is persisted

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use super::types::{
    DocumentSession, DocumentUpload, InFlightGuard, OriginalDocument, Preferences,
    PreferencesUpdate, SessionError, SessionSnapshot, SummaryJob, DEFAULT_IDLE_MINUTES,
    DEFAULT_MAX_SESSIONS,
};
use crate::config::SessionConfig;

// ============================================================================
// Session Store
// ============================================================================

/// In-memory store of document sessions
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

struct SessionStoreInner {
    sessions: RwLock<HashMap<Uuid, DocumentSession>>,
    idle_timeout: Duration,
    /// Maximum live sessions (0 = unlimited)
    max_sessions: usize,
}

impl SessionStore {
    /// Create a store with default limits
    pub fn new() -> Self {
        Self::with_limits(Duration::minutes(DEFAULT_IDLE_MINUTES), DEFAULT_MAX_SESSIONS)
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::with_limits(Duration::minutes(config.idle_minutes), config.max_sessions)
    }

    pub fn with_limits(idle_timeout: Duration, max_sessions: usize) -> Self {
        Self {
            inner: Arc::new(SessionStoreInner {
                sessions: RwLock::new(HashMap::new()),
                idle_timeout,
                max_sessions,
            }),
        }
    }

    // ========================================================================
    // Session Lifecycle
    // ========================================================================

    /// Create a session seeded from an upload
    pub fn create(&self, upload: DocumentUpload) -> Result<SessionSnapshot, SessionError> {
        let mut sessions = self.inner.sessions.write();

        let max = self.inner.max_sessions;
        if max > 0 && sessions.len() >= max {
            return Err(SessionError::TooManySessions { max });
        }

        let session = DocumentSession::new(upload);
        let snapshot = session.snapshot();
        sessions.insert(session.id, session);

        tracing::info!(
            session_id = %snapshot.id,
            file_name = %snapshot.file_name,
            pages = snapshot.page_count,
            empty_pages = snapshot.empty_pages.len(),
            "Created document session"
        );

        Ok(snapshot)
    }

    /// Replace the session's document and edit buffer with a new upload
    pub fn reseed(&self, id: Uuid, upload: DocumentUpload) -> Result<SessionSnapshot, SessionError> {
        self.with_session(id, |session| {
            session.seed(upload);
            tracing::info!(
                session_id = %id,
                file_name = %session.file_name,
                pages = session.page_count,
                "Reseeded document session"
            );
            session.snapshot()
        })
    }

    /// Get a snapshot of a session
    pub fn get(&self, id: Uuid) -> Result<SessionSnapshot, SessionError> {
        self.with_session(id, |session| session.snapshot())
    }

    /// Get the original uploaded bytes
    pub fn original(&self, id: Uuid) -> Result<OriginalDocument, SessionError> {
        self.with_session(id, |session| OriginalDocument {
            file_name: session.file_name.clone(),
            bytes: session.original_bytes.clone(),
        })
    }

    /// Remove a session
    pub fn remove(&self, id: Uuid) -> Result<(), SessionError> {
        let removed = self.inner.sessions.write().remove(&id);
        match removed {
            Some(session) => {
                tracing::info!(
                    session_id = %id,
                    file_name = %session.file_name,
                    "Document session removed"
                );
                Ok(())
            }
            None => Err(SessionError::NotFound(id.to_string())),
        }
    }

    // ========================================================================
    // Editing
    // ========================================================================

    /// Replace the edited text
    pub fn update_text(&self, id: Uuid, text: String) -> Result<usize, SessionError> {
        self.with_session(id, |session| {
            session.edited_text = text;
            session.edited_text.chars().count()
        })
    }

    pub fn update_preferences(
        &self,
        id: Uuid,
        update: PreferencesUpdate,
    ) -> Result<Preferences, SessionError> {
        self.with_session(id, |session| {
            session.preferences.apply(update);
            session.preferences
        })
    }

    /// Text to export
    pub fn export_source(&self, id: Uuid) -> Result<String, SessionError> {
        self.with_session(id, |session| session.edited_text.clone())
    }

    // ========================================================================
    // Summaries
    // ========================================================================

    /// Capture the text and detail level for a summary request and mark the
    /// session busy until the returned job is dropped.
    pub fn begin_summary(&self, id: Uuid) -> Result<SummaryJob, SessionError> {
        self.with_session(id, |session| -> Result<SummaryJob, SessionError> {
            let guard = InFlightGuard::acquire(&session.summary_in_flight)
                .ok_or(SessionError::SummaryInFlight(id))?;

            Ok(SummaryJob {
                session_id: id,
                generation: session.generation,
                text: session.edited_text.clone(),
                detail: session.preferences.summary_detail,
                guard,
            })
        })?
    }

    /// Store a summary produced for `generation` of the session.
    ///
    /// Returns `false` if the document was replaced in the meantime, in which
    /// case the summary is dropped.
    pub fn store_summary(&self, id: Uuid, generation: u64, summary: String) -> Result<bool, SessionError> {
        self.with_session(id, |session| {
            if session.generation != generation {
                tracing::debug!(
                    session_id = %id,
                    job_generation = generation,
                    current_generation = session.generation,
                    "Discarding summary for replaced document"
                );
                return false;
            }
            session.summary_text = Some(summary);
            true
        })
    }

    // ========================================================================
    // Query Methods
    // ========================================================================

    pub fn len(&self) -> usize {
        self.inner.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.inner.sessions.read().contains_key(&id)
    }

    // ========================================================================
    // Cleanup
    // ========================================================================

    /// Evict sessions idle longer than the configured timeout
    ///
    /// Returns the number of sessions evicted
    pub fn cleanup_idle(&self) -> usize {
        let cutoff = Utc::now() - self.inner.idle_timeout;

        let count = {
            let mut sessions = self.inner.sessions.write();
            let before = sessions.len();
            sessions.retain(|_, session| !session.is_idle_since(cutoff));
            before - sessions.len()
        };

        if count > 0 {
            tracing::info!(count = count, "Evicted idle document sessions");
        }

        count
    }

    /// Start background cleanup task
    pub fn start_cleanup_task(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));

            loop {
                interval.tick().await;
                self.cleanup_idle();
            }
        })
    }

    /// Run `f` on a live session, refreshing its activity timestamp
    fn with_session<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut DocumentSession) -> T,
    ) -> Result<T, SessionError> {
        let mut sessions = self.inner.sessions.write();
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;
        session.touch();
        Ok(f(session))
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ExtractedText;
    use crate::summarize::SummaryDetail;
    use axum::body::Bytes;

    fn create_test_upload(pages: &[&str]) -> DocumentUpload {
        DocumentUpload {
            file_name: "report.pdf".to_string(),
            bytes: Bytes::from_static(b"%PDF-1.7 original"),
            extracted: ExtractedText::new(pages.iter().map(|p| p.to_string()).collect()),
        }
    }

    #[test]
    fn test_create_and_get() {
        let store = SessionStore::new();
        let created = store.create(create_test_upload(&["Hello ", "World"])).unwrap();

        let snapshot = store.get(created.id).unwrap();
        assert_eq!(snapshot.text, "Hello World");
        assert_eq!(snapshot.page_count, 2);
        assert!(snapshot.summary.is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_edit_round_trip() {
        let store = SessionStore::new();
        let id = store.create(create_test_upload(&["Hello ", "World"])).unwrap().id;

        store.update_text(id, "Hello Edited World".to_string()).unwrap();

        assert_eq!(store.get(id).unwrap().text, "Hello Edited World");
        assert_eq!(store.export_source(id).unwrap(), "Hello Edited World");
    }

    #[test]
    fn test_original_bytes_untouched_by_edits() {
        let store = SessionStore::new();
        let id = store.create(create_test_upload(&["text"])).unwrap().id;

        store.update_text(id, "something else".to_string()).unwrap();

        let original = store.original(id).unwrap();
        assert_eq!(&original.bytes[..], b"%PDF-1.7 original");
        assert_eq!(original.file_name, "report.pdf");
    }

    #[test]
    fn test_reseed_replaces_edit_buffer() {
        let store = SessionStore::new();
        let id = store.create(create_test_upload(&["first"])).unwrap().id;
        store.update_text(id, "first, edited".to_string()).unwrap();

        let job = store.begin_summary(id).unwrap();
        store.store_summary(id, job.generation, "about first".to_string()).unwrap();
        drop(job);

        let reseeded = store.reseed(id, create_test_upload(&["second"])).unwrap();
        assert_eq!(reseeded.text, "second");
        assert!(reseeded.summary.is_none());
    }

    #[test]
    fn test_unknown_session() {
        let store = SessionStore::new();
        let result = store.get(Uuid::new_v4());
        assert!(matches!(result, Err(SessionError::NotFound(_))));
    }

    #[test]
    fn test_session_limit() {
        let store = SessionStore::with_limits(Duration::minutes(5), 1);
        store.create(create_test_upload(&["a"])).unwrap();

        let result = store.create(create_test_upload(&["b"]));
        assert!(matches!(result, Err(SessionError::TooManySessions { max: 1 })));
    }

    #[test]
    fn test_summary_in_flight_is_exclusive() {
        let store = SessionStore::new();
        let id = store.create(create_test_upload(&["text"])).unwrap().id;

        let job = store.begin_summary(id).unwrap();
        assert!(store.get(id).unwrap().summary_in_flight);
        assert!(matches!(
            store.begin_summary(id),
            Err(SessionError::SummaryInFlight(_))
        ));

        drop(job);
        assert!(!store.get(id).unwrap().summary_in_flight);
        assert!(store.begin_summary(id).is_ok());
    }

    #[test]
    fn test_summary_job_captures_detail() {
        let store = SessionStore::new();
        let id = store.create(create_test_upload(&["text"])).unwrap().id;
        store
            .update_preferences(
                id,
                PreferencesUpdate {
                    dark_mode: None,
                    summary_detail: Some(SummaryDetail::Medium),
                },
            )
            .unwrap();

        let job = store.begin_summary(id).unwrap();
        assert_eq!(job.session_id, id);
        assert_eq!(job.detail, SummaryDetail::Medium);
        assert_eq!(job.text, "text");
    }

    #[test]
    fn test_stale_summary_is_discarded() {
        let store = SessionStore::new();
        let id = store.create(create_test_upload(&["first"])).unwrap().id;

        let job = store.begin_summary(id).unwrap();
        store.reseed(id, create_test_upload(&["second"])).unwrap();

        let stored = store.store_summary(id, job.generation, "about first".to_string()).unwrap();
        assert!(!stored);
        assert!(store.get(id).unwrap().summary.is_none());
    }

    #[test]
    fn test_cleanup_idle() {
        let store = SessionStore::with_limits(Duration::zero(), 0);
        store.create(create_test_upload(&["a"])).unwrap();
        store.create(create_test_upload(&["b"])).unwrap();

        std::thread::sleep(std::time::Duration::from_millis(5));

        assert_eq!(store.cleanup_idle(), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove() {
        let store = SessionStore::new();
        let id = store.create(create_test_upload(&["a"])).unwrap().id;

        store.remove(id).unwrap();

        assert!(!store.contains(id));
        assert!(store.remove(id).is_err());
    }
}
