//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::extract::{PdfTextExtractor, TextExtractor};
use crate::session::SessionStore;
use crate::summarize::SummaryService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    sessions: SessionStore,
    summarizer: SummaryService,
    extractor: Arc<dyn TextExtractor>,
}

impl AppState {
    /// Create application state from configuration
    pub fn new(config: Config) -> Self {
        let sessions = SessionStore::from_config(&config.session);
        let summarizer = SummaryService::from_config(&config.ai);
        Self::with_parts(config, sessions, summarizer, Arc::new(PdfTextExtractor::new()))
    }

    /// Assemble state from explicit collaborators
    pub fn with_parts(
        config: Config,
        sessions: SessionStore,
        summarizer: SummaryService,
        extractor: Arc<dyn TextExtractor>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                sessions,
                summarizer,
                extractor,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the session store
    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }

    /// Get the summary service
    pub fn summarizer(&self) -> &SummaryService {
        &self.inner.summarizer
    }

    /// Get the text extractor
    pub fn extractor(&self) -> Arc<dyn TextExtractor> {
        self.inner.extractor.clone()
    }
}
