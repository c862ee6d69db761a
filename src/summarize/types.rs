//! Summary Types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Summary provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryProviderKind {
    /// Google Gemini `generateContent`
    Gemini,
    /// OpenAI-compatible chat completions
    OpenAi,
    /// In-process stub
    Stub,
}

/// How much detail the summary should have
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SummaryDetail {
    #[default]
    Brief,
    Medium,
    Detailed,
}

impl SummaryDetail {
    pub const ALL: [SummaryDetail; 3] = [Self::Brief, Self::Medium, Self::Detailed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Brief => "Brief",
            Self::Medium => "Medium",
            Self::Detailed => "Detailed",
        }
    }
}

impl fmt::Display for SummaryDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generated summary
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub text: String,
    pub detail: SummaryDetail,
    pub provider: SummaryProviderKind,
    pub model: String,
    /// Characters of the document included in the prompt
    pub excerpt_chars: usize,
}

/// Summary error types
#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    #[error("AI summaries are not configured: {0}")]
    NotConfigured(String),

    #[error("Failed to reach AI service: {0}")]
    Request(String),

    #[error("AI service returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Malformed AI response: {0}")]
    MalformedResponse(String),

    #[error("AI service returned no text")]
    EmptyResponse,
}

impl SummaryError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::BAD_GATEWAY,
        }
    }
}
