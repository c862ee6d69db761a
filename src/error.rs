//! Error types for the SmartScan server

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::export::ExportError;
use crate::extract::ExtractError;
use crate::session::SessionError;
use crate::summarize::SummaryError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Upload error: {0}")]
    Multipart(#[from] MultipartError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("AI summary failed: {0}")]
    Summary(#[from] SummaryError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Multipart(e) => (e.status(), "bad_upload", e.body_text()),
            AppError::Extract(e) => match e {
                ExtractError::UnsupportedFormat => (
                    StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    "unsupported_format",
                    "Only PDF documents are supported".to_string(),
                ),
                ExtractError::Load(_) => (StatusCode::BAD_REQUEST, "invalid_pdf", e.to_string()),
            },
            AppError::Session(e) => {
                let error_type = match e {
                    SessionError::NotFound(_) => "session_not_found",
                    SessionError::TooManySessions { .. } => "too_many_sessions",
                    SessionError::SummaryInFlight(_) => "summary_in_flight",
                };
                (e.status_code(), error_type, e.to_string())
            }
            AppError::Summary(e) => {
                tracing::warn!("Summary error: {}", e);
                let error_type = match e {
                    SummaryError::NotConfigured(_) => "ai_not_configured",
                    _ => "ai_error",
                };
                (e.status_code(), error_type, format!("AI Error: {}", e))
            }
            AppError::Export(e) => {
                tracing::error!("Export error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "export_error",
                    format!("Export failed: {}", e),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
            details: if cfg!(debug_assertions) {
                Some(self.to_string())
            } else {
                None
            },
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::from(ExtractError::UnsupportedFormat), StatusCode::UNSUPPORTED_MEDIA_TYPE),
            (AppError::from(ExtractError::Load("xref".into())), StatusCode::BAD_REQUEST),
            (AppError::from(SessionError::NotFound("x".into())), StatusCode::NOT_FOUND),
            (AppError::from(SessionError::SummaryInFlight(Uuid::nil())), StatusCode::CONFLICT),
            (
                AppError::from(SummaryError::NotConfigured("no key".into())),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (AppError::from(SummaryError::EmptyResponse), StatusCode::BAD_GATEWAY),
            (
                AppError::from(ExportError::TooLarge { max_pages: 1 }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
