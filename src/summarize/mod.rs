//! AI Summary Module
//!
//! Summarizes the edited document text with a remote LLM completion service.
//!
//! Supported backends:
//! - Google Gemini (`generateContent`)
//! - Any OpenAI-compatible chat completions endpoint
//!
//! Only the first [`EXCERPT_CHAR_LIMIT`] characters of the text are sent.
//! Failures are returned as [`SummaryError`]; there is no retry.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use smartscan_server::summarize::{SummaryDetail, SummaryService};
//!
//! let service = SummaryService::from_config(&config.ai);
//! let summary = service.summarize(&text, SummaryDetail::Brief).await?;
//! ```

mod prompt;
mod provider;
mod service;
mod types;

pub use prompt::{build_prompt, excerpt, EXCERPT_CHAR_LIMIT};
pub use provider::{GeminiProvider, OpenAiProvider, SummaryProvider};
pub use service::SummaryService;
pub use types::{Summary, SummaryDetail, SummaryError, SummaryProviderKind};
