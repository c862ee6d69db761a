//! Document Session Module
//!
//! Ephemeral per-browser-session state:
//! - The original PDF bytes, never modified
//! - The editable text, seeded from extraction
//! - The latest AI summary and display preferences
//!
//! Every new upload into a session replaces the edit buffer and clears the
//! summary.

pub mod store;
pub mod types;

pub use store::SessionStore;
pub use types::*;
