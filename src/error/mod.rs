//! Unified error handling for the knowledge base client.
//!
//! Every failure falls into one of these groups:
//!
//! | Category | Source | Surfaced as |
//! |----------|--------|-------------|
//! | User / Client | [`ValidationError`], raised before any request | inline message or notice |
//! | Auth | [`AuthError`], missing or expired session | notice |
//! | Server | [`ApiError`], non-2xx (413 has its own message) | notice |
//! | Network | [`NetworkError`], transport or parse failure | notice |
//! | System | [`SystemError`], reading dropped files | notice |
//!
//! No error is fatal. Handlers clear their transient flags on every path.

mod api;
mod auth;
mod category;
mod context;
mod kb_error;
mod network;
mod result;
mod system;
mod validation;

pub use api::{ApiError, KNOWLEDGE_BASE_LIMIT_MB};
pub use auth::AuthError;
pub use category::ErrorCategory;
pub use context::ErrorContext;
pub use kb_error::KbError;
pub use network::NetworkError;
pub use result::{KbResult, ResultExt};
pub use system::{classify_io_error, SystemError};
pub use validation::{ValidationError, DUPLICATE_FOLDER_MESSAGE};
