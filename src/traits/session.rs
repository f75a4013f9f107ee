//! Session provider trait abstraction.
//!
//! Every knowledge base request carries a bearer token. The token comes from
//! a session provider so the manager never owns credential storage itself.

use async_trait::async_trait;
use thiserror::Error;

/// Session lookup errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SessionError {
    /// The session store could not be read
    #[error("Failed to read session: {0}")]
    ReadFailed(String),

    /// The session file exists but is not valid JSON
    #[error("Invalid session data: {0}")]
    Malformed(String),

    /// The session has expired
    #[error("Session expired")]
    Expired,
}

/// Trait for retrieving the current session's access token.
///
/// # Example
///
/// ```ignore
/// use kbtree::traits::SessionProvider;
///
/// async fn auth_header<P: SessionProvider>(provider: &P) -> Option<String> {
///     provider.access_token().await.ok().flatten().map(|t| format!("Bearer {}", t))
/// }
/// ```
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Return the access token of the current session.
    ///
    /// - `Ok(Some(token))` when a session is active
    /// - `Ok(None)` when no one is signed in
    /// - `Err(error)` when the session store could not be consulted
    async fn access_token(&self) -> Result<Option<String>, SessionError>;
}
