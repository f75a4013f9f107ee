//! In-memory session provider for testing.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::traits::{SessionError, SessionProvider};

/// Session provider whose token lives in memory.
///
/// Clones share the same token, so a test can sign the session out while a
/// manager holds another handle.
#[derive(Debug, Clone, Default)]
pub struct InMemorySession {
    token: Arc<Mutex<Option<String>>>,
    fail_with: Arc<Mutex<Option<SessionError>>>,
}

impl InMemorySession {
    /// Create a session with no signed-in user.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session that is already signed in.
    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Self::default();
        session.set_token(Some(token.into()));
        session
    }

    /// Replace the current token.
    pub fn set_token(&self, token: Option<String>) {
        *self.token.lock().unwrap() = token;
    }

    /// Make every lookup fail with the given error.
    pub fn fail_with(&self, error: Option<SessionError>) {
        *self.fail_with.lock().unwrap() = error;
    }
}

#[async_trait]
impl SessionProvider for InMemorySession {
    async fn access_token(&self) -> Result<Option<String>, SessionError> {
        if let Some(err) = self.fail_with.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(self.token.lock().unwrap().clone())
    }
}
