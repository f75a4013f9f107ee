//! File-based session provider adapter.
//!
//! Reads the signed-in session from `~/.kbtree/session.json`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::traits::{SessionError, SessionProvider};

/// The session directory name.
const SESSION_DIR: &str = ".kbtree";

/// The session file name.
const SESSION_FILE: &str = "session.json";

/// Session data persisted by whoever signed the user in.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StoredSession {
    /// Bearer token for the knowledge base API.
    pub access_token: Option<String>,
    /// Token expiration time as Unix timestamp (seconds since epoch).
    #[serde(default)]
    pub expires_at: Option<i64>,
}

impl StoredSession {
    /// Check if the token is expired. Sessions without an expiry never expire.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => chrono::Utc::now().timestamp() >= expires_at,
            None => false,
        }
    }
}

/// File-based session provider.
#[derive(Debug, Clone)]
pub struct FileSessionProvider {
    session_path: PathBuf,
}

impl FileSessionProvider {
    /// Create a provider reading from the default location.
    ///
    /// Returns `None` if the home directory cannot be determined.
    pub fn new() -> Option<Self> {
        let home = dirs::home_dir()?;
        Some(Self {
            session_path: home.join(SESSION_DIR).join(SESSION_FILE),
        })
    }

    /// Create a provider reading from an explicit path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            session_path: path.into(),
        }
    }

    /// Get the path to the session file.
    pub fn session_path(&self) -> &Path {
        &self.session_path
    }
}

#[async_trait]
impl SessionProvider for FileSessionProvider {
    async fn access_token(&self) -> Result<Option<String>, SessionError> {
        let raw = match tokio::fs::read(&self.session_path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SessionError::ReadFailed(e.to_string())),
        };

        let session: StoredSession = serde_json::from_slice(&raw)
            .map_err(|e| SessionError::Malformed(e.to_string()))?;

        if session.access_token.is_some() && session.is_expired() {
            tracing::debug!("Session at {:?} has expired", self.session_path);
            return Err(SessionError::Expired);
        }

        Ok(session.access_token)
    }
}
