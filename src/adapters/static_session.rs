//! Session provider backed by a fixed token.

use async_trait::async_trait;

use crate::traits::{SessionError, SessionProvider};

/// Session provider that always returns the token it was built with.
///
/// Used when the token is supplied through `KBTREE_TOKEN`.
#[derive(Debug, Clone)]
pub struct StaticSession {
    token: String,
}

impl StaticSession {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl SessionProvider for StaticSession {
    async fn access_token(&self) -> Result<Option<String>, SessionError> {
        if self.token.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(self.token.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_blank_token_is_signed_out() {
        assert_eq!(StaticSession::new("  ").access_token().await, Ok(None));
        assert_eq!(
            StaticSession::new("abc").access_token().await,
            Ok(Some("abc".to_string()))
        );
    }
}
