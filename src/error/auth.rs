//! Authentication error types.

use std::fmt;

use crate::traits::SessionError;

/// Authentication-specific error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthError {
    /// No session token is available.
    NotAuthenticated,

    /// The session store could not be consulted.
    SessionUnavailable { message: String },

    /// The session expired.
    SessionExpired,

    /// The server rejected the token (HTTP 401).
    TokenRejected,
}

impl AuthError {
    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::NotAuthenticated => "You are not signed in.".to_string(),
            AuthError::SessionUnavailable { .. } => {
                "Your session could not be loaded.".to_string()
            }
            AuthError::SessionExpired | AuthError::TokenRejected => {
                "Your session has expired. Please sign in again.".to_string()
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::NotAuthenticated => "E_AUTH_NONE",
            AuthError::SessionUnavailable { .. } => "E_AUTH_SESSION",
            AuthError::SessionExpired => "E_AUTH_EXPIRED",
            AuthError::TokenRejected => "E_AUTH_REJECTED",
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::NotAuthenticated => write!(f, "No session token"),
            AuthError::SessionUnavailable { message } => {
                write!(f, "Session unavailable: {}", message)
            }
            AuthError::SessionExpired => write!(f, "Session expired"),
            AuthError::TokenRejected => write!(f, "Token rejected by server"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<SessionError> for AuthError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Expired => AuthError::SessionExpired,
            other => AuthError::SessionUnavailable {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_session_error() {
        assert_eq!(
            AuthError::from(SessionError::Expired),
            AuthError::SessionExpired
        );
        assert!(matches!(
            AuthError::from(SessionError::ReadFailed("x".to_string())),
            AuthError::SessionUnavailable { .. }
        ));
    }

    #[test]
    fn test_user_message() {
        assert!(AuthError::NotAuthenticated.user_message().contains("signed in"));
        assert!(AuthError::TokenRejected.user_message().contains("sign in again"));
    }
}
