//! Error category classification for unified error handling.
//!
//! Categories drive how a failure is surfaced: validation problems stay
//! inline, everything else becomes an error notice. None of them are fatal.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Connection failures, timeouts, unreadable responses.
    Network,

    /// Missing or unusable session token.
    Auth,

    /// Non-2xx responses from the knowledge base API.
    Server,

    /// Invalid local state (unknown folder, nothing pending).
    Client,

    /// Input the user must correct (invalid or conflicting names).
    User,

    /// Local filesystem errors (native file drops).
    System,

    /// Missing or invalid configuration.
    Configuration,
}

impl ErrorCategory {
    /// Returns true if the user can reasonably re-trigger the same action.
    ///
    /// Nothing is retried automatically; this only shapes the hint text.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Server => "server",
            ErrorCategory::Client => "client",
            ErrorCategory::User => "user",
            ErrorCategory::System => "system",
            ErrorCategory::Configuration => "configuration",
        }
    }

    /// Returns suggested recovery actions for this category.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check your connection and try again",
            ErrorCategory::Auth => "Sign in again and retry",
            ErrorCategory::Server => "Try again in a moment",
            ErrorCategory::Client => "Refresh the knowledge base and try again",
            ErrorCategory::User => "Please check your input and try again",
            ErrorCategory::System => "Check that the file exists and is readable",
            ErrorCategory::Configuration => "Check your KBTREE_* environment settings",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_retryable() {
        assert!(ErrorCategory::Network.is_retryable());
        assert!(ErrorCategory::Server.is_retryable());
        assert!(!ErrorCategory::Auth.is_retryable());
        assert!(!ErrorCategory::User.is_retryable());
        assert!(!ErrorCategory::System.is_retryable());
    }

    #[test]
    fn test_category_display() {
        assert_eq!(format!("{}", ErrorCategory::Network), "network");
        assert_eq!(format!("{}", ErrorCategory::Configuration), "configuration");
    }

    #[test]
    fn test_category_recovery_hint() {
        assert!(ErrorCategory::Network.recovery_hint().contains("connection"));
        assert!(ErrorCategory::Auth.recovery_hint().contains("Sign in"));
    }
}
