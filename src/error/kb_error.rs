//! Unified error type for knowledge base operations.

use std::fmt;

use super::api::ApiError;
use super::auth::AuthError;
use super::category::ErrorCategory;
use super::context::ErrorContext;
use super::network::NetworkError;
use super::system::SystemError;
use super::validation::{ValidationError, DUPLICATE_FOLDER_MESSAGE};

/// Unified error type.
///
/// `KbError` consolidates the domain error types so every mutation handler
/// can categorize, log and surface a failure the same way.
#[derive(Debug)]
pub enum KbError {
    /// Rejected locally before any request.
    Validation(ValidationError),

    /// Missing or unusable session.
    Auth(AuthError),

    /// Non-2xx response.
    Api(ApiError),

    /// Transport failure or unreadable response.
    Network(NetworkError),

    /// Local filesystem failure.
    System(SystemError),

    /// Wrapped error with additional context.
    WithContext {
        error: Box<KbError>,
        context: ErrorContext,
    },
}

impl KbError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            KbError::Validation(err) => {
                if err.is_input_error() {
                    ErrorCategory::User
                } else {
                    ErrorCategory::Client
                }
            }
            KbError::Auth(_) => ErrorCategory::Auth,
            KbError::Api(err) if err.is_unauthorized() => ErrorCategory::Auth,
            KbError::Api(_) => ErrorCategory::Server,
            KbError::Network(_) => ErrorCategory::Network,
            KbError::System(_) => ErrorCategory::System,
            KbError::WithContext { error, .. } => error.category(),
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            KbError::Validation(err) => err.user_message(),
            KbError::Auth(err) => err.user_message(),
            KbError::Api(err) => err.user_message(),
            KbError::Network(err) => err.user_message(),
            KbError::System(err) => err.user_message(),
            KbError::WithContext { error, .. } => error.user_message(),
        }
    }

    /// Message for the error notice of a failed action such as "move file".
    ///
    /// Validation and auth failures speak for themselves and a 413 always
    /// gets the size-limit message. Other failures read "Failed to <action>",
    /// followed by the server's detail when there is one.
    pub fn notice_message(&self, action: &str) -> String {
        match self.inner() {
            KbError::Validation(err) => err.user_message(),
            KbError::Auth(err) => err.user_message(),
            KbError::Api(err @ ApiError::PayloadTooLarge { .. }) => err.user_message(),
            KbError::Api(err) => match err.detail() {
                Some(detail) => format!("Failed to {}: {}", action, detail),
                None => format!("Failed to {}", action),
            },
            KbError::System(err) => format!("Failed to {}: {}", action, err.user_message()),
            _ => format!("Failed to {}", action),
        }
    }

    /// Notice for a failed folder rename.
    ///
    /// A server-side name collision converges on the message of the local
    /// conflict check; anything else reads like [`notice_message`](Self::notice_message).
    pub fn rename_notice_message(&self) -> String {
        match self.api_error() {
            Some(err) if err.is_duplicate() => DUPLICATE_FOLDER_MESSAGE.to_string(),
            _ => self.notice_message("rename folder"),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            KbError::Validation(err) => err.error_code(),
            KbError::Auth(err) => err.error_code(),
            KbError::Api(err) => err.error_code(),
            KbError::Network(err) => err.error_code(),
            KbError::System(err) => err.error_code(),
            KbError::WithContext { error, .. } => error.error_code(),
        }
    }

    /// Attach context to this error.
    pub fn with_context(self, ctx: ErrorContext) -> Self {
        KbError::WithContext {
            error: Box::new(self),
            context: ctx,
        }
    }

    /// Get the context if this error has one attached.
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            KbError::WithContext { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Get the inner error without context.
    pub fn inner(&self) -> &KbError {
        match self {
            KbError::WithContext { error, .. } => error.inner(),
            _ => self,
        }
    }

    /// The API error, if this failure was a non-2xx response.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self.inner() {
            KbError::Api(err) => Some(err),
            _ => None,
        }
    }

    /// The validation error, if this failure was rejected locally.
    pub fn validation_error(&self) -> Option<&ValidationError> {
        match self.inner() {
            KbError::Validation(err) => Some(err),
            _ => None,
        }
    }

    /// True when the failure was a 413 size-limit response.
    pub fn is_payload_too_large(&self) -> bool {
        matches!(self.api_error(), Some(ApiError::PayloadTooLarge { .. }))
    }

    /// Get the recovery hint for this error.
    pub fn recovery_hint(&self) -> &'static str {
        self.category().recovery_hint()
    }
}

impl fmt::Display for KbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KbError::Validation(err) => write!(f, "{}", err),
            KbError::Auth(err) => write!(f, "{}", err),
            KbError::Api(err) => write!(f, "{}", err),
            KbError::Network(err) => write!(f, "{}", err),
            KbError::System(err) => write!(f, "{}", err),
            KbError::WithContext { error, context } => write!(f, "{} ({})", error, context),
        }
    }
}

impl std::error::Error for KbError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            KbError::Validation(err) => Some(err),
            KbError::Auth(err) => Some(err),
            KbError::Api(err) => Some(err),
            KbError::Network(err) => Some(err),
            KbError::System(err) => Some(err),
            KbError::WithContext { error, .. } => error.source(),
        }
    }
}

// ============================================================================
// From implementations for automatic error conversion
// ============================================================================

impl From<ValidationError> for KbError {
    fn from(err: ValidationError) -> Self {
        KbError::Validation(err)
    }
}

impl From<AuthError> for KbError {
    fn from(err: AuthError) -> Self {
        KbError::Auth(err)
    }
}

impl From<ApiError> for KbError {
    fn from(err: ApiError) -> Self {
        KbError::Api(err)
    }
}

impl From<NetworkError> for KbError {
    fn from(err: NetworkError) -> Self {
        KbError::Network(err)
    }
}

impl From<SystemError> for KbError {
    fn from(err: SystemError) -> Self {
        KbError::System(err)
    }
}

impl From<serde_json::Error> for KbError {
    fn from(err: serde_json::Error) -> Self {
        KbError::Network(NetworkError::InvalidResponse {
            message: err.to_string(),
        })
    }
}
