//! Errors for non-2xx responses from the knowledge base API.

use std::fmt;

/// Aggregate size ceiling enforced by the upload endpoint, in megabytes.
pub const KNOWLEDGE_BASE_LIMIT_MB: u64 = 50;

/// A non-2xx API response.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// 413: the knowledge base would exceed its total size ceiling.
    PayloadTooLarge { detail: Option<String> },

    /// 409: a sibling with the same name already exists.
    Conflict { detail: Option<String> },

    /// 404: the folder or entry no longer exists.
    NotFound { detail: Option<String> },

    /// Any other non-2xx status.
    Status { status: u16, detail: Option<String> },
}

impl ApiError {
    /// Classify a status code and optional server `detail` text.
    pub fn from_status(status: u16, detail: Option<String>) -> Self {
        match status {
            413 => ApiError::PayloadTooLarge { detail },
            409 => ApiError::Conflict { detail },
            404 => ApiError::NotFound { detail },
            _ => ApiError::Status { status, detail },
        }
    }

    /// The HTTP status this error was built from.
    pub fn status(&self) -> u16 {
        match self {
            ApiError::PayloadTooLarge { .. } => 413,
            ApiError::Conflict { .. } => 409,
            ApiError::NotFound { .. } => 404,
            ApiError::Status { status, .. } => *status,
        }
    }

    /// Server-provided detail text, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::PayloadTooLarge { detail }
            | ApiError::Conflict { detail }
            | ApiError::NotFound { detail }
            | ApiError::Status { detail, .. } => detail.as_deref(),
        }
    }

    /// True when the server reported a name collision.
    ///
    /// Some endpoints answer 400 with an "already exists" detail instead of 409.
    pub fn is_duplicate(&self) -> bool {
        match self {
            ApiError::Conflict { .. } => true,
            _ => self
                .detail()
                .map(|d| d.to_lowercase().contains("already exists"))
                .unwrap_or(false),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status: 401, .. })
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::PayloadTooLarge { .. } => format!(
                "Upload exceeds the {}MB knowledge base limit. Delete some files and try again.",
                KNOWLEDGE_BASE_LIMIT_MB
            ),
            _ => match self.detail() {
                Some(detail) => detail.to_string(),
                None => format!("The server returned an error (HTTP {}).", self.status()),
            },
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::PayloadTooLarge { .. } => "E_API_TOO_LARGE",
            ApiError::Conflict { .. } => "E_API_CONFLICT",
            ApiError::NotFound { .. } => "E_API_NOT_FOUND",
            ApiError::Status { .. } => "E_API_STATUS",
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.detail() {
            Some(detail) => write!(f, "HTTP {}: {}", self.status(), detail),
            None => write!(f, "HTTP {}", self.status()),
        }
    }
}

impl std::error::Error for ApiError {}
