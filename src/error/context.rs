//! Error context for enriched error information.
//!
//! A context records which operation failed and on which folder or entry,
//! so log lines can be correlated with the notice the user saw.

use chrono::{DateTime, Utc};

/// Context information attached to errors for debugging.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorContext {
    /// Operation that failed, e.g. `move_entry`.
    pub operation: String,

    /// Folder the operation targeted, if any.
    pub folder_id: Option<String>,

    /// Entry the operation targeted, if any.
    pub entry_id: Option<String>,

    /// Timestamp when the error occurred.
    pub timestamp: DateTime<Utc>,

    /// Correlation ID tying together the log lines of one user action.
    pub correlation_id: Option<String>,
}

impl ErrorContext {
    /// Create a new ErrorContext for an operation.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            folder_id: None,
            entry_id: None,
            timestamp: Utc::now(),
            correlation_id: None,
        }
    }

    /// Set the folder ID for this context.
    pub fn with_folder(mut self, folder_id: impl Into<String>) -> Self {
        self.folder_id = Some(folder_id.into());
        self
    }

    /// Set the entry ID for this context.
    pub fn with_entry(mut self, entry_id: impl Into<String>) -> Self {
        self.entry_id = Some(entry_id.into());
        self
    }

    /// Set the correlation ID for this context.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Attach a freshly generated correlation ID.
    pub fn correlated(self) -> Self {
        self.with_correlation_id(uuid::Uuid::new_v4().to_string())
    }

    /// Get a formatted context string suitable for logging.
    pub fn to_log_string(&self) -> String {
        let mut parts = vec![format!("operation={}", self.operation)];

        if let Some(ref folder_id) = self.folder_id {
            parts.push(format!("folder_id={}", folder_id));
        }

        if let Some(ref entry_id) = self.entry_id {
            parts.push(format!("entry_id={}", entry_id));
        }

        if let Some(ref correlation_id) = self.correlation_id {
            parts.push(format!("correlation_id={}", correlation_id));
        }

        parts.push(format!("timestamp={}", self.timestamp.to_rfc3339()));

        parts.join(" ")
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new("unknown")
    }
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.operation)?;

        if let Some(ref folder_id) = self.folder_id {
            write!(f, " folder={}", folder_id)?;
        }

        if let Some(ref entry_id) = self.entry_id {
            write!(f, " entry={}", entry_id)?;
        }

        Ok(())
    }
}
