//! Client-side validation errors.
//!
//! These are raised before any request is sent.

use std::fmt;

/// Message shown for both the local and the server-side name collision.
pub const DUPLICATE_FOLDER_MESSAGE: &str = "A folder with this name already exists";

/// Validation error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Name is empty or whitespace.
    EmptyName,

    /// Name fails the file/folder name rules.
    InvalidName { reason: String },

    /// Another folder already uses this name.
    DuplicateFolderName,

    /// The entry has a move request in flight.
    EntryMoving { entry_id: String },

    /// The folder is not in the current folder list.
    UnknownFolder { folder_id: String },

    /// The entry is not in any loaded folder.
    UnknownEntry { entry_id: String },

    /// No folder is in rename mode.
    NotEditing,

    /// No delete is waiting for confirmation.
    NothingToConfirm,

    /// A batch upload into this folder is still running.
    UploadInProgress { folder_id: String },

    /// Assignment was requested without an agent.
    NoAgent,

    /// The operation is switched off for this manager.
    CapabilityDisabled { capability: &'static str },
}

impl ValidationError {
    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            ValidationError::EmptyName => "Name cannot be empty".to_string(),
            ValidationError::InvalidName { reason } => reason.clone(),
            ValidationError::DuplicateFolderName => DUPLICATE_FOLDER_MESSAGE.to_string(),
            ValidationError::EntryMoving { .. } => {
                "This file is being moved. Please wait.".to_string()
            }
            ValidationError::UnknownFolder { .. } => "That folder no longer exists".to_string(),
            ValidationError::UnknownEntry { .. } => "That file no longer exists".to_string(),
            ValidationError::NotEditing => "No folder is being renamed".to_string(),
            ValidationError::NothingToConfirm => "Nothing is waiting for confirmation".to_string(),
            ValidationError::UploadInProgress { .. } => {
                "Files are still uploading to this folder".to_string()
            }
            ValidationError::NoAgent => "Select an agent first".to_string(),
            ValidationError::CapabilityDisabled { capability } => {
                format!("{} is not available here", capability)
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::EmptyName => "E_VAL_EMPTY",
            ValidationError::InvalidName { .. } => "E_VAL_NAME",
            ValidationError::DuplicateFolderName => "E_VAL_DUPLICATE",
            ValidationError::EntryMoving { .. } => "E_VAL_MOVING",
            ValidationError::UnknownFolder { .. } => "E_VAL_FOLDER",
            ValidationError::UnknownEntry { .. } => "E_VAL_ENTRY",
            ValidationError::NotEditing => "E_VAL_NOT_EDITING",
            ValidationError::NothingToConfirm => "E_VAL_NO_PENDING",
            ValidationError::UploadInProgress { .. } => "E_VAL_UPLOADING",
            ValidationError::NoAgent => "E_VAL_NO_AGENT",
            ValidationError::CapabilityDisabled { .. } => "E_VAL_DISABLED",
        }
    }

    /// Errors that come from the user's input rather than stale local state.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ValidationError::EmptyName
                | ValidationError::InvalidName { .. }
                | ValidationError::DuplicateFolderName
        )
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_message() {
        assert_eq!(
            ValidationError::DuplicateFolderName.to_string(),
            DUPLICATE_FOLDER_MESSAGE
        );
    }

    #[test]
    fn test_input_errors() {
        assert!(ValidationError::EmptyName.is_input_error());
        assert!(!ValidationError::NotEditing.is_input_error());
    }
}
