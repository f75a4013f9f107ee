//! File and folder name validation.
//!
//! Runs before any rename, create or upload request is sent, so an invalid
//! name never reaches the server.

use crate::error::ValidationError;
use crate::models::Folder;

/// Longest name the backend stores, in bytes.
pub const MAX_NAME_BYTES: usize = 255;

/// Characters rejected in file and folder names.
const FORBIDDEN_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Names reserved by Windows, rejected so downloads work everywhere.
const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Validate a file or folder name and return it trimmed.
pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }

    if trimmed.len() > MAX_NAME_BYTES {
        return Err(ValidationError::InvalidName {
            reason: format!("Name must be at most {} characters", MAX_NAME_BYTES),
        });
    }

    if trimmed == "." || trimmed == ".." {
        return Err(ValidationError::InvalidName {
            reason: "Name cannot be '.' or '..'".to_string(),
        });
    }

    if let Some(c) = trimmed.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        return Err(ValidationError::InvalidName {
            reason: format!("Name cannot contain '{}'", c),
        });
    }

    if trimmed.chars().any(char::is_control) {
        return Err(ValidationError::InvalidName {
            reason: "Name cannot contain control characters".to_string(),
        });
    }

    if trimmed.ends_with('.') {
        return Err(ValidationError::InvalidName {
            reason: "Name cannot end with a period".to_string(),
        });
    }

    let stem = trimmed.split('.').next().unwrap_or(trimmed);
    if RESERVED_NAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(stem))
    {
        return Err(ValidationError::InvalidName {
            reason: format!("'{}' is a reserved name", stem),
        });
    }

    Ok(trimmed.to_string())
}

/// Check a candidate folder name against its siblings.
///
/// `folder_id` is excluded so renaming a folder to its own name (in any
/// case) is not a conflict. Comparison ignores case, which also rejects
/// exact matches.
pub fn check_folder_conflict(
    candidate: &str,
    folder_id: Option<&str>,
    folders: &[Folder],
) -> Result<(), ValidationError> {
    let candidate = candidate.trim().to_lowercase();
    let conflict = folders
        .iter()
        .filter(|f| Some(f.folder_id.as_str()) != folder_id)
        .any(|f| f.name.trim().to_lowercase() == candidate);

    if conflict {
        Err(ValidationError::DuplicateFolderName)
    } else {
        Ok(())
    }
}

/// Full validation of a folder rename: name rules, then sibling conflicts.
pub fn validate_folder_name(
    candidate: &str,
    folder_id: Option<&str>,
    folders: &[Folder],
) -> Result<String, ValidationError> {
    let name = validate_name(candidate)?;
    check_folder_conflict(&name, folder_id, folders)?;
    Ok(name)
}
