//! Local system errors, raised while reading dropped files from disk.

use std::fmt;
use std::path::PathBuf;

/// System error variants.
#[derive(Debug, Clone)]
pub enum SystemError {
    /// The file does not exist.
    FileNotFound { path: PathBuf },

    /// The file could not be read.
    ReadFailed { path: PathBuf, message: String },

    /// The path is a directory or has no usable file name.
    NotAFile { path: PathBuf },
}

impl SystemError {
    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            SystemError::FileNotFound { path } => format!("File not found: {}", path.display()),
            SystemError::ReadFailed { path, .. } => {
                format!("Could not read {}", path.display())
            }
            SystemError::NotAFile { path } => format!("{} is not a file", path.display()),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            SystemError::FileNotFound { .. } => "E_SYS_NOT_FOUND",
            SystemError::ReadFailed { .. } => "E_SYS_READ",
            SystemError::NotAFile { .. } => "E_SYS_NOT_FILE",
        }
    }
}

impl fmt::Display for SystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SystemError::FileNotFound { path } => write!(f, "File not found: {:?}", path),
            SystemError::ReadFailed { path, message } => {
                write!(f, "Failed to read {:?}: {}", path, message)
            }
            SystemError::NotAFile { path } => write!(f, "Not a file: {:?}", path),
        }
    }
}

impl std::error::Error for SystemError {}

/// Classify an IO error raised while reading `path`.
pub fn classify_io_error(err: std::io::Error, path: PathBuf) -> SystemError {
    match err.kind() {
        std::io::ErrorKind::NotFound => SystemError::FileNotFound { path },
        _ => SystemError::ReadFailed {
            path,
            message: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_not_found() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(
            classify_io_error(err, PathBuf::from("/x")),
            SystemError::FileNotFound { .. }
        ));
    }

    #[test]
    fn test_classify_other() {
        let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let sys = classify_io_error(err, PathBuf::from("/x"));
        assert_eq!(sys.error_code(), "E_SYS_READ");
    }
}
