//! Entry (file) model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::deserialize_id;

/// A single file record belonging to exactly one folder.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Entry {
    #[serde(deserialize_with = "deserialize_id")]
    pub entry_id: String,
    pub filename: String,
    /// Free-text summary, user- or system-generated
    #[serde(default)]
    pub summary: Option<String>,
    /// File size in bytes
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "deserialize_id")]
    pub folder_id: String,
}

impl Entry {
    pub fn new(
        entry_id: impl Into<String>,
        filename: impl Into<String>,
        folder_id: impl Into<String>,
    ) -> Self {
        Self {
            entry_id: entry_id.into(),
            filename: filename.into(),
            summary: None,
            file_size: None,
            created_at: None,
            folder_id: folder_id.into(),
        }
    }

    /// Format file size for display (e.g., "1.2 KB", "3.4 MB")
    pub fn format_size(&self) -> Option<String> {
        self.file_size.map(|bytes| {
            if bytes < 1024 {
                format!("{} B", bytes)
            } else if bytes < 1024 * 1024 {
                format!("{:.1} KB", bytes as f64 / 1024.0)
            } else if bytes < 1024 * 1024 * 1024 {
                format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
            } else {
                format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
            }
        })
    }

    /// Lowercased extension, used to pick a preview type.
    pub fn extension(&self) -> Option<String> {
        std::path::Path::new(&self.filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
    }
}
