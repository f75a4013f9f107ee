use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::deserialize_id;

/// Name the server gives a folder created without user input.
pub const DEFAULT_FOLDER_NAME: &str = "Untitled Folder";

/// A named container of entries, as returned by `GET /knowledge-base/folders`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Folder {
    #[serde(deserialize_with = "deserialize_id")]
    pub folder_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub entry_count: u64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Folder {
    pub fn new(folder_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            folder_id: folder_id.into(),
            name: name.into(),
            description: None,
            entry_count: 0,
            created_at: None,
        }
    }

    pub fn with_entry_count(mut self, count: u64) -> Self {
        self.entry_count = count;
        self
    }
}
