//! Transient UI state: in-flight flags and editing/confirmation state.
//!
//! None of this is persisted. Every mutation handler that sets a flag here
//! clears it again whether the request succeeded or not.

use std::collections::{HashMap, HashSet};

/// Progress of a running batch upload into one folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadProgress {
    /// File currently being sent
    pub current_file: String,
    /// Files already finished (successfully or not)
    pub completed: usize,
    pub total: usize,
}

/// Inline rename of a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditingState {
    pub folder_id: String,
    pub draft_name: String,
    /// Validation or server message shown under the input
    pub error: Option<String>,
}

/// A destructive action waiting for explicit confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Folder {
        folder_id: String,
        name: String,
    },
    Entry {
        entry_id: String,
        folder_id: String,
        filename: String,
    },
}

impl DeleteTarget {
    /// Text of the confirmation prompt.
    pub fn prompt(&self) -> String {
        match self {
            DeleteTarget::Folder { name, .. } => format!(
                "Delete folder \"{}\" and all files in it? This cannot be undone.",
                name
            ),
            DeleteTarget::Entry { filename, .. } => {
                format!("Delete \"{}\"? This cannot be undone.", filename)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransientState {
    /// Folders shown as loading
    pub loading_folders: HashSet<String>,
    /// Folders with an entry fetch in flight. Unlike `loading_folders` this
    /// survives a collapse, so re-expanding never issues a second fetch.
    pub pending_fetches: HashSet<String>,
    /// Entries with a move request in flight
    pub moving_entries: HashSet<String>,
    /// Batch uploads in progress, by folder
    pub uploads: HashMap<String, UploadProgress>,
    pub editing: Option<EditingState>,
    pub pending_delete: Option<DeleteTarget>,
    /// Entry opened for preview
    pub selected_entry: Option<String>,
    /// A folder list fetch is in flight
    pub refreshing: bool,
    /// The assignment set is being saved
    pub saving_assignment: bool,
}

impl TransientState {
    pub fn is_loading(&self, folder_id: &str) -> bool {
        self.loading_folders.contains(folder_id)
    }

    pub fn is_fetching(&self, folder_id: &str) -> bool {
        self.pending_fetches.contains(folder_id)
    }

    pub fn is_moving(&self, entry_id: &str) -> bool {
        self.moving_entries.contains(entry_id)
    }

    pub fn is_editing(&self, folder_id: &str) -> bool {
        self.editing
            .as_ref()
            .map(|e| e.folder_id == folder_id)
            .unwrap_or(false)
    }

    pub fn upload_progress(&self, folder_id: &str) -> Option<&UploadProgress> {
        self.uploads.get(folder_id)
    }
}
