//! Knowledge base state
//!
//! This module holds everything the manager publishes through its store:
//! - Server data: folder list, recent entries, per-folder entry cache
//! - The derived tree view model
//! - TransientState: in-flight flags, rename editing, delete confirmation
//! - AssignmentState: the agent's selected entry ids (assignment mode only)

pub mod expansion;
pub mod selection;
pub mod transient;

use std::collections::HashMap;

use crate::models::{Entry, Folder};
use crate::tree::{build_tree, find_folder, find_folder_mut, ExpandPolicy, TreeItem};

pub use expansion::{plan_toggle, FolderPhase, ToggleAction};
pub use selection::{AssignmentState, SelectionMark};
pub use transient::{DeleteTarget, EditingState, TransientState, UploadProgress};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KnowledgeBaseState {
    pub folders: Vec<Folder>,
    /// Bounded list of most recently created entries
    pub recent: Vec<Entry>,
    /// Loaded entries by folder id; a missing key means "never loaded"
    pub entry_cache: HashMap<String, Vec<Entry>>,
    pub tree: Vec<TreeItem>,
    pub transient: TransientState,
    pub assignment: Option<AssignmentState>,
    /// The folder list has been fetched at least once
    pub folders_loaded: bool,
    pub expand_policy: ExpandPolicy,
}

impl KnowledgeBaseState {
    pub fn new(expand_policy: ExpandPolicy) -> Self {
        Self {
            expand_policy,
            ..Default::default()
        }
    }

    /// Re-derive the tree from folders and cache, keeping expand flags.
    pub fn rebuild_tree(&mut self) {
        self.tree = build_tree(
            &self.folders,
            &self.entry_cache,
            &self.tree,
            self.expand_policy,
        );
    }

    pub fn folder(&self, folder_id: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.folder_id == folder_id)
    }

    /// Look an entry up in the cache, then in the recent list.
    pub fn find_entry(&self, entry_id: &str) -> Option<&Entry> {
        self.entry_cache
            .values()
            .flatten()
            .chain(self.recent.iter())
            .find(|e| e.entry_id == entry_id)
    }

    pub fn is_cached(&self, folder_id: &str) -> bool {
        self.entry_cache.contains_key(folder_id)
    }

    pub fn is_expanded(&self, folder_id: &str) -> bool {
        find_folder(&self.tree, folder_id)
            .map(|f| f.expanded)
            .unwrap_or(false)
    }

    /// Set a folder's expanded flag. Returns false if the folder is not in the tree.
    pub fn set_expanded(&mut self, folder_id: &str, expanded: bool) -> bool {
        match find_folder_mut(&mut self.tree, folder_id) {
            Some(node) => {
                node.expanded = expanded;
                true
            }
            None => false,
        }
    }

    pub fn folder_phase(&self, folder_id: &str) -> FolderPhase {
        expansion::phase(
            self.is_expanded(folder_id),
            self.is_cached(folder_id),
            self.transient.is_loading(folder_id),
        )
    }

    /// Ids of a folder's loaded entries.
    pub fn child_ids(&self, folder_id: &str) -> Vec<String> {
        self.entry_cache
            .get(folder_id)
            .map(|entries| entries.iter().map(|e| e.entry_id.clone()).collect())
            .unwrap_or_default()
    }

    /// Whether an entry may be opened. Moving entries may not.
    pub fn is_selectable(&self, entry_id: &str) -> bool {
        !self.transient.is_moving(entry_id)
    }

    /// Replace the folder list, dropping caches of folders that no longer exist.
    pub fn set_folders(&mut self, folders: Vec<Folder>) {
        self.entry_cache
            .retain(|id, _| folders.iter().any(|f| &f.folder_id == id));
        self.folders = folders;
        self.folders_loaded = true;
        self.rebuild_tree();
    }

    pub fn set_entries(&mut self, folder_id: &str, entries: Vec<Entry>) {
        self.entry_cache.insert(folder_id.to_string(), entries);
        self.rebuild_tree();
    }

    /// Forget a folder's entries so the next expand refetches them.
    pub fn invalidate(&mut self, folder_id: &str) {
        if self.entry_cache.remove(folder_id).is_some() {
            self.rebuild_tree();
        }
    }
}
