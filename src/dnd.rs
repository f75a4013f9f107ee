//! Drag-and-drop rules
//!
//! Files are the only drag sources and folders the only drop targets:
//! - file onto another folder: move the file
//! - file onto its own folder: nothing happens
//! - folder onto folder, file onto file: recognised and discarded, there is
//!   no reordering
//!
//! Files dragged in from the operating system are a separate path: they are
//! uploaded into the folder they were dropped on.
//!
//! # Usage
//!
//! ```ignore
//! let mut drag = DragState::new();
//!
//! // Pointer down on a file row
//! drag.start(ItemKey::File("e1".into()), &state);
//!
//! // Pointer moves over a folder row; highlight it if accepted
//! let accepts = drag.hover(Some(ItemKey::Folder("F2".into())), &state);
//!
//! // Pointer up
//! if let Some(decision) = drag.finish(&ItemKey::Folder("F2".into()), &state) {
//!     manager.apply_drop(decision).await?;
//! }
//! ```

use std::path::PathBuf;

use crate::error::KbResult;
use crate::manager::{BatchUploadReport, Capability, KnowledgeBaseManager};
use crate::state::KnowledgeBaseState;
use crate::tree::{find_file, find_folder, ItemKey};

/// Why a drop was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Folder dropped onto a folder
    FolderReorder,
    /// File dropped onto a file
    FileReorder,
    /// Source or target is not in the tree
    Unknown,
    /// The file is already being moved
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropDecision {
    Move {
        entry_id: String,
        from_folder: String,
        to_folder: String,
    },
    /// File dropped onto its current folder
    SameFolder,
    Rejected(RejectReason),
}

impl DropDecision {
    pub fn is_move(&self) -> bool {
        matches!(self, DropDecision::Move { .. })
    }
}

/// Only files can be dragged, and not while they are moving.
pub fn can_drag(key: &ItemKey, state: &KnowledgeBaseState) -> bool {
    match key {
        ItemKey::File(id) => find_file(&state.tree, id).is_some() && !state.transient.is_moving(id),
        ItemKey::Folder(_) => false,
    }
}

/// Decide what dropping `source` onto `target` does.
pub fn decide_drop(source: &ItemKey, target: &ItemKey, state: &KnowledgeBaseState) -> DropDecision {
    match (source, target) {
        (ItemKey::Folder(_), ItemKey::Folder(_)) => DropDecision::Rejected(RejectReason::FolderReorder),
        (ItemKey::File(_), ItemKey::File(_)) => DropDecision::Rejected(RejectReason::FileReorder),
        (ItemKey::Folder(_), ItemKey::File(_)) => DropDecision::Rejected(RejectReason::Unknown),
        (ItemKey::File(entry_id), ItemKey::Folder(folder_id)) => {
            let (file, folder) = match (
                find_file(&state.tree, entry_id),
                find_folder(&state.tree, folder_id),
            ) {
                (Some(file), Some(folder)) => (file, folder),
                _ => return DropDecision::Rejected(RejectReason::Unknown),
            };
            if state.transient.is_moving(entry_id) {
                DropDecision::Rejected(RejectReason::Busy)
            } else if file.parent_id == folder.id {
                DropDecision::SameFolder
            } else {
                DropDecision::Move {
                    entry_id: file.id.clone(),
                    from_folder: file.parent_id.clone(),
                    to_folder: folder.id.clone(),
                }
            }
        }
    }
}

/// An in-progress drag gesture.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragState {
    source: Option<ItemKey>,
    /// Folder currently hovered that would accept the drop
    over: Option<ItemKey>,
}

impl DragState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin dragging. Returns false (and stays idle) for non-draggable items.
    pub fn start(&mut self, key: ItemKey, state: &KnowledgeBaseState) -> bool {
        if !can_drag(&key, state) {
            self.clear();
            return false;
        }
        self.source = Some(key);
        self.over = None;
        true
    }

    pub fn is_active(&self) -> bool {
        self.source.is_some()
    }

    pub fn source(&self) -> Option<&ItemKey> {
        self.source.as_ref()
    }

    /// Folder to highlight, if any.
    pub fn over(&self) -> Option<&ItemKey> {
        self.over.as_ref()
    }

    /// Update the hovered item. Returns whether dropping there would move the file.
    pub fn hover(&mut self, target: Option<ItemKey>, state: &KnowledgeBaseState) -> bool {
        let accepts = match (&self.source, &target) {
            (Some(source), Some(target)) => decide_drop(source, target, state).is_move(),
            _ => false,
        };
        self.over = if accepts { target } else { None };
        accepts
    }

    /// End the gesture on `target`. `None` when no drag was active.
    pub fn finish(&mut self, target: &ItemKey, state: &KnowledgeBaseState) -> Option<DropDecision> {
        let source = self.source.take()?;
        self.over = None;
        Some(decide_drop(&source, target, state))
    }

    pub fn clear(&mut self) {
        self.source = None;
        self.over = None;
    }
}

impl KnowledgeBaseManager {
    /// Carry out a drop decision. Only moves send a request.
    pub async fn apply_drop(&self, decision: DropDecision) -> KbResult<DropDecision> {
        self.require(Capability::Dnd)?;
        match &decision {
            DropDecision::Move {
                entry_id, to_folder, ..
            } => {
                self.move_entry(entry_id, to_folder).await?;
            }
            DropDecision::SameFolder => tracing::debug!("Drop onto own folder ignored"),
            DropDecision::Rejected(reason) => tracing::debug!("Drop discarded: {:?}", reason),
        }
        Ok(decision)
    }

    /// Drop `source` onto `target` in one step.
    pub async fn drop_item(&self, source: &ItemKey, target: &ItemKey) -> KbResult<DropDecision> {
        self.require(Capability::Dnd)?;
        let decision = self.read(|s| decide_drop(source, target, s));
        self.apply_drop(decision).await
    }

    /// Files dropped from the operating system onto a folder.
    pub async fn native_drop(
        &self,
        folder_id: &str,
        paths: Vec<PathBuf>,
    ) -> KbResult<BatchUploadReport> {
        self.require(Capability::Dnd)?;
        self.upload_paths(folder_id, paths).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Entry, Folder};

    fn state() -> KnowledgeBaseState {
        let mut state = KnowledgeBaseState::default();
        state.set_folders(vec![Folder::new("F1", "One"), Folder::new("F2", "Two")]);
        state.set_entries(
            "F1",
            vec![Entry::new("e1", "a.txt", "F1"), Entry::new("e2", "b.txt", "F1")],
        );
        state
    }

    fn file(id: &str) -> ItemKey {
        ItemKey::File(id.to_string())
    }

    fn folder(id: &str) -> ItemKey {
        ItemKey::Folder(id.to_string())
    }

    #[test]
    fn test_drop_rules() {
        let s = state();
        assert_eq!(
            decide_drop(&file("e1"), &folder("F2"), &s),
            DropDecision::Move {
                entry_id: "e1".to_string(),
                from_folder: "F1".to_string(),
                to_folder: "F2".to_string(),
            }
        );
        assert_eq!(decide_drop(&file("e1"), &folder("F1"), &s), DropDecision::SameFolder);
        assert_eq!(
            decide_drop(&folder("F1"), &folder("F2"), &s),
            DropDecision::Rejected(RejectReason::FolderReorder)
        );
        assert_eq!(
            decide_drop(&file("e1"), &file("e2"), &s),
            DropDecision::Rejected(RejectReason::FileReorder)
        );
        assert_eq!(
            decide_drop(&file("e1"), &folder("F9"), &s),
            DropDecision::Rejected(RejectReason::Unknown)
        );
    }

    #[test]
    fn test_folders_are_not_draggable() {
        let s = state();
        let mut drag = DragState::new();
        assert!(!drag.start(folder("F1"), &s));
        assert!(!drag.is_active());
        assert!(drag.finish(&folder("F2"), &s).is_none());
    }

    #[test]
    fn test_moving_file_is_not_draggable() {
        let mut s = state();
        s.transient.moving_entries.insert("e1".to_string());
        assert!(!can_drag(&file("e1"), &s));
        assert_eq!(
            decide_drop(&file("e1"), &folder("F2"), &s),
            DropDecision::Rejected(RejectReason::Busy)
        );
    }

    #[test]
    fn test_hover_highlights_only_accepting_folders() {
        let s = state();
        let mut drag = DragState::new();
        assert!(drag.start(file("e1"), &s));

        assert!(!drag.hover(Some(folder("F1")), &s));
        assert!(drag.over().is_none());
        assert!(drag.hover(Some(folder("F2")), &s));
        assert_eq!(drag.over(), Some(&folder("F2")));
        assert!(!drag.hover(Some(file("e2")), &s));

        let decision = drag.finish(&folder("F2"), &s).unwrap();
        assert!(decision.is_move());
        assert!(!drag.is_active());
    }
}
