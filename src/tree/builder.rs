//! Derives the tree view model from the flat folder list and the entry cache.

use std::collections::HashMap;

use super::item::{FileNode, FolderNode, TreeItem};
use crate::models::{Entry, Folder};

/// How the `expanded` flag of each folder is chosen on rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpandPolicy {
    /// Carry the flag forward from the previous tree; new folders start collapsed.
    #[default]
    Preserve,
    /// Every folder expanded, for bulk assignment.
    AllExpanded,
}

/// Build a fresh tree, one item per folder in folder-list order.
///
/// Pure: the previous tree is only consulted for `expanded` flags. Folders
/// no longer in `folders` simply do not appear.
pub fn build_tree(
    folders: &[Folder],
    entry_cache: &HashMap<String, Vec<Entry>>,
    previous: &[TreeItem],
    policy: ExpandPolicy,
) -> Vec<TreeItem> {
    let was_expanded: HashMap<&str, bool> = previous
        .iter()
        .filter_map(|item| match item {
            TreeItem::Folder(f) => Some((f.id.as_str(), f.expanded)),
            TreeItem::File(_) => None,
        })
        .collect();

    folders
        .iter()
        .map(|folder| {
            let children = entry_cache
                .get(&folder.folder_id)
                .map(|entries| entries.iter().map(FileNode::from_entry).collect())
                .unwrap_or_default();

            let expanded = match policy {
                ExpandPolicy::AllExpanded => true,
                ExpandPolicy::Preserve => was_expanded
                    .get(folder.folder_id.as_str())
                    .copied()
                    .unwrap_or(false),
            };

            TreeItem::Folder(FolderNode {
                id: folder.folder_id.clone(),
                name: folder.name.clone(),
                folder: folder.clone(),
                children,
                expanded,
            })
        })
        .collect()
}
