//! Folder/entry tree view model.
//!
//! The tree is derived, never edited directly: it is rebuilt from the folder
//! list and the entry cache whenever either changes.

pub mod builder;
pub mod item;
pub mod render;

pub use builder::{build_tree, ExpandPolicy};
pub use item::{
    find_file, find_folder, find_folder_mut, find_node, FileNode, FolderNode, ItemKey, NodeRef,
    TreeItem,
};
pub use render::{render_lines, render_tree};
