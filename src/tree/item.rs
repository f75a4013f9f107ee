//! Tree view model.
//!
//! Only one level of nesting exists: folders contain files and files contain
//! nothing. The types enforce this, since a [`FileNode`] has no children field.

use crate::models::{Entry, Folder};

/// A folder row with its (possibly not yet loaded) files.
#[derive(Debug, Clone, PartialEq)]
pub struct FolderNode {
    pub id: String,
    pub name: String,
    pub folder: Folder,
    /// Files from the entry cache; empty until the folder is first loaded
    pub children: Vec<FileNode>,
    /// Client-only view state, carried across rebuilds by folder id
    pub expanded: bool,
}

/// A file row.
#[derive(Debug, Clone, PartialEq)]
pub struct FileNode {
    pub id: String,
    pub name: String,
    pub parent_id: String,
    pub entry: Entry,
}

impl FileNode {
    pub fn from_entry(entry: &Entry) -> Self {
        Self {
            id: entry.entry_id.clone(),
            name: entry.filename.clone(),
            parent_id: entry.folder_id.clone(),
            entry: entry.clone(),
        }
    }
}

/// A node of the knowledge base tree.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeItem {
    Folder(FolderNode),
    File(FileNode),
}

impl TreeItem {
    pub fn id(&self) -> &str {
        match self {
            TreeItem::Folder(f) => &f.id,
            TreeItem::File(f) => &f.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            TreeItem::Folder(f) => &f.name,
            TreeItem::File(f) => &f.name,
        }
    }

    pub fn parent_id(&self) -> Option<&str> {
        match self {
            TreeItem::Folder(_) => None,
            TreeItem::File(f) => Some(&f.parent_id),
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, TreeItem::Folder(_))
    }

    pub fn is_expanded(&self) -> bool {
        match self {
            TreeItem::Folder(f) => f.expanded,
            TreeItem::File(_) => false,
        }
    }

    pub fn key(&self) -> ItemKey {
        match self {
            TreeItem::Folder(f) => ItemKey::Folder(f.id.clone()),
            TreeItem::File(f) => ItemKey::File(f.id.clone()),
        }
    }
}

/// Identifies a tree node. Folder and entry ids live in separate namespaces.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemKey {
    Folder(String),
    File(String),
}

/// Borrowed view of a node found in the tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeRef<'a> {
    Folder(&'a FolderNode),
    File(&'a FileNode),
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            NodeRef::Folder(f) => &f.id,
            NodeRef::File(f) => &f.id,
        }
    }
}

pub fn find_folder<'a>(tree: &'a [TreeItem], folder_id: &str) -> Option<&'a FolderNode> {
    tree.iter().find_map(|item| match item {
        TreeItem::Folder(f) if f.id == folder_id => Some(f),
        _ => None,
    })
}

pub fn find_folder_mut<'a>(
    tree: &'a mut [TreeItem],
    folder_id: &str,
) -> Option<&'a mut FolderNode> {
    tree.iter_mut().find_map(|item| match item {
        TreeItem::Folder(f) if f.id == folder_id => Some(f),
        _ => None,
    })
}

/// Find a file anywhere in the tree, including top-level file rows.
pub fn find_file<'a>(tree: &'a [TreeItem], entry_id: &str) -> Option<&'a FileNode> {
    tree.iter().find_map(|item| match item {
        TreeItem::Folder(f) => f.children.iter().find(|c| c.id == entry_id),
        TreeItem::File(f) if f.id == entry_id => Some(f),
        TreeItem::File(_) => None,
    })
}

pub fn find_node<'a>(tree: &'a [TreeItem], key: &ItemKey) -> Option<NodeRef<'a>> {
    match key {
        ItemKey::Folder(id) => find_folder(tree, id).map(NodeRef::Folder),
        ItemKey::File(id) => find_file(tree, id).map(NodeRef::File),
    }
}
