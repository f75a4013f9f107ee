//! Plain-text rendering of the tree.
//!
//! Rows carry every piece of per-item state a front end needs to show:
//! expansion, loading, moving, upload progress, the rename draft and the
//! assignment checkbox. Capability flags decide which of those appear.
//!
//! ```text
//! ▾ [-] Research (2)
//!     [x] paper.pdf  1.2 MB
//!     [ ] notes.txt  312 B  (moving)
//!   uploading y.pdf (1/2)
//! ▸ [ ] Archive (14)
//! ```

use super::item::{FileNode, FolderNode, TreeItem};
use crate::config::Capabilities;
use crate::state::{FolderPhase, KnowledgeBaseState, SelectionMark};

const EXPANDED: &str = "▾";
const COLLAPSED: &str = "▸";
const CHILD_INDENT: &str = "    ";

/// Render the tree to lines.
pub fn render_lines(state: &KnowledgeBaseState, caps: &Capabilities) -> Vec<String> {
    let mut lines = Vec::new();

    if !state.folders_loaded {
        lines.push("Loading folders...".to_string());
        return lines;
    }
    if state.tree.is_empty() {
        lines.push("No folders yet".to_string());
        return lines;
    }

    for item in &state.tree {
        match item {
            TreeItem::Folder(folder) => render_folder(state, caps, folder, &mut lines),
            TreeItem::File(file) => lines.push(file_row(state, caps, file, "")),
        }
    }
    lines
}

/// Render the tree to a single newline-joined string.
pub fn render_tree(state: &KnowledgeBaseState, caps: &Capabilities) -> String {
    render_lines(state, caps).join("\n")
}

fn render_folder(
    state: &KnowledgeBaseState,
    caps: &Capabilities,
    folder: &FolderNode,
    lines: &mut Vec<String>,
) {
    let arrow = if folder.expanded { EXPANDED } else { COLLAPSED };
    let mut row = format!("{} {}", arrow, checkbox_for_folder(state, caps, folder));

    match state.transient.editing.as_ref() {
        Some(edit) if caps.enable_edit && edit.folder_id == folder.id => {
            row.push_str(&format!("[{}_]", edit.draft_name));
            if let Some(err) = &edit.error {
                row.push_str(&format!("  ! {}", err));
            }
        }
        _ => {
            row.push_str(&format!("{} ({})", folder.name, folder.folder.entry_count));
        }
    }
    lines.push(row);

    match state.folder_phase(&folder.id) {
        FolderPhase::Collapsed => {}
        FolderPhase::Loading => lines.push(format!("{}Loading...", CHILD_INDENT)),
        FolderPhase::Loaded => {
            if folder.children.is_empty() && state.is_cached(&folder.id) {
                lines.push(format!("{}(empty)", CHILD_INDENT));
            }
            for child in &folder.children {
                lines.push(file_row(state, caps, child, CHILD_INDENT));
            }
        }
    }

    if let Some(progress) = state.transient.upload_progress(&folder.id) {
        lines.push(format!(
            "  uploading {} ({}/{})",
            progress.current_file,
            progress.completed + 1,
            progress.total
        ));
    }
}

fn file_row(
    state: &KnowledgeBaseState,
    caps: &Capabilities,
    file: &FileNode,
    indent: &str,
) -> String {
    let mut row = format!("{}{}{}", indent, checkbox_for_file(state, caps, file), file.name);
    if let Some(size) = file.entry.format_size() {
        row.push_str(&format!("  {}", size));
    }
    if state.transient.is_moving(&file.id) {
        row.push_str("  (moving)");
    }
    if state.transient.selected_entry.as_deref() == Some(file.id.as_str()) {
        row.push_str("  *");
    }
    row
}

fn checkbox_for_folder(
    state: &KnowledgeBaseState,
    caps: &Capabilities,
    folder: &FolderNode,
) -> &'static str {
    match state.assignment.as_ref() {
        Some(assignment) if caps.enable_assignment => {
            match assignment.mark(folder.children.iter().map(|c| c.id.as_str())) {
                SelectionMark::All => "[x] ",
                SelectionMark::Partial => "[-] ",
                SelectionMark::None => "[ ] ",
            }
        }
        _ => "",
    }
}

fn checkbox_for_file(
    state: &KnowledgeBaseState,
    caps: &Capabilities,
    file: &FileNode,
) -> &'static str {
    match state.assignment.as_ref() {
        Some(assignment) if caps.enable_assignment => {
            if assignment.is_selected(&file.id) {
                "[x] "
            } else {
                "[ ] "
            }
        }
        _ => "",
    }
}
