//! Folder and entry mutations: create, rename, delete, move, summary edit.

use bytes::Bytes;

use super::{Capability, KnowledgeBaseManager};
use crate::error::{ErrorContext, KbError, KbResult, ValidationError};
use crate::models::{Entry, Folder, DEFAULT_FOLDER_NAME};
use crate::state::{DeleteTarget, EditingState};
use crate::tree::ItemKey;
use crate::validation::{validate_folder_name, validate_name};

impl KnowledgeBaseManager {
    /// Create a folder with the default name and start renaming it.
    pub async fn create_folder(&self) -> KbResult<Folder> {
        self.require(Capability::Edit)?;
        let ctx = ErrorContext::new("create_folder");

        let folder = match self.api.create_folder(DEFAULT_FOLDER_NAME).await {
            Ok(folder) => folder,
            Err(e) => return Err(self.report("create folder", e, ctx)),
        };
        tracing::info!("Created folder {}", folder.folder_id);
        self.notifier.success("Folder created");

        // Already reported; the created folder is added locally below.
        let _ = self.refetch_folders().await;

        self.update(|s| {
            if s.folder(&folder.folder_id).is_none() {
                let mut folders = s.folders.clone();
                folders.push(folder.clone());
                s.set_folders(folders);
            }
            s.transient.editing = Some(EditingState {
                folder_id: folder.folder_id.clone(),
                draft_name: folder.name.clone(),
                error: None,
            });
        });
        Ok(folder)
    }

    /// Enter rename mode for a folder. Replaces any other rename in progress.
    pub fn start_rename(&self, folder_id: &str) -> KbResult<()> {
        self.require(Capability::Edit)?;
        let folder = self.require_folder(folder_id)?;

        self.update(|s| {
            s.transient.editing = Some(EditingState {
                folder_id: folder.folder_id,
                draft_name: folder.name,
                error: None,
            });
        });
        Ok(())
    }

    /// Replace the rename draft. Clears the previous error.
    pub fn set_rename_draft(&self, draft: impl Into<String>) -> KbResult<()> {
        let draft = draft.into();
        self.update(|s| match s.transient.editing.as_mut() {
            Some(edit) => {
                edit.draft_name = draft;
                edit.error = None;
                Ok(())
            }
            None => Err(ValidationError::NotEditing.into()),
        })
    }

    pub fn cancel_rename(&self) {
        self.update(|s| s.transient.editing = None);
    }

    /// Commit the rename draft.
    ///
    /// An unchanged name leaves edit mode without a request. Invalid or
    /// conflicting names stay in edit mode with the message in
    /// `editing.error`. A server-side duplicate converges on the same
    /// message as the local conflict check.
    pub async fn commit_rename(&self) -> KbResult<()> {
        self.require(Capability::Edit)?;
        let edit = self
            .read(|s| s.transient.editing.clone())
            .ok_or(ValidationError::NotEditing)?;
        let folder = match self.require_folder(&edit.folder_id) {
            Ok(folder) => folder,
            Err(e) => {
                self.cancel_rename();
                return Err(e);
            }
        };
        let ctx = ErrorContext::new("rename_folder").with_folder(&edit.folder_id);

        if edit.draft_name.trim() == folder.name {
            tracing::debug!("Rename of {} unchanged, leaving edit mode", folder.folder_id);
            self.cancel_rename();
            return Ok(());
        }

        let folders = self.read(|s| s.folders.clone());
        let name = match validate_folder_name(&edit.draft_name, Some(&edit.folder_id), &folders) {
            Ok(name) => name,
            Err(e) => {
                self.set_rename_error(&edit.folder_id, e.user_message());
                return Err(KbError::from(e).with_context(ctx));
            }
        };

        match self.api.rename_folder(&edit.folder_id, &name).await {
            Ok(()) => {
                tracing::info!("Renamed folder {} to {:?}", edit.folder_id, name);
                self.cancel_rename();
                self.notifier.success("Folder renamed");
                let _ = self.refetch_folders().await;
                Ok(())
            }
            Err(e) => {
                let err = self.report_with("rename folder", e, ctx, KbError::rename_notice_message);
                self.set_rename_error(&edit.folder_id, err.rename_notice_message());
                Err(err)
            }
        }
    }

    fn set_rename_error(&self, folder_id: &str, message: String) {
        self.update(|s| {
            if let Some(edit) = s.transient.editing.as_mut() {
                if edit.folder_id == folder_id {
                    edit.error = Some(message);
                }
            }
        });
    }

    /// Ask for confirmation before deleting a folder or an entry.
    pub fn request_delete(&self, key: &ItemKey) -> KbResult<DeleteTarget> {
        self.require(Capability::Delete)?;

        let target = match key {
            ItemKey::Folder(id) => {
                let folder = self.require_folder(id)?;
                DeleteTarget::Folder {
                    folder_id: folder.folder_id,
                    name: folder.name,
                }
            }
            ItemKey::File(id) => {
                let entry = self.require_entry(id)?;
                DeleteTarget::Entry {
                    entry_id: entry.entry_id,
                    folder_id: entry.folder_id,
                    filename: entry.filename,
                }
            }
        };
        self.update(|s| s.transient.pending_delete = Some(target.clone()));
        Ok(target)
    }

    pub fn cancel_delete(&self) {
        self.update(|s| s.transient.pending_delete = None);
    }

    /// Send the confirmed delete.
    ///
    /// The confirmation is consumed whatever the outcome. A deleted folder is
    /// removed locally before the folder list is refetched; deleting an entry
    /// refetches its parent folder and the folder counts.
    pub async fn confirm_delete(&self) -> KbResult<()> {
        self.require(Capability::Delete)?;
        let target = self
            .update(|s| s.transient.pending_delete.take())
            .ok_or(ValidationError::NothingToConfirm)?;

        match target {
            DeleteTarget::Folder { folder_id, name } => {
                let ctx = ErrorContext::new("delete_folder").with_folder(&folder_id);
                if let Err(e) = self.api.delete_folder(&folder_id).await {
                    return Err(self.report("delete folder", e, ctx));
                }
                tracing::info!("Deleted folder {} ({:?})", folder_id, name);
                self.update(|s| {
                    s.transient.loading_folders.remove(&folder_id);
                    if s.transient.is_editing(&folder_id) {
                        s.transient.editing = None;
                    }
                    if let Some(selected) = s.transient.selected_entry.clone() {
                        if s.find_entry(&selected).map(|e| e.folder_id == folder_id) == Some(true) {
                            s.transient.selected_entry = None;
                        }
                    }
                    // Gone on the server: drop it now so a failed refetch
                    // cannot leave it in the tree.
                    let remaining = s
                        .folders
                        .iter()
                        .filter(|f| f.folder_id != folder_id)
                        .cloned()
                        .collect();
                    s.set_folders(remaining);
                });
                self.notifier.success(format!("Deleted folder \"{}\"", name));
                let _ = self.refetch_folders().await;
            }
            DeleteTarget::Entry {
                entry_id,
                folder_id,
                filename,
            } => {
                let ctx = ErrorContext::new("delete_entry")
                    .with_entry(&entry_id)
                    .with_folder(&folder_id);
                if let Err(e) = self.api.delete_entry(&entry_id).await {
                    return Err(self.report("delete file", e, ctx));
                }
                tracing::info!("Deleted entry {} from folder {}", entry_id, folder_id);
                self.update(|s| {
                    if s.transient.selected_entry.as_deref() == Some(entry_id.as_str()) {
                        s.transient.selected_entry = None;
                    }
                    s.recent.retain(|e| e.entry_id != entry_id);
                });
                self.notifier.success(format!("Deleted \"{}\"", filename));
                let _ = self.load_folder_entries(&folder_id).await;
                let _ = self.refetch_folders().await;
            }
        }
        Ok(())
    }

    /// Move an entry to another folder.
    ///
    /// Only one move per entry may be in flight; a second request for the
    /// same entry is rejected. The entry cannot be opened while it moves.
    /// Moving onto the current folder does nothing.
    pub async fn move_entry(&self, entry_id: &str, target_folder_id: &str) -> KbResult<()> {
        self.require(Capability::Edit)?;
        let ctx = ErrorContext::new("move_entry")
            .with_entry(entry_id)
            .with_folder(target_folder_id);

        let entry = self.require_entry(entry_id)?;
        let target = self.require_folder(target_folder_id)?;
        if entry.folder_id == target.folder_id {
            tracing::debug!("Entry {} already in folder {}", entry_id, target_folder_id);
            return Ok(());
        }

        let claimed = self.update(|s| {
            let claimed = s.transient.moving_entries.insert(entry_id.to_string());
            if claimed && s.transient.selected_entry.as_deref() == Some(entry_id) {
                s.transient.selected_entry = None;
            }
            claimed
        });
        if !claimed {
            let err = ValidationError::EntryMoving {
                entry_id: entry_id.to_string(),
            };
            return Err(self.report("move file", err.into(), ctx));
        }

        tracing::debug!(
            "Moving entry {} from {} to {}",
            entry_id,
            entry.folder_id,
            target.folder_id
        );
        let result = self.api.move_entry(entry_id, &target.folder_id).await;
        self.update(|s| s.transient.moving_entries.remove(entry_id));

        if let Err(e) = result {
            return Err(self.report("move file", e, ctx));
        }

        self.notifier
            .success(format!("Moved \"{}\" to {}", entry.filename, target.name));
        let _ = self.load_folder_entries(&entry.folder_id).await;
        let _ = self.load_folder_entries(&target.folder_id).await;
        let _ = self.refetch_folders().await;
        Ok(())
    }

    /// Replace an entry's summary. Refreshes only the entry's folder.
    pub async fn edit_summary(&self, entry_id: &str, summary: &str) -> KbResult<()> {
        self.require(Capability::Edit)?;
        let entry = self.require_entry(entry_id)?;
        let ctx = ErrorContext::new("edit_summary")
            .with_entry(entry_id)
            .with_folder(&entry.folder_id);

        if let Err(e) = self.api.update_summary(entry_id, summary.trim()).await {
            return Err(self.report("update summary", e, ctx));
        }
        self.notifier.success("Summary updated");
        let _ = self.load_folder_entries(&entry.folder_id).await;
        Ok(())
    }

    /// Create an entry from text instead of an uploaded file.
    pub async fn create_text_entry(
        &self,
        folder_id: &str,
        filename: &str,
        content: &str,
    ) -> KbResult<Entry> {
        self.require(Capability::Upload)?;
        let ctx = ErrorContext::new("create_text_entry").with_folder(folder_id);
        self.require_folder(folder_id)?;

        let filename = match validate_name(filename) {
            Ok(name) => name,
            Err(e) => return Err(self.report("create file", e.into(), ctx)),
        };

        match self.api.create_text_entry(folder_id, &filename, content).await {
            Ok(entry) => {
                self.notifier.success(format!("Created \"{}\"", entry.filename));
                let _ = self.load_folder_entries(folder_id).await;
                let _ = self.refetch_folders().await;
                Ok(entry)
            }
            Err(e) => Err(self.report("create file", e, ctx)),
        }
    }

    /// Select an entry for preview. Moving entries cannot be selected.
    pub fn open_entry(&self, entry_id: &str) -> KbResult<Entry> {
        let entry = self.require_entry(entry_id)?;
        self.update(|s| {
            if s.is_selectable(entry_id) {
                s.transient.selected_entry = Some(entry_id.to_string());
                Ok(())
            } else {
                Err(ValidationError::EntryMoving {
                    entry_id: entry_id.to_string(),
                })
            }
        })?;
        Ok(entry)
    }

    pub fn close_entry(&self) {
        self.update(|s| s.transient.selected_entry = None);
    }

    /// Raw content of an entry, e.g. a PDF to preview.
    pub async fn download_entry_content(&self, entry_id: &str) -> KbResult<Bytes> {
        let ctx = ErrorContext::new("download_entry").with_entry(entry_id);
        self.api
            .entry_content(entry_id)
            .await
            .map_err(|e| self.report("load file", e, ctx))
    }
}
