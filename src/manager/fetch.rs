//! Folder list, recent entries and lazy per-folder entry loading.

use futures::future;

use super::KnowledgeBaseManager;
use crate::error::{ErrorContext, KbResult};
use crate::state::{plan_toggle, ToggleAction};

impl KnowledgeBaseManager {
    /// Reload the folder list and the recent entries.
    ///
    /// In assignment mode every folder's entries are loaded as well, since
    /// all folders are shown expanded.
    pub async fn refetch(&self) -> KbResult<()> {
        let (folders, recent) = future::join(self.refetch_folders(), self.refetch_recent()).await;
        folders?;
        recent?;

        if self.config.assignment_mode {
            self.load_all_entries().await?;
        }
        Ok(())
    }

    /// GET the folder list and rebuild the tree. Expand flags are preserved.
    pub async fn refetch_folders(&self) -> KbResult<()> {
        self.update(|s| s.transient.refreshing = true);
        tracing::debug!("Fetching folder list");

        let result = self.api.list_folders().await;
        self.update(|s| s.transient.refreshing = false);

        match result {
            Ok(folders) => {
                tracing::debug!("Loaded {} folders", folders.len());
                self.update(|s| s.set_folders(folders));
                Ok(())
            }
            Err(e) => Err(self.report("load folders", e, ErrorContext::new("refetch_folders"))),
        }
    }

    pub async fn refetch_recent(&self) -> KbResult<()> {
        let limit = self.config.recent_limit;
        match self.api.recent_entries(limit).await {
            Ok(recent) => {
                self.update(|s| s.recent = recent);
                Ok(())
            }
            Err(e) => Err(self.report(
                "load recent files",
                e,
                ErrorContext::new("refetch_recent"),
            )),
        }
    }

    /// Expand or collapse a folder.
    ///
    /// Expanding a folder that was never loaded fetches its entries; a folder
    /// with cached entries or a fetch already in flight expands without a
    /// request. Collapsing never cancels an in-flight fetch: its result is
    /// still cached when it arrives.
    pub async fn toggle_folder(&self, folder_id: &str) -> KbResult<ToggleAction> {
        self.require_folder(folder_id)?;

        let action = self.update(|s| {
            let action = plan_toggle(
                s.is_expanded(folder_id),
                s.is_cached(folder_id),
                s.transient.is_fetching(folder_id),
            );
            match action {
                ToggleAction::Collapse => {
                    s.set_expanded(folder_id, false);
                    s.transient.loading_folders.remove(folder_id);
                }
                ToggleAction::ExpandCached => {
                    s.set_expanded(folder_id, true);
                }
                ToggleAction::ExpandPending | ToggleAction::ExpandAndFetch => {
                    s.set_expanded(folder_id, true);
                    s.transient.loading_folders.insert(folder_id.to_string());
                }
            }
            action
        });
        tracing::debug!("Toggle folder {}: {:?}", folder_id, action);

        if action.needs_fetch() {
            self.load_folder_entries(folder_id).await?;
        }
        Ok(action)
    }

    /// Fetch one folder's entries into the cache.
    ///
    /// Used by expansion and after mutations that invalidate the folder. On
    /// failure the cache entry is removed so the next expand retries.
    pub async fn load_folder_entries(&self, folder_id: &str) -> KbResult<()> {
        self.update(|s| {
            s.transient.pending_fetches.insert(folder_id.to_string());
            if s.is_expanded(folder_id) {
                s.transient.loading_folders.insert(folder_id.to_string());
            }
        });

        let result = self.api.folder_entries(folder_id).await;

        match result {
            Ok(entries) => {
                tracing::debug!("Loaded {} entries for folder {}", entries.len(), folder_id);
                self.update(|s| {
                    s.transient.pending_fetches.remove(folder_id);
                    s.transient.loading_folders.remove(folder_id);
                    // A folder deleted meanwhile stays out of the cache
                    if s.folder(folder_id).is_some() {
                        s.set_entries(folder_id, entries);
                    }
                });
                Ok(())
            }
            Err(e) => {
                self.update(|s| {
                    s.transient.pending_fetches.remove(folder_id);
                    s.transient.loading_folders.remove(folder_id);
                    s.invalidate(folder_id);
                });
                Err(self.report(
                    "load files",
                    e,
                    ErrorContext::new("load_folder_entries").with_folder(folder_id),
                ))
            }
        }
    }

    /// Load every folder's entries, one folder after another.
    ///
    /// Failures are reported per folder; the first one is returned after all
    /// folders were attempted.
    pub async fn load_all_entries(&self) -> KbResult<()> {
        let ids: Vec<String> = self.read(|s| s.folders.iter().map(|f| f.folder_id.clone()).collect());
        let mut first_error = None;

        for id in ids {
            if let Err(e) = self.load_folder_entries(&id).await {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use crate::config::ManagerConfig;
    use crate::notifications::NoticeLevel;
    use crate::state::{FolderPhase, ToggleAction};
    use crate::tree::find_folder;
    use serde_json::json;

    #[tokio::test]
    async fn test_expand_fetches_once_and_collapse_keeps_cache() {
        let http = MockHttpClient::new();
        serve_folders(&http);
        serve_entries(&http, "F1", json!([{"entry_id": "e1", "filename": "a.txt", "folder_id": "F1"}]));
        let mgr = manager(&http);
        mgr.refetch_folders().await.unwrap();

        assert_eq!(mgr.toggle_folder("F1").await.unwrap(), ToggleAction::ExpandAndFetch);
        assert_eq!(mgr.toggle_folder("F1").await.unwrap(), ToggleAction::Collapse);
        assert_eq!(mgr.toggle_folder("F1").await.unwrap(), ToggleAction::ExpandCached);

        let entries_url = url("/knowledge-base/folders/F1/entries");
        assert_eq!(http.requests_to("GET", &entries_url).len(), 1);

        let state = mgr.snapshot();
        assert_eq!(state.folder_phase("F1"), FolderPhase::Loaded);
        let node = find_folder(&state.tree, "F1").unwrap();
        assert!(node.expanded);
        assert_eq!(node.children[0].name, "a.txt");
    }

    #[tokio::test]
    async fn test_fetch_failure_leaves_cache_unset_and_notifies() {
        let http = MockHttpClient::new();
        serve_folders(&http);
        let entries_url = url("/knowledge-base/folders/F2/entries");
        http.push_response("GET", &entries_url, MockResponse::json(500, json!({})));
        serve_entries(&http, "F2", json!([]));
        let mgr = manager(&http);
        mgr.refetch_folders().await.unwrap();

        assert!(mgr.toggle_folder("F2").await.is_err());
        let state = mgr.snapshot();
        assert!(!state.is_cached("F2"));
        assert!(!state.transient.is_loading("F2"));
        assert!(!state.transient.is_fetching("F2"));

        let notices = mgr.notifier().history();
        assert_eq!(notices.last().unwrap().level, NoticeLevel::Error);
        assert_eq!(notices.last().unwrap().message, "Failed to load files");

        // Collapse, expand again: retried
        mgr.toggle_folder("F2").await.unwrap();
        mgr.toggle_folder("F2").await.unwrap();
        assert_eq!(http.requests_to("GET", &entries_url).len(), 2);
        assert!(mgr.snapshot().is_cached("F2"));
    }

    #[tokio::test]
    async fn test_unknown_folder_toggle() {
        let http = MockHttpClient::new();
        serve_folders(&http);
        let mgr = manager(&http);
        mgr.refetch_folders().await.unwrap();

        assert!(mgr.toggle_folder("nope").await.is_err());
        assert_eq!(http.get_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_refetch_recent_uses_limit() {
        let http = MockHttpClient::new();
        serve_folders(&http);
        http.set_method_response(
            "GET",
            &url("/knowledge-base/entries/recent?limit=3"),
            MockResponse::json(200, json!([{"entry_id": "r1", "filename": "new.md", "folder_id": "F1"}])),
        );
        let mgr = manager_with(&http, ManagerConfig::default().with_recent_limit(3));

        mgr.refetch().await.unwrap();
        let state = mgr.snapshot();
        assert!(state.folders_loaded);
        assert_eq!(state.recent[0].filename, "new.md");
        assert!(!state.transient.refreshing);
    }

    #[tokio::test]
    async fn test_assignment_mode_loads_everything_expanded() {
        let http = MockHttpClient::new();
        serve_folders(&http);
        http.set_default_response(MockResponse::json(200, json!([])));
        serve_entries(&http, "F1", json!([{"entry_id": "e1", "filename": "a.txt", "folder_id": "F1"}]));
        serve_entries(&http, "F2", json!([]));
        let mgr = manager_with(&http, ManagerConfig::default().with_assignment_mode(true));

        mgr.refetch().await.unwrap();
        let state = mgr.snapshot();
        assert!(state.is_cached("F1") && state.is_cached("F2"));
        assert!(state.tree.iter().all(|t| t.is_expanded()));
    }
}
