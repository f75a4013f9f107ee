//! Knowledge base manager.
//!
//! Owns the state store and runs every fetch and mutation against the API.
//! All handlers are pessimistic: local state changes only after the server
//! confirmed, with a transient flag bridging the gap. Each handler reports
//! its outcome through the [`Notifier`] and also returns it, so a caller can
//! either watch notices or handle the `Result`.
//!
//! Handlers take `&self`; share the manager behind an `Arc` to run several
//! at once. Nothing is retried or cancelled.

mod assignment;
mod fetch;
mod mutations;
mod upload;

use std::sync::Arc;

use tokio::sync::watch;

use crate::api::KnowledgeBaseApi;
use crate::config::{Capabilities, ManagerConfig};
use crate::error::{ErrorContext, KbError, KbResult, ValidationError};
use crate::notifications::Notifier;
use crate::state::KnowledgeBaseState;
use crate::store::Store;
use crate::traits::{HttpClient, SessionProvider};

pub use upload::{BatchUploadReport, FileUploadOutcome, UploadSource};

/// Operations a capability flag can switch off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Capability {
    Edit,
    Delete,
    Upload,
    Assignment,
    Dnd,
}

impl Capability {
    fn name(self) -> &'static str {
        match self {
            Capability::Edit => "Editing",
            Capability::Delete => "Deleting",
            Capability::Upload => "Uploading",
            Capability::Assignment => "Agent assignment",
            Capability::Dnd => "Drag and drop",
        }
    }

    fn enabled_in(self, caps: &Capabilities) -> bool {
        match self {
            Capability::Edit => caps.enable_edit,
            Capability::Delete => caps.enable_delete,
            Capability::Upload => caps.enable_upload,
            Capability::Assignment => caps.enable_assignment,
            Capability::Dnd => caps.enable_dnd,
        }
    }
}

pub struct KnowledgeBaseManager {
    api: KnowledgeBaseApi,
    store: Store<KnowledgeBaseState>,
    notifier: Notifier,
    config: ManagerConfig,
}

impl std::fmt::Debug for KnowledgeBaseManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeBaseManager")
            .field("api", &self.api)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl KnowledgeBaseManager {
    pub fn new(api: KnowledgeBaseApi, config: ManagerConfig) -> Self {
        let state = KnowledgeBaseState::new(config.expand_policy());
        Self {
            api,
            store: Store::new(state),
            notifier: Notifier::new(),
            config,
        }
    }

    /// Build the API client from the config's base URL and the given adapters.
    pub fn with_adapters(
        config: ManagerConfig,
        http: Arc<dyn HttpClient>,
        session: Arc<dyn SessionProvider>,
    ) -> Self {
        let api = KnowledgeBaseApi::new(config.base_url.clone(), http, session);
        Self::new(api, config)
    }

    /// Share a notifier with other components.
    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn api(&self) -> &KnowledgeBaseApi {
        &self.api
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.config.capabilities
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> KnowledgeBaseState {
        self.store.snapshot()
    }

    /// Read the current state without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&KnowledgeBaseState) -> R) -> R {
        self.store.read(f)
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<KnowledgeBaseState> {
        self.store.subscribe()
    }

    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut KnowledgeBaseState) -> R) -> R {
        self.store.update(f)
    }

    pub(crate) fn require(&self, capability: Capability) -> KbResult<()> {
        if capability.enabled_in(&self.config.capabilities) {
            Ok(())
        } else {
            Err(ValidationError::CapabilityDisabled {
                capability: capability.name(),
            }
            .into())
        }
    }

    /// Log a failed action, publish its error notice and hand the error back.
    pub(crate) fn report(&self, action: &str, err: KbError, ctx: ErrorContext) -> KbError {
        self.report_with(action, err, ctx, |e| e.notice_message(action))
    }

    /// Like [`report`](Self::report), with the notice text chosen by `notice`.
    pub(crate) fn report_with(
        &self,
        action: &str,
        err: KbError,
        ctx: ErrorContext,
        notice: impl FnOnce(&KbError) -> String,
    ) -> KbError {
        let err = match err {
            KbError::WithContext { .. } => err,
            other => other.with_context(ctx),
        };
        let log_ctx = err
            .context()
            .map(|c| c.to_log_string())
            .unwrap_or_default();
        tracing::warn!(
            "{} failed [{}] {}: {}",
            action,
            err.error_code(),
            log_ctx,
            err
        );
        self.notifier.error(notice(&err));
        err
    }

    /// Existing folder or `UnknownFolder`.
    pub(crate) fn require_folder(&self, folder_id: &str) -> KbResult<crate::models::Folder> {
        self.read(|s| s.folder(folder_id).cloned())
            .ok_or_else(|| {
                ValidationError::UnknownFolder {
                    folder_id: folder_id.to_string(),
                }
                .into()
            })
    }

    /// Known entry or `UnknownEntry`.
    pub(crate) fn require_entry(&self, entry_id: &str) -> KbResult<crate::models::Entry> {
        self.read(|s| s.find_entry(entry_id).cloned())
            .ok_or_else(|| {
                ValidationError::UnknownEntry {
                    entry_id: entry_id.to_string(),
                }
                .into()
            })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::adapters::mock::{InMemorySession, MockHttpClient, MockResponse};
    use serde_json::json;

    pub const BASE: &str = "http://kb.test/api";

    pub fn url(path: &str) -> String {
        format!("{}{}", BASE, path)
    }

    pub fn manager_with(http: &MockHttpClient, config: ManagerConfig) -> KnowledgeBaseManager {
        KnowledgeBaseManager::with_adapters(
            config.with_base_url(BASE),
            Arc::new(http.clone()),
            Arc::new(InMemorySession::with_token("tok")),
        )
    }

    pub fn manager(http: &MockHttpClient) -> KnowledgeBaseManager {
        manager_with(http, ManagerConfig::default())
    }

    /// Serve two folders, F1 "Research" and F2 "Notes".
    pub fn serve_folders(http: &MockHttpClient) {
        http.set_method_response(
            "GET",
            &url("/knowledge-base/folders"),
            MockResponse::json(
                200,
                json!([
                    {"folder_id": "F1", "name": "Research", "entry_count": 1},
                    {"folder_id": "F2", "name": "Notes", "entry_count": 0}
                ]),
            ),
        );
    }

    pub fn serve_entries(http: &MockHttpClient, folder_id: &str, entries: serde_json::Value) {
        http.set_method_response(
            "GET",
            &url(&format!("/knowledge-base/folders/{}/entries", folder_id)),
            MockResponse::json(200, entries),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use crate::notifications::NoticeLevel;

    #[tokio::test]
    async fn test_disabled_capability_is_refused() {
        let http = MockHttpClient::new();
        let mgr = manager_with(
            &http,
            ManagerConfig::default().with_capabilities(Capabilities::read_only()),
        );

        let err = mgr.require(Capability::Delete).unwrap_err();
        assert_eq!(
            err.validation_error(),
            Some(&ValidationError::CapabilityDisabled {
                capability: "Deleting"
            })
        );
    }

    #[tokio::test]
    async fn test_report_publishes_notice() {
        let http = MockHttpClient::new();
        http.set_default_response(MockResponse::json(500, serde_json::json!({"detail": "boom"})));
        let mgr = manager(&http);

        let err = mgr.api().list_folders().await.unwrap_err();
        let err = mgr.report("load folders", err, ErrorContext::new("refetch_folders"));

        assert_eq!(err.context().unwrap().operation, "refetch_folders");
        let notices = mgr.notifier().history();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(notices[0].message, "Failed to load folders: boom");
    }
}
