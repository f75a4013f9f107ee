//! Common test utilities for integration tests.
//!
//! This module provides reusable fixtures for driving a
//! [`KnowledgeBaseManager`] against the mock HTTP client, plus a gated
//! client that can hold a request open so tests can observe the state while
//! it is in flight.
//!
//! # Example
//!
//! ```ignore
//! use common::{KnowledgeBaseFixture, url};
//!
//! let fx = KnowledgeBaseFixture::new();
//! fx.serve_folders(json!([{"folder_id": "F1", "name": "Research"}]));
//! fx.manager.refetch().await.unwrap();
//! ```

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use kbtree::adapters::mock::{InMemorySession, MockHttpClient, MockResponse, RecordedRequest};
use kbtree::config::ManagerConfig;
use kbtree::manager::KnowledgeBaseManager;
use kbtree::notifications::{Notice, NoticeLevel};
use kbtree::traits::{Headers, HttpClient, HttpError, MultipartFile, Response};
use tokio::sync::Notify;

/// Base URL every fixture talks to.
pub const BASE: &str = "http://kb.test/api";

/// Token the in-memory session hands out.
pub const TOKEN: &str = "test-token-12345";

pub fn url(path: &str) -> String {
    format!("{}{}", BASE, path)
}

pub fn entries_url(folder_id: &str) -> String {
    url(&format!("/knowledge-base/folders/{}/entries", folder_id))
}

pub fn upload_url(folder_id: &str) -> String {
    url(&format!("/knowledge-base/folders/{}/upload", folder_id))
}

pub fn entry_url(entry_id: &str) -> String {
    url(&format!("/knowledge-base/entries/{}", entry_id))
}

/// Holds one method's requests until released, optionally only for one URL.
///
/// Every other call passes straight through to the inner mock.
pub struct GatedHttpClient {
    inner: MockHttpClient,
    method: &'static str,
    url: Option<String>,
    /// Signalled when a gated request reaches the client
    pub entered: Notify,
    /// Notify once per gated request to let it complete
    pub release: Notify,
}

impl GatedHttpClient {
    pub fn new(inner: MockHttpClient, method: &'static str) -> Self {
        Self {
            inner,
            method,
            url: None,
            entered: Notify::new(),
            release: Notify::new(),
        }
    }

    /// Gate only requests to `url`.
    pub fn for_url(inner: MockHttpClient, method: &'static str, url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::new(inner, method)
        }
    }

    async fn gate(&self, method: &str, url: &str) {
        let url_matches = self.url.as_deref().map_or(true, |gated| gated == url);
        if method == self.method && url_matches {
            self.entered.notify_one();
            self.release.notified().await;
        }
    }
}

#[async_trait]
impl HttpClient for GatedHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.gate("GET", url).await;
        self.inner.get(url, headers).await
    }

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.gate("POST", url).await;
        self.inner.post(url, body, headers).await
    }

    async fn patch(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.gate("PATCH", url).await;
        self.inner.patch(url, body, headers).await
    }

    async fn put(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.gate("PUT", url).await;
        self.inner.put(url, body, headers).await
    }

    async fn delete(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.gate("DELETE", url).await;
        self.inner.delete(url, headers).await
    }

    async fn post_multipart(
        &self,
        url: &str,
        file: MultipartFile,
        headers: &Headers,
    ) -> Result<Response, HttpError> {
        self.gate("POST", url).await;
        self.inner.post_multipart(url, file, headers).await
    }
}

/// A manager wired to a mock HTTP client and an in-memory session.
pub struct KnowledgeBaseFixture {
    pub http: MockHttpClient,
    pub manager: KnowledgeBaseManager,
}

impl KnowledgeBaseFixture {
    pub fn new() -> Self {
        Self::with_config(ManagerConfig::default())
    }

    pub fn with_config(config: ManagerConfig) -> Self {
        let http = MockHttpClient::new();
        let manager = build_manager(Arc::new(http.clone()), config);
        let fx = Self { http, manager };
        fx.serve_recent(serde_json::json!([]));
        fx
    }

    pub fn serve_folders(&self, folders: serde_json::Value) {
        self.http.set_method_response(
            "GET",
            &url("/knowledge-base/folders"),
            MockResponse::json(200, folders),
        );
    }

    pub fn serve_recent(&self, entries: serde_json::Value) {
        let limit = self.manager.config().recent_limit;
        self.http.set_method_response(
            "GET",
            &url(&format!("/knowledge-base/entries/recent?limit={}", limit)),
            MockResponse::json(200, entries),
        );
    }

    pub fn serve_entries(&self, folder_id: &str, entries: serde_json::Value) {
        self.http
            .set_method_response("GET", &entries_url(folder_id), MockResponse::json(200, entries));
    }

    /// Serve `entries` for the next fetch only.
    pub fn serve_entries_once(&self, folder_id: &str, entries: serde_json::Value) {
        self.http
            .push_response("GET", &entries_url(folder_id), MockResponse::json(200, entries));
    }

    pub fn entry_fetches(&self, folder_id: &str) -> Vec<RecordedRequest> {
        self.http.requests_to("GET", &entries_url(folder_id))
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.manager.notifier().history()
    }

    pub fn messages(&self, level: NoticeLevel) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter(|n| n.level == level)
            .map(|n| n.message)
            .collect()
    }
}

impl Default for KnowledgeBaseFixture {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_manager(http: Arc<dyn HttpClient>, config: ManagerConfig) -> KnowledgeBaseManager {
    KnowledgeBaseManager::with_adapters(
        config.with_base_url(BASE),
        http,
        Arc::new(InMemorySession::with_token(TOKEN)),
    )
}

/// Two folders: F1 "Research" holding one file, F2 "Notes" empty.
pub fn two_folders() -> serde_json::Value {
    serde_json::json!([
        {"folder_id": "F1", "name": "Research", "entry_count": 1},
        {"folder_id": "F2", "name": "Notes", "entry_count": 0}
    ])
}

pub fn entry(entry_id: &str, filename: &str, folder_id: &str) -> serde_json::Value {
    serde_json::json!({
        "entry_id": entry_id,
        "filename": filename,
        "folder_id": folder_id,
    })
}
