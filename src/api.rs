//! Knowledge base REST client.
//!
//! Typed wrapper over an [`HttpClient`]. Every request carries the session's
//! bearer token; non-2xx responses become [`ApiError`]s carrying the server's
//! `detail` text, transport failures become [`NetworkError`]s.

use std::sync::Arc;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ApiError, AuthError, KbResult, NetworkError};
use crate::models::{
    AssignmentBody, Entry, EntryPatchRequest, ErrorBody, Folder, FolderNameRequest,
    TextEntryRequest, UploadResponse,
};
use crate::traits::{Headers, HttpClient, MultipartFile, Response, SessionProvider};

/// Client for the knowledge base endpoints.
#[derive(Clone)]
pub struct KnowledgeBaseApi {
    /// Base URL without trailing slash, e.g. `http://localhost:8000/api`
    pub base_url: String,
    http: Arc<dyn HttpClient>,
    session: Arc<dyn SessionProvider>,
}

impl std::fmt::Debug for KnowledgeBaseApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeBaseApi")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Verbs that carry a JSON body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JsonMethod {
    Post,
    Put,
    Patch,
}

fn seg(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

impl KnowledgeBaseApi {
    pub fn new(
        base_url: impl Into<String>,
        http: Arc<dyn HttpClient>,
        session: Arc<dyn SessionProvider>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            session,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Headers for an authenticated request. Fails before any I/O without a token.
    async fn auth_headers(&self, json: bool) -> KbResult<Headers> {
        let token = self
            .session
            .access_token()
            .await
            .map_err(AuthError::from)?
            .ok_or(AuthError::NotAuthenticated)?;

        let mut headers = Headers::new();
        headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        if json {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }
        Ok(headers)
    }

    /// Turn a transport result into a successful response or a typed error.
    fn check(
        &self,
        result: Result<Response, crate::traits::HttpError>,
        url: &str,
    ) -> KbResult<Response> {
        let response = result.map_err(|e| NetworkError::from_http(e, url))?;
        if response.is_success() {
            return Ok(response);
        }

        let detail = response
            .json::<ErrorBody>()
            .ok()
            .and_then(|body| body.detail_text());
        tracing::debug!(
            "Request to {} failed with status {} ({:?})",
            url,
            response.status,
            detail
        );
        Err(ApiError::from_status(response.status, detail).into())
    }

    fn decode<T: DeserializeOwned>(response: &Response) -> KbResult<T> {
        Ok(response.json::<T>()?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> KbResult<T> {
        let url = self.url(path);
        let headers = self.auth_headers(false).await?;
        let response = self.check(self.http.get(&url, &headers).await, &url)?;
        Self::decode(&response)
    }

    async fn send_json<B: Serialize>(
        &self,
        method: JsonMethod,
        path: &str,
        body: &B,
    ) -> KbResult<Response> {
        let url = self.url(path);
        let headers = self.auth_headers(true).await?;
        let body = serde_json::to_string(body)?;
        let result = match method {
            JsonMethod::Post => self.http.post(&url, &body, &headers).await,
            JsonMethod::Put => self.http.put(&url, &body, &headers).await,
            JsonMethod::Patch => self.http.patch(&url, &body, &headers).await,
        };
        self.check(result, &url)
    }

    async fn delete(&self, path: &str) -> KbResult<()> {
        let url = self.url(path);
        let headers = self.auth_headers(false).await?;
        self.check(self.http.delete(&url, &headers).await, &url)?;
        Ok(())
    }

    /// List all folders with their entry counts.
    ///
    /// GET /knowledge-base/folders
    pub async fn list_folders(&self) -> KbResult<Vec<Folder>> {
        self.get_json("/knowledge-base/folders").await
    }

    /// Most recently created entries across all folders.
    ///
    /// GET /knowledge-base/entries/recent?limit=N
    pub async fn recent_entries(&self, limit: usize) -> KbResult<Vec<Entry>> {
        self.get_json(&format!("/knowledge-base/entries/recent?limit={}", limit))
            .await
    }

    /// GET /knowledge-base/folders/{id}/entries
    pub async fn folder_entries(&self, folder_id: &str) -> KbResult<Vec<Entry>> {
        self.get_json(&format!("/knowledge-base/folders/{}/entries", seg(folder_id)))
            .await
    }

    /// POST /knowledge-base/folders
    pub async fn create_folder(&self, name: &str) -> KbResult<Folder> {
        let body = FolderNameRequest {
            name: name.to_string(),
        };
        let response = self.send_json(JsonMethod::Post, "/knowledge-base/folders", &body).await?;
        Self::decode(&response)
    }

    /// PATCH /knowledge-base/folders/{id}
    pub async fn rename_folder(&self, folder_id: &str, name: &str) -> KbResult<()> {
        let body = FolderNameRequest {
            name: name.to_string(),
        };
        self.send_json(
            JsonMethod::Patch,
            &format!("/knowledge-base/folders/{}", seg(folder_id)),
            &body,
        )
        .await?;
        Ok(())
    }

    /// Delete a folder. The server removes its entries too.
    ///
    /// DELETE /knowledge-base/folders/{id}
    pub async fn delete_folder(&self, folder_id: &str) -> KbResult<()> {
        self.delete(&format!("/knowledge-base/folders/{}", seg(folder_id)))
            .await
    }

    /// POST /knowledge-base/folders/{id}/entries
    pub async fn create_text_entry(
        &self,
        folder_id: &str,
        filename: &str,
        content: &str,
    ) -> KbResult<Entry> {
        let body = TextEntryRequest {
            filename: filename.to_string(),
            content: content.to_string(),
        };
        let response = self
            .send_json(
                JsonMethod::Post,
                &format!("/knowledge-base/folders/{}/entries", seg(folder_id)),
                &body,
            )
            .await?;
        Self::decode(&response)
    }

    /// Upload one file into a folder.
    ///
    /// POST /knowledge-base/folders/{id}/upload (multipart, field `file`)
    pub async fn upload_file(
        &self,
        folder_id: &str,
        file: MultipartFile,
    ) -> KbResult<UploadResponse> {
        let url = self.url(&format!("/knowledge-base/folders/{}/upload", seg(folder_id)));
        let headers = self.auth_headers(false).await?;
        let response = self
            .check(self.http.post_multipart(&url, file, &headers).await, &url)?;
        Self::decode(&response)
    }

    /// Move an entry to another folder.
    ///
    /// PATCH /knowledge-base/entries/{id} `{folder_id}`
    pub async fn move_entry(&self, entry_id: &str, folder_id: &str) -> KbResult<()> {
        self.send_json(
            JsonMethod::Patch,
            &format!("/knowledge-base/entries/{}", seg(entry_id)),
            &EntryPatchRequest::move_to(folder_id),
        )
        .await?;
        Ok(())
    }

    /// PATCH /knowledge-base/entries/{id} `{summary}`
    pub async fn update_summary(&self, entry_id: &str, summary: &str) -> KbResult<()> {
        self.send_json(
            JsonMethod::Patch,
            &format!("/knowledge-base/entries/{}", seg(entry_id)),
            &EntryPatchRequest::summary(summary),
        )
        .await?;
        Ok(())
    }

    /// DELETE /knowledge-base/entries/{id}
    pub async fn delete_entry(&self, entry_id: &str) -> KbResult<()> {
        self.delete(&format!("/knowledge-base/entries/{}", seg(entry_id)))
            .await
    }

    /// Raw content of an entry, for previews.
    ///
    /// GET /knowledge-base/entries/{id}/content
    pub async fn entry_content(&self, entry_id: &str) -> KbResult<Bytes> {
        let url = self.url(&format!("/knowledge-base/entries/{}/content", seg(entry_id)));
        let headers = self.auth_headers(false).await?;
        let response = self.check(self.http.get(&url, &headers).await, &url)?;
        Ok(response.body)
    }

    /// GET /agents/{agent_id}/knowledge-base
    pub async fn get_assignment(&self, agent_id: &str) -> KbResult<Vec<String>> {
        let body: AssignmentBody = self
            .get_json(&format!("/agents/{}/knowledge-base", seg(agent_id)))
            .await?;
        Ok(body.entry_ids)
    }

    /// Replace the agent's whole assignment set.
    ///
    /// PUT /agents/{agent_id}/knowledge-base `{entry_ids}`
    pub async fn set_assignment(&self, agent_id: &str, entry_ids: Vec<String>) -> KbResult<()> {
        self.send_json(
            JsonMethod::Put,
            &format!("/agents/{}/knowledge-base", seg(agent_id)),
            &AssignmentBody { entry_ids },
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{InMemorySession, MockHttpClient, MockResponse};
    use crate::error::{KbError, DUPLICATE_FOLDER_MESSAGE};
    use crate::traits::HttpError;
    use serde_json::json;

    const BASE: &str = "http://kb.test/api";

    fn api_with(http: &MockHttpClient, session: InMemorySession) -> KnowledgeBaseApi {
        KnowledgeBaseApi::new(format!("{}/", BASE), Arc::new(http.clone()), Arc::new(session))
    }

    #[tokio::test]
    async fn test_list_folders_sends_bearer_token() {
        let http = MockHttpClient::new();
        http.set_method_response(
            "GET",
            &format!("{}/knowledge-base/folders", BASE),
            MockResponse::json(
                200,
                json!([{"folder_id": 1, "name": "Research", "entry_count": 3}]),
            ),
        );
        let api = api_with(&http, InMemorySession::with_token("tok"));

        let folders = api.list_folders().await.unwrap();
        assert_eq!(folders.len(), 1);
        assert_eq!(folders[0].folder_id, "1");
        assert_eq!(folders[0].entry_count, 3);

        let requests = http.get_requests();
        assert_eq!(
            requests[0].headers.get("Authorization").map(String::as_str),
            Some("Bearer tok")
        );
    }

    #[tokio::test]
    async fn test_missing_token_sends_nothing() {
        let http = MockHttpClient::new();
        let api = api_with(&http, InMemorySession::new());

        let err = api.list_folders().await.unwrap_err();
        assert!(matches!(err, KbError::Auth(AuthError::NotAuthenticated)));
        assert!(http.get_requests().is_empty());
    }

    #[tokio::test]
    async fn test_error_detail_is_kept() {
        let http = MockHttpClient::new();
        http.set_method_response(
            "PATCH",
            &format!("{}/knowledge-base/folders/f1", BASE),
            MockResponse::json(409, json!({"detail": "Folder already exists"})),
        );
        let api = api_with(&http, InMemorySession::with_token("tok"));

        let err = api.rename_folder("f1", "Dup").await.unwrap_err();
        assert_eq!(err.api_error().map(|e| e.status()), Some(409));
        assert_eq!(err.rename_notice_message(), DUPLICATE_FOLDER_MESSAGE);

        let sent = http.get_requests()[0].json_body().unwrap();
        assert_eq!(sent, json!({"name": "Dup"}));
    }

    #[tokio::test]
    async fn test_move_entry_body() {
        let http = MockHttpClient::new();
        http.set_default_response(MockResponse::json(200, json!({})));
        let api = api_with(&http, InMemorySession::with_token("tok"));

        api.move_entry("e1", "F2").await.unwrap();

        let req = &http.requests_to("PATCH", &format!("{}/knowledge-base/entries/e1", BASE))[0];
        assert_eq!(req.json_body().unwrap(), json!({"folder_id": "F2"}));
        assert_eq!(
            req.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
    }

    #[tokio::test]
    async fn test_json_calls_use_their_verbs() {
        let http = MockHttpClient::new();
        http.set_default_response(MockResponse::json(
            200,
            json!({"folder_id": "F9", "name": "New", "entry_id": "e9", "filename": "n.md"}),
        ));
        let api = api_with(&http, InMemorySession::with_token("tok"));

        api.create_folder("New").await.unwrap();
        api.create_text_entry("F9", "n.md", "text").await.unwrap();
        api.rename_folder("F9", "Old").await.unwrap();
        api.update_summary("e9", "short").await.unwrap();
        api.set_assignment("agent-1", vec![]).await.unwrap();

        let methods: Vec<_> = http.get_requests().into_iter().map(|r| r.method).collect();
        assert_eq!(methods, vec!["POST", "POST", "PATCH", "PATCH", "PUT"]);
    }

    #[tokio::test]
    async fn test_path_segments_are_encoded() {
        let http = MockHttpClient::new();
        http.set_default_response(MockResponse::json(200, json!([])));
        let api = api_with(&http, InMemorySession::with_token("tok"));

        api.folder_entries("a b/c").await.unwrap();
        assert_eq!(
            http.get_requests()[0].url,
            format!("{}/knowledge-base/folders/a%20b%2Fc/entries", BASE)
        );
    }

    #[tokio::test]
    async fn test_transport_error_maps_to_network() {
        let http = MockHttpClient::new();
        http.set_default_response(MockResponse::Error(HttpError::Timeout("slow".to_string())));
        let api = api_with(&http, InMemorySession::with_token("tok"));

        let err = api.recent_entries(5).await.unwrap_err();
        assert!(matches!(err, KbError::Network(NetworkError::Timeout { .. })));
        assert_eq!(
            http.get_requests()[0].url,
            format!("{}/knowledge-base/entries/recent?limit=5", BASE)
        );
    }

    #[tokio::test]
    async fn test_upload_payload_too_large() {
        let http = MockHttpClient::new();
        http.set_default_response(MockResponse::json(413, json!({"detail": "too big"})));
        let api = api_with(&http, InMemorySession::with_token("tok"));

        let err = api
            .upload_file("F1", MultipartFile::new("x.pdf", Bytes::from_static(b"%PDF")))
            .await
            .unwrap_err();
        assert!(err.is_payload_too_large());
        assert!(err.notice_message("upload x.pdf").contains("50MB"));

        let req = &http.get_requests()[0];
        assert_eq!(req.file.as_ref().map(|f| f.filename.as_str()), Some("x.pdf"));
    }

    #[tokio::test]
    async fn test_assignment_roundtrip_paths() {
        let http = MockHttpClient::new();
        let url = format!("{}/agents/agent-1/knowledge-base", BASE);
        http.set_method_response("GET", &url, MockResponse::json(200, json!({"entry_ids": ["e1"]})));
        http.set_method_response("PUT", &url, MockResponse::json(200, json!({})));
        let api = api_with(&http, InMemorySession::with_token("tok"));

        assert_eq!(api.get_assignment("agent-1").await.unwrap(), vec!["e1"]);
        api.set_assignment("agent-1", vec!["e1".into(), "e2".into()])
            .await
            .unwrap();

        let put = &http.requests_to("PUT", &url)[0];
        assert_eq!(put.json_body().unwrap(), json!({"entry_ids": ["e1", "e2"]}));
    }

    #[tokio::test]
    async fn test_unparseable_body_is_network_error() {
        let http = MockHttpClient::new();
        http.set_default_response(MockResponse::Success(Response::new(
            200,
            Bytes::from_static(b"<html>"),
        )));
        let api = api_with(&http, InMemorySession::with_token("tok"));

        let err = api.list_folders().await.unwrap_err();
        assert!(matches!(
            err,
            KbError::Network(NetworkError::InvalidResponse { .. })
        ));
    }
}
