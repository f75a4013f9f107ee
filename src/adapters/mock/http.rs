//! Mock HTTP client for testing.
//!
//! Provides a configurable mock HTTP client that can return predefined
//! responses or errors for testing purposes.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::traits::{Headers, HttpClient, HttpError, MultipartFile, Response};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method (GET, POST, PATCH, PUT, DELETE)
    pub method: String,
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Request body (for requests with a string body)
    pub body: Option<String>,
    /// File part (for multipart requests)
    pub file: Option<MultipartFile>,
}

impl RecordedRequest {
    /// Parse the recorded body as JSON.
    pub fn json_body(&self) -> Option<serde_json::Value> {
        self.body
            .as_deref()
            .and_then(|b| serde_json::from_str(b).ok())
    }
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a response (any status)
    Success(Response),
    /// Return a transport error
    Error(HttpError),
}

impl MockResponse {
    /// Shorthand for a JSON response with the given status.
    pub fn json(status: u16, value: serde_json::Value) -> Self {
        MockResponse::Success(Response::json_body(status, &value))
    }
}

/// Mock HTTP client for testing.
///
/// Responses are looked up in this order:
/// 1. one-shot responses queued with [`push_response`](Self::push_response)
/// 2. persistent responses for the exact method and URL
/// 3. persistent responses for the exact URL (any method)
/// 4. the longest persistent URL prefix
/// 5. the default response
///
/// # Example
///
/// ```ignore
/// use kbtree::adapters::mock::{MockHttpClient, MockResponse};
///
/// let client = MockHttpClient::new();
/// client.set_method_response(
///     "GET",
///     "http://kb/knowledge-base/folders",
///     MockResponse::json(200, serde_json::json!([])),
/// );
/// ```
#[derive(Debug, Clone)]
pub struct MockHttpClient {
    /// Configured responses keyed by `"METHOD url"` or `url`
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    /// One-shot responses keyed by `"METHOD url"`
    queued: Arc<Mutex<HashMap<String, VecDeque<MockResponse>>>>,
    /// Default response when no specific match
    default_response: Arc<Mutex<Option<MockResponse>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

fn method_key(method: &str, url: &str) -> String {
    format!("{} {}", method, url)
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            queued: Arc::new(Mutex::new(HashMap::new())),
            default_response: Arc::new(Mutex::new(None)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set a response for a URL regardless of method.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(url.to_string(), response);
    }

    /// Set a response for a specific method and URL.
    pub fn set_method_response(&self, method: &str, url: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(method_key(method, url), response);
    }

    /// Queue a one-shot response for a method and URL.
    ///
    /// Queued responses are consumed in FIFO order before any persistent one.
    pub fn push_response(&self, method: &str, url: &str, response: MockResponse) {
        let mut queued = self.queued.lock().unwrap();
        queued
            .entry(method_key(method, url))
            .or_default()
            .push_back(response);
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        let mut default = self.default_response.lock().unwrap();
        *default = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Recorded requests matching a method and URL.
    pub fn requests_to(&self, method: &str, url: &str) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.url == url)
            .cloned()
            .collect()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    /// Clear all configured responses.
    pub fn clear_responses(&self) {
        self.responses.lock().unwrap().clear();
        self.queued.lock().unwrap().clear();
    }

    fn record_request(
        &self,
        method: &str,
        url: &str,
        headers: &Headers,
        body: Option<String>,
        file: Option<MultipartFile>,
    ) {
        let mut requests = self.requests.lock().unwrap();
        requests.push(RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body,
            file,
        });
    }

    fn get_response(&self, method: &str, url: &str) -> Option<MockResponse> {
        let key = method_key(method, url);

        if let Some(queue) = self.queued.lock().unwrap().get_mut(&key) {
            if let Some(response) = queue.pop_front() {
                return Some(response);
            }
        }

        let responses = self.responses.lock().unwrap();
        if let Some(response) = responses.get(&key).or_else(|| responses.get(url)) {
            return Some(response.clone());
        }

        // Longest prefix wins so `/folders` does not shadow `/folders/f1/entries`
        let method_prefix = format!("{} ", method);
        let best = responses
            .iter()
            .filter_map(|(pattern, response)| {
                let bare = match pattern.strip_prefix(&method_prefix) {
                    Some(rest) => rest,
                    None if !pattern.contains(' ') => pattern.as_str(),
                    None => return None,
                };
                url.starts_with(bare).then_some((bare.len(), response))
            })
            .max_by_key(|(len, _)| *len);
        if let Some((_, response)) = best {
            return Some(response.clone());
        }

        self.default_response.lock().unwrap().clone()
    }

    fn respond(&self, method: &str, url: &str) -> Result<Response, HttpError> {
        match self.get_response(method, url) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!(
                "No mock response for {} {}",
                method, url
            ))),
        }
    }
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request("GET", url, headers, None, None);
        self.respond("GET", url)
    }

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request("POST", url, headers, Some(body.to_string()), None);
        self.respond("POST", url)
    }

    async fn patch(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<Response, HttpError> {
        self.record_request("PATCH", url, headers, Some(body.to_string()), None);
        self.respond("PATCH", url)
    }

    async fn put(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request("PUT", url, headers, Some(body.to_string()), None);
        self.respond("PUT", url)
    }

    async fn delete(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request("DELETE", url, headers, None, None);
        self.respond("DELETE", url)
    }

    async fn post_multipart(
        &self,
        url: &str,
        file: MultipartFile,
        headers: &Headers,
    ) -> Result<Response, HttpError> {
        self.record_request("POST", url, headers, None, Some(file));
        self.respond("POST", url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[tokio::test]
    async fn test_get_with_response() {
        let client = MockHttpClient::new();
        client.set_response(
            "https://example.com/test",
            MockResponse::Success(Response::new(200, Bytes::from("Hello"))),
        );

        let response = client
            .get("https://example.com/test", &Headers::new())
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        let requests = client.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "GET");
    }

    #[tokio::test]
    async fn test_method_specific_response() {
        let client = MockHttpClient::new();
        client.set_method_response("GET", "http://kb/folders", MockResponse::json(200, serde_json::json!([])));
        client.set_method_response(
            "POST",
            "http://kb/folders",
            MockResponse::json(201, serde_json::json!({"folder_id": "f1"})),
        );

        let get = client.get("http://kb/folders", &Headers::new()).await.unwrap();
        let post = client
            .post("http://kb/folders", "{}", &Headers::new())
            .await
            .unwrap();
        assert_eq!(get.status, 200);
        assert_eq!(post.status, 201);
    }

    #[tokio::test]
    async fn test_queued_responses_are_consumed_in_order() {
        let client = MockHttpClient::new();
        let url = "http://kb/upload";
        client.push_response("POST", url, MockResponse::json(200, serde_json::json!({})));
        client.push_response("POST", url, MockResponse::json(413, serde_json::json!({})));
        client.set_method_response("POST", url, MockResponse::json(500, serde_json::json!({})));

        let mut statuses = Vec::new();
        for _ in 0..3 {
            statuses.push(client.post(url, "", &Headers::new()).await.unwrap().status);
        }

        assert_eq!(statuses, vec![200, 413, 500]);
    }

    #[tokio::test]
    async fn test_longest_prefix_wins() {
        let client = MockHttpClient::new();
        client.set_response("http://kb/folders", MockResponse::json(200, serde_json::json!("short")));
        client.set_response(
            "http://kb/folders/f1",
            MockResponse::json(200, serde_json::json!("long")),
        );

        let response = client
            .get("http://kb/folders/f1/entries", &Headers::new())
            .await
            .unwrap();
        let body: String = response.json().unwrap();
        assert_eq!(body, "long");
    }

    #[tokio::test]
    async fn test_no_response_configured() {
        let client = MockHttpClient::new();
        let result = client.delete("https://example.com/missing", &Headers::new()).await;
        assert!(matches!(result, Err(HttpError::Other(_))));
    }

    #[tokio::test]
    async fn test_multipart_recorded() {
        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::json(200, serde_json::json!({})));

        client
            .post_multipart(
                "http://kb/upload",
                MultipartFile::new("a.txt", Bytes::from("abc")),
                &Headers::new(),
            )
            .await
            .unwrap();

        let requests = client.get_requests();
        assert_eq!(requests[0].file.as_ref().unwrap().filename, "a.txt");
        assert!(requests[0].body.is_none());
    }

    #[tokio::test]
    async fn test_clone_shares_state() {
        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::json(200, serde_json::json!({})));
        let cloned = client.clone();

        cloned.get("https://example.com", &Headers::new()).await.unwrap();

        assert_eq!(client.get_requests().len(), 1);
    }
}
