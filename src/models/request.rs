//! Request and response bodies of the knowledge base API.

use serde::{Deserialize, Serialize};

use super::Entry;

/// Body of `POST /knowledge-base/folders` and `PATCH /knowledge-base/folders/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FolderNameRequest {
    pub name: String,
}

/// Body of `PATCH /knowledge-base/entries/{id}`.
///
/// Only the fields that are set are sent, so one endpoint serves both the
/// move and the summary edit.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EntryPatchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl EntryPatchRequest {
    pub fn move_to(folder_id: impl Into<String>) -> Self {
        Self {
            folder_id: Some(folder_id.into()),
            ..Self::default()
        }
    }

    pub fn summary(summary: impl Into<String>) -> Self {
        Self {
            summary: Some(summary.into()),
            ..Self::default()
        }
    }
}

/// Body of `POST /knowledge-base/folders/{id}/entries`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextEntryRequest {
    pub filename: String,
    pub content: String,
}

/// Response of the multipart upload endpoint.
///
/// The server may rename a file that collides with an existing one and
/// reports the substitution here.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct UploadResponse {
    #[serde(default)]
    pub entry: Option<Entry>,
    #[serde(default)]
    pub filename_changed: bool,
    #[serde(default)]
    pub original_filename: Option<String>,
    #[serde(default)]
    pub final_filename: Option<String>,
}

/// Body of `GET` and `PUT /agents/{agent_id}/knowledge-base`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AssignmentBody {
    #[serde(default)]
    pub entry_ids: Vec<String>,
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Detail as display text. FastAPI-style validation errors send a list.
    pub fn detail_text(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_patch_only_sends_set_fields() {
        let body = serde_json::to_value(EntryPatchRequest::move_to("F2")).unwrap();
        assert_eq!(body, serde_json::json!({"folder_id": "F2"}));

        let body = serde_json::to_value(EntryPatchRequest::summary("short")).unwrap();
        assert_eq!(body, serde_json::json!({"summary": "short"}));
    }

    #[test]
    fn test_upload_response_renamed() {
        let json = r#"{
            "entry": {"entry_id": "e9", "filename": "a (1).txt", "folder_id": "f1"},
            "filename_changed": true,
            "original_filename": "a.txt",
            "final_filename": "a (1).txt"
        }"#;
        let resp: UploadResponse = serde_json::from_str(json).unwrap();
        assert!(resp.filename_changed);
        assert_eq!(resp.final_filename.as_deref(), Some("a (1).txt"));
        assert_eq!(resp.entry.unwrap().entry_id, "e9");
    }

    #[test]
    fn test_upload_response_minimal() {
        let resp: UploadResponse = serde_json::from_str("{}").unwrap();
        assert!(!resp.filename_changed);
        assert!(resp.entry.is_none());
    }

    #[test]
    fn test_error_body_detail_text() {
        let body: ErrorBody = serde_json::from_str(r#"{"detail": "nope"}"#).unwrap();
        assert_eq!(body.detail_text().as_deref(), Some("nope"));

        let body: ErrorBody = serde_json::from_str(r#"{"detail": [{"msg": "x"}]}"#).unwrap();
        assert!(body.detail_text().unwrap().contains("msg"));

        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert!(body.detail_text().is_none());
    }
}
