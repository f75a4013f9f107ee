//! Sequential batch uploads.
//!
//! Files go up one at a time: file i+1 starts only after file i settled.
//! Each file succeeds or fails on its own, so a 413 on one file does not
//! stop the rest, and the batch reports partial success.

use std::path::{Path, PathBuf};

use bytes::Bytes;

use super::{Capability, KnowledgeBaseManager};
use crate::error::{classify_io_error, ErrorContext, KbResult, SystemError, ValidationError};
use crate::models::UploadResponse;
use crate::state::UploadProgress;
use crate::traits::MultipartFile;
use crate::validation::validate_name;

/// One file to upload.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadSource {
    /// Content already in memory.
    Memory {
        filename: String,
        content: Bytes,
        content_type: Option<String>,
    },
    /// A local file, read when its turn comes (native drops).
    Path(PathBuf),
}

impl UploadSource {
    pub fn memory(filename: impl Into<String>, content: impl Into<Bytes>) -> Self {
        UploadSource::Memory {
            filename: filename.into(),
            content: content.into(),
            content_type: None,
        }
    }

    pub fn path(path: impl Into<PathBuf>) -> Self {
        UploadSource::Path(path.into())
    }

    /// Name the file will be uploaded under.
    pub fn filename(&self) -> String {
        match self {
            UploadSource::Memory { filename, .. } => filename.clone(),
            UploadSource::Path(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        }
    }

    async fn into_multipart(self, filename: String) -> Result<MultipartFile, SystemError> {
        let (content, content_type) = match self {
            UploadSource::Memory {
                content,
                content_type,
                ..
            } => (content, content_type),
            UploadSource::Path(path) => {
                let metadata = tokio::fs::metadata(&path)
                    .await
                    .map_err(|e| classify_io_error(e, path.clone()))?;
                if !metadata.is_file() {
                    return Err(SystemError::NotAFile { path });
                }
                let content = tokio::fs::read(&path)
                    .await
                    .map_err(|e| classify_io_error(e, path.clone()))?;
                (Bytes::from(content), guess_content_type(&path))
            }
        };

        let file = MultipartFile::new(filename, content);
        Ok(match content_type {
            Some(ct) => file.with_content_type(ct),
            None => file,
        })
    }
}

fn guess_content_type(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    let mime = match ext.as_str() {
        "pdf" => "application/pdf",
        "txt" | "log" => "text/plain",
        "md" | "markdown" => "text/markdown",
        "csv" => "text/csv",
        "json" => "application/json",
        "html" | "htm" => "text/html",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => return None,
    };
    Some(mime.to_string())
}

/// Result for one file of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct FileUploadOutcome {
    pub filename: String,
    /// Server response on success
    pub response: Option<UploadResponse>,
    /// Notice text on failure
    pub error: Option<String>,
}

impl FileUploadOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcome of a whole batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchUploadReport {
    pub folder_id: String,
    pub outcomes: Vec<FileUploadOutcome>,
}

impl BatchUploadReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Files answered with a 2xx.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }

    /// Summary line: `Uploaded 2 files`, `Uploaded 1 of 2 files` or
    /// `Failed to upload files`.
    pub fn summary(&self) -> String {
        let (ok, total) = (self.succeeded(), self.total());
        if ok == 0 {
            "Failed to upload files".to_string()
        } else if ok == total {
            if total == 1 {
                "Uploaded 1 file".to_string()
            } else {
                format!("Uploaded {} files", total)
            }
        } else {
            format!("Uploaded {} of {} files", ok, total)
        }
    }
}

impl KnowledgeBaseManager {
    /// Upload files into a folder one after another.
    ///
    /// Progress is published in `transient.uploads` while the batch runs.
    /// Per-file failures are reported as they happen and collected in the
    /// report; the call itself fails only when the batch cannot start, e.g.
    /// while another batch into the same folder is still running.
    pub async fn upload_files(
        &self,
        folder_id: &str,
        sources: Vec<UploadSource>,
    ) -> KbResult<BatchUploadReport> {
        self.require(Capability::Upload)?;
        self.require_folder(folder_id)?;

        let total = sources.len();
        let mut report = BatchUploadReport {
            folder_id: folder_id.to_string(),
            outcomes: Vec::with_capacity(total),
        };
        if total == 0 {
            return Ok(report);
        }

        // One batch per folder; claimed atomically like a move
        let first_name = sources[0].filename();
        let claimed = self.update(|s| {
            if s.transient.uploads.contains_key(folder_id) {
                return false;
            }
            s.transient.uploads.insert(
                folder_id.to_string(),
                UploadProgress {
                    current_file: first_name,
                    completed: 0,
                    total,
                },
            );
            true
        });
        if !claimed {
            let err = ValidationError::UploadInProgress {
                folder_id: folder_id.to_string(),
            };
            return Err(self.report(
                "upload files",
                err.into(),
                ErrorContext::new("upload_files").with_folder(folder_id),
            ));
        }
        tracing::info!("Uploading {} file(s) to folder {}", total, folder_id);

        for (index, source) in sources.into_iter().enumerate() {
            let display_name = source.filename();
            self.update(|s| {
                if let Some(progress) = s.transient.uploads.get_mut(folder_id) {
                    progress.current_file = display_name.clone();
                    progress.completed = index;
                }
            });

            let outcome = self.upload_one(folder_id, source, display_name).await;
            report.outcomes.push(outcome);
        }

        self.update(|s| s.transient.uploads.remove(folder_id));

        let summary = report.summary();
        if report.succeeded() == 0 {
            self.notifier.error(summary);
        } else {
            self.notifier.success(summary);
            let _ = self.load_folder_entries(folder_id).await;
            let _ = self.refetch_folders().await;
        }
        tracing::info!(
            "Upload to {} finished: {}/{} succeeded",
            folder_id,
            report.succeeded(),
            total
        );
        Ok(report)
    }

    /// Upload local files dropped onto a folder from the operating system.
    pub async fn upload_paths(
        &self,
        folder_id: &str,
        paths: Vec<PathBuf>,
    ) -> KbResult<BatchUploadReport> {
        let sources = paths.into_iter().map(UploadSource::Path).collect();
        self.upload_files(folder_id, sources).await
    }

    async fn upload_one(
        &self,
        folder_id: &str,
        source: UploadSource,
        display_name: String,
    ) -> FileUploadOutcome {
        let action = format!("upload {}", display_name);
        let ctx = ErrorContext::new("upload_file").with_folder(folder_id);
        let failed = |message: String| FileUploadOutcome {
            filename: display_name.clone(),
            response: None,
            error: Some(message),
        };

        let filename = match validate_name(&display_name) {
            Ok(name) => name,
            Err(e) => {
                let err = self.report(&action, e.into(), ctx);
                return failed(err.notice_message(&action));
            }
        };

        let file = match source.into_multipart(filename).await {
            Ok(file) => file,
            Err(e) => {
                let err = self.report(&action, e.into(), ctx);
                return failed(err.notice_message(&action));
            }
        };

        match self.api.upload_file(folder_id, file).await {
            Ok(response) => {
                if response.filename_changed {
                    let original = response
                        .original_filename
                        .clone()
                        .unwrap_or_else(|| display_name.clone());
                    let renamed = response
                        .final_filename
                        .clone()
                        .or_else(|| response.entry.as_ref().map(|e| e.filename.clone()))
                        .unwrap_or_default();
                    self.notifier.info(format!(
                        "\"{}\" already existed and was saved as \"{}\"",
                        original, renamed
                    ));
                }
                tracing::debug!("Uploaded {} to {}", display_name, folder_id);
                FileUploadOutcome {
                    filename: display_name.clone(),
                    response: Some(response),
                    error: None,
                }
            }
            Err(e) => {
                let err = self.report(&action, e, ctx);
                failed(err.notice_message(&action))
            }
        }
    }
}
