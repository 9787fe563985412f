//! Client-side staging queue for photo submissions: validate each file
//! independently, then push the batch through a [`MediaSubmitter`] one
//! file at a time, tracking per-file progress and errors.

use crate::config::MediaConfig;
use crate::storage::BlobStore;
use crate::Database;
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct UploadRules {
    pub allowed_types: Vec<String>,
    pub max_bytes: usize,
}

impl UploadRules {
    pub fn from_config(cfg: &MediaConfig) -> Self {
        Self {
            allowed_types: cfg.allowed_types.clone(),
            max_bytes: cfg.max_upload_mb * 1024 * 1024,
        }
    }

    pub fn allows(&self, mime_type: &str) -> bool {
        self.allowed_types.iter().any(|t| t == mime_type)
    }

    /// `None` means the file is acceptable.
    pub fn validate(&self, mime_type: &str, size: usize) -> Option<String> {
        if !self.allows(mime_type) {
            return Some("Unsupported file type".to_string());
        }
        if size > self.max_bytes {
            return Some(format!("File exceeds {}MB", self.max_bytes / (1024 * 1024)));
        }
        None
    }
}

/// A file as handed to the queue, before validation.
pub struct StagedFile {
    pub name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// A staged file plus its queue state. `progress` is an integer
/// percentage; an entry carrying `error` is never submitted.
pub struct QueuedFile {
    pub id: Uuid,
    pub name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
    pub progress: u8,
    pub error: Option<String>,
}

/// Transport seam for one file. Implementations report transfer progress
/// as `(bytes_sent, bytes_total)` through the callback.
#[async_trait]
pub trait MediaSubmitter: Send {
    async fn submit(
        &mut self,
        event_id: i64,
        name: &str,
        mime_type: &str,
        data: &[u8],
        progress: &mut (dyn FnMut(u64, u64) + Send),
    ) -> Result<String>;
}

#[derive(Debug)]
pub struct UploadOutcome {
    pub id: Uuid,
    pub name: String,
    pub blob_url: Option<String>,
    pub error: Option<String>,
}

pub struct UploadQueue {
    event_id: i64,
    rules: UploadRules,
    items: Vec<QueuedFile>,
}

impl UploadQueue {
    pub fn new(event_id: i64, rules: UploadRules) -> Self {
        Self {
            event_id,
            rules,
            items: Vec::new(),
        }
    }

    /// Stages files without touching existing entries. Files failing
    /// validation are kept in the queue with an error attached.
    pub fn enqueue<I>(&mut self, files: I)
    where
        I: IntoIterator<Item = StagedFile>,
    {
        for file in files {
            let error = self.rules.validate(&file.mime_type, file.data.len());
            self.items.push(QueuedFile {
                id: Uuid::new_v4(),
                name: file.name,
                mime_type: file.mime_type,
                data: file.data,
                progress: 0,
                error,
            });
        }
    }

    /// Removes one staged file. Already-uploaded files are unaffected;
    /// the queue only ever holds not-yet-submitted entries.
    pub fn dequeue(&mut self, id: Uuid) {
        self.items.retain(|f| f.id != id);
    }

    pub fn items(&self) -> &[QueuedFile] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Submits the queue strictly sequentially in insertion order.
    /// Entries with a validation error are skipped without a submitter
    /// call; a transport failure annotates its entry and the batch
    /// continues. The queue is cleared when the batch ends, so callers
    /// should refresh the persisted gallery afterwards.
    pub async fn upload_all(&mut self, submitter: &mut dyn MediaSubmitter) -> Vec<UploadOutcome> {
        let mut outcomes = Vec::with_capacity(self.items.len());

        for item in &mut self.items {
            if let Some(error) = item.error.clone() {
                outcomes.push(UploadOutcome {
                    id: item.id,
                    name: item.name.clone(),
                    blob_url: None,
                    error: Some(error),
                });
                continue;
            }

            let QueuedFile {
                id,
                name,
                mime_type,
                data,
                progress,
                error,
            } = item;

            let mut on_progress = |sent: u64, total: u64| {
                *progress = if total == 0 {
                    100
                } else {
                    ((sent.min(total) * 100) / total) as u8
                };
            };

            let result = submitter
                .submit(self.event_id, name, mime_type, data, &mut on_progress)
                .await;

            match result {
                Ok(url) => outcomes.push(UploadOutcome {
                    id: *id,
                    name: name.clone(),
                    blob_url: Some(url),
                    error: None,
                }),
                Err(e) => {
                    let message = e.to_string();
                    *error = Some(message.clone());
                    outcomes.push(UploadOutcome {
                        id: *id,
                        name: name.clone(),
                        blob_url: None,
                        error: Some(message),
                    });
                }
            }
        }

        self.items.clear();
        outcomes
    }
}

/// In-process submitter: runs each file through the full pipeline
/// (validate, store, record as pending).
pub struct ServiceSubmitter<'a> {
    pub db: &'a Database,
    pub store: &'a dyn BlobStore,
    pub rules: UploadRules,
}

#[async_trait]
impl MediaSubmitter for ServiceSubmitter<'_> {
    async fn submit(
        &mut self,
        event_id: i64,
        name: &str,
        mime_type: &str,
        data: &[u8],
        progress: &mut (dyn FnMut(u64, u64) + Send),
    ) -> Result<String> {
        let total = data.len() as u64;
        progress(0, total);

        let item =
            super::media::submit_media(self.db, self.store, &self.rules, event_id, name, mime_type, data)
                .await?;

        progress(total, total);
        Ok(item.blob_url)
    }
}
