//! Object-storage seam. The media pipeline only ever sees [`BlobStore`];
//! the default implementation writes to the local filesystem and hands
//! back URLs under the configured public prefix.

use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

/// Durable blob storage contract.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores raw bytes under a path hint and returns a durable URL.
    /// Failures propagate to the caller as upload failures.
    async fn put(&self, path_hint: &str, data: &[u8], visibility: Visibility) -> Result<String>;
}

pub struct LocalBlobStore {
    root: PathBuf,
    url_prefix: String,
}

impl LocalBlobStore {
    pub fn new(root: PathBuf, url_prefix: String) -> Self {
        let url_prefix = url_prefix.trim_end_matches('/').to_string();
        Self { root, url_prefix }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    /// The whole upload root is served publicly, so `visibility` has no
    /// effect here; stores that distinguish can honor it.
    async fn put(&self, path_hint: &str, data: &[u8], _visibility: Visibility) -> Result<String> {
        let rel = sanitize_hint(path_hint)?.join("/");
        let target = self.root.join(&rel);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&target, data).await?;

        Ok(format!("{}/{}", self.url_prefix, rel))
    }
}

/// Rejects traversal and normalizes each path segment to a safe charset.
fn sanitize_hint(hint: &str) -> Result<Vec<String>> {
    if hint.is_empty() {
        anyhow::bail!("empty blob path hint");
    }
    let mut out = Vec::new();
    for segment in hint.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            anyhow::bail!("invalid blob path hint: {:?}", hint);
        }
        out.push(sanitize_segment(segment));
    }
    Ok(out)
}

pub(crate) fn sanitize_segment(segment: &str) -> String {
    segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}
