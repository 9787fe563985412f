//! Fan-photo submission and moderation pipeline: bytes go to the blob
//! store, a pending record goes to the database, and moderators flip or
//! drop the record from there.

use crate::models::{MediaItem, PendingMedia};
use crate::storage::{self, BlobStore, Visibility};
use crate::Database;
use anyhow::Result;
use thiserror::Error;
use uuid::Uuid;

use super::upload::UploadRules;

#[derive(Debug, Error)]
pub enum MediaError {
    /// Bad file type or size; never reaches the blob store.
    #[error("{0}")]
    Validation(String),
    /// The storage collaborator refused the bytes.
    #[error("storage error: {0}")]
    Storage(anyhow::Error),
    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Validates, stores, and records one submission. The new record starts
/// unapproved and is invisible to the public gallery until a moderator
/// approves it.
pub async fn submit_media(
    db: &Database,
    store: &dyn BlobStore,
    rules: &UploadRules,
    event_id: i64,
    file_name: &str,
    mime_type: &str,
    data: &[u8],
) -> Result<MediaItem, MediaError> {
    if let Some(reason) = rules.validate(mime_type, data.len()) {
        return Err(MediaError::Validation(reason));
    }

    // The declared MIME type is client-controlled; refuse bytes that
    // positively sniff as something outside the allow-list.
    if let Some(kind) = infer::get(data) {
        if !rules.allows(kind.mime_type()) {
            return Err(MediaError::Validation("Unsupported file type".to_string()));
        }
    }

    let hint = format!(
        "events/{}/{}-{}",
        event_id,
        Uuid::new_v4(),
        storage::sanitize_segment(file_name)
    );

    let blob_url = store
        .put(&hint, data, Visibility::Public)
        .await
        .map_err(MediaError::Storage)?;

    let conn = db.get()?;
    conn.execute(
        "INSERT INTO media (event_id, blob_url) VALUES (?1, ?2)",
        rusqlite::params![event_id, blob_url],
    )?;
    let id = conn.last_insert_rowid();
    let created_at: String =
        conn.query_row("SELECT created_at FROM media WHERE id = ?", [id], |row| {
            row.get(0)
        })?;

    Ok(MediaItem {
        id,
        event_id,
        blob_url,
        approved: false,
        created_at,
    })
}

/// Moderation queue: every unapproved item, newest first, annotated with
/// the owning event's title when the event still exists.
pub fn list_pending(db: &Database) -> Result<Vec<PendingMedia>> {
    let conn = db.get()?;
    let mut stmt = conn.prepare(
        "SELECT m.id, m.event_id, m.blob_url, m.created_at, e.title
         FROM media m
         LEFT JOIN events e ON e.id = m.event_id
         WHERE m.approved = 0
         ORDER BY m.created_at DESC, m.id DESC",
    )?;
    let items = stmt
        .query_map([], |row| {
            Ok(PendingMedia {
                id: row.get(0)?,
                event_id: row.get(1)?,
                blob_url: row.get(2)?,
                created_at: row.get(3)?,
                event_title: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(items)
}

/// Public gallery: approved items for one event, newest first.
pub fn list_approved(db: &Database, event_id: i64) -> Result<Vec<MediaItem>> {
    let conn = db.get()?;
    let mut stmt = conn.prepare(
        "SELECT id, event_id, blob_url, approved, created_at
         FROM media
         WHERE event_id = ?1 AND approved = 1
         ORDER BY created_at DESC, id DESC",
    )?;
    let items = stmt
        .query_map([event_id], media_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(items)
}

fn media_from_row(row: &rusqlite::Row) -> rusqlite::Result<MediaItem> {
    Ok(MediaItem {
        id: row.get(0)?,
        event_id: row.get(1)?,
        blob_url: row.get(2)?,
        approved: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Flips a pending item public. Idempotent; returns whether a row
/// matched so callers can report a missing id without failing.
pub fn approve(db: &Database, id: i64) -> Result<bool> {
    let conn = db.get()?;
    let affected = conn.execute("UPDATE media SET approved = 1 WHERE id = ?", [id])?;
    Ok(affected > 0)
}

/// Deletes the record outright. The stored blob is left in place.
/// Deleting an already-deleted id is harmless.
pub fn reject(db: &Database, id: i64) -> Result<bool> {
    let conn = db.get()?;
    let affected = conn.execute("DELETE FROM media WHERE id = ?", [id])?;
    Ok(affected > 0)
}
