use serde::Serialize;

/// A single fan-submitted event photo. `blob_url` is immutable after
/// creation; `approved` is the sole gate for public visibility.
#[derive(Debug, Clone, Serialize)]
pub struct MediaItem {
    pub id: i64,
    pub event_id: i64,
    pub blob_url: String,
    pub approved: bool,
    pub created_at: String,
}

/// Moderation-queue entry: a pending item annotated with the title of its
/// owning event. `event_title` is `None` when the event has been deleted;
/// callers fall back to showing the raw `event_id`.
#[derive(Debug, Clone, Serialize)]
pub struct PendingMedia {
    pub id: i64,
    pub event_id: i64,
    pub blob_url: String,
    pub created_at: String,
    pub event_title: Option<String>,
}
