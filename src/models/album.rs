use serde::Serialize;

/// Locally editable overlay for a catalog album. Rows are created lazily
/// the first time the album shows up in a catalog listing.
#[derive(Debug, Clone, Serialize)]
pub struct AlbumMeta {
    pub catalog_id: String,
    pub description: String,
    pub featured: bool,
    pub sort_order: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Catalog album merged with its local overlay, as served to clients.
#[derive(Debug, Clone, Serialize)]
pub struct AlbumView {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub release_date: String,
    pub url: String,
    pub description: String,
    pub featured: bool,
    pub sort_order: i64,
}
