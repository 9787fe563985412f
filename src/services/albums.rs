use crate::catalog::{CatalogAlbum, CatalogClient};
use crate::models::{AlbumMeta, AlbumView};
use crate::Database;
use anyhow::Result;

fn album_meta_from_row(row: &rusqlite::Row) -> rusqlite::Result<AlbumMeta> {
    Ok(AlbumMeta {
        catalog_id: row.get(0)?,
        description: row.get(1)?,
        featured: row.get(2)?,
        sort_order: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

pub fn list_album_meta(db: &Database) -> Result<Vec<AlbumMeta>> {
    let conn = db.get()?;
    let mut stmt = conn.prepare(
        "SELECT catalog_id, description, featured, sort_order, created_at, updated_at FROM albums",
    )?;
    let meta = stmt
        .query_map([], album_meta_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(meta)
}

/// Merges catalog albums with their local overlays. Albums the overlay
/// table has never seen fall back to empty editable fields.
pub fn merge_albums(items: Vec<CatalogAlbum>, meta: &[AlbumMeta]) -> Vec<AlbumView> {
    items
        .into_iter()
        .map(|a| {
            let local = meta.iter().find(|m| m.catalog_id == a.id);
            AlbumView {
                image: a.images.first().map(|i| i.url.clone()),
                url: a.external_urls.spotify.unwrap_or_default(),
                release_date: a.release_date,
                name: a.name,
                description: local.map(|m| m.description.clone()).unwrap_or_default(),
                featured: local.map(|m| m.featured).unwrap_or(false),
                sort_order: local.map(|m| m.sort_order).unwrap_or(0),
                id: a.id,
            }
        })
        .collect()
}

/// Fetches the artist's discography and lazily creates an overlay row
/// for every catalog id seen, then merges the editable fields in.
pub async fn list_albums(db: &Database, catalog: &CatalogClient) -> Result<Vec<AlbumView>> {
    let items = catalog.artist_albums().await?;

    let conn = db.get()?;
    for album in &items {
        conn.execute(
            "INSERT INTO albums (catalog_id) VALUES (?) ON CONFLICT(catalog_id) DO NOTHING",
            [&album.id],
        )?;
    }
    drop(conn);

    let meta = list_album_meta(db)?;
    Ok(merge_albums(items, &meta))
}

/// Upserts the editable overlay; absent fields are left untouched.
pub fn update_album(
    db: &Database,
    catalog_id: &str,
    description: Option<&str>,
    featured: Option<bool>,
    sort_order: Option<i64>,
) -> Result<()> {
    let conn = db.get()?;
    conn.execute(
        "INSERT INTO albums (catalog_id, description, featured, sort_order)
         VALUES (?1, COALESCE(?2, ''), COALESCE(?3, 0), COALESCE(?4, 0))
         ON CONFLICT(catalog_id) DO UPDATE SET
            description = COALESCE(?2, description),
            featured = COALESCE(?3, featured),
            sort_order = COALESCE(?4, sort_order),
            updated_at = CURRENT_TIMESTAMP",
        rusqlite::params![catalog_id, description, featured, sort_order],
    )?;
    Ok(())
}
