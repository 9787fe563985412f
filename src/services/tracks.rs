use crate::catalog::{CatalogClient, CatalogTrack};
use crate::models::{TrackMeta, TrackView};
use crate::Database;
use anyhow::Result;

fn track_meta_from_row(row: &rusqlite::Row) -> rusqlite::Result<TrackMeta> {
    Ok(TrackMeta {
        catalog_id: row.get(0)?,
        video_url: row.get(1)?,
        created_at: row.get(2)?,
        updated_at: row.get(3)?,
    })
}

pub fn list_track_meta(db: &Database) -> Result<Vec<TrackMeta>> {
    let conn = db.get()?;
    let mut stmt =
        conn.prepare("SELECT catalog_id, video_url, created_at, updated_at FROM tracks")?;
    let meta = stmt
        .query_map([], track_meta_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(meta)
}

pub fn merge_tracks(items: Vec<CatalogTrack>, meta: &[TrackMeta]) -> Vec<TrackView> {
    items
        .into_iter()
        .map(|t| {
            let local = meta.iter().find(|m| m.catalog_id == t.id);
            TrackView {
                url: t.external_urls.spotify.unwrap_or_default(),
                name: t.name,
                duration_ms: t.duration_ms,
                track_number: t.track_number,
                video_url: local.map(|m| m.video_url.clone()).unwrap_or_default(),
                id: t.id,
            }
        })
        .collect()
}

/// Track listing for one album, with the same lazy overlay upsert the
/// album listing uses.
pub async fn list_album_tracks(
    db: &Database,
    catalog: &CatalogClient,
    album_id: &str,
) -> Result<Vec<TrackView>> {
    let items = catalog.album_tracks(album_id).await?;

    let conn = db.get()?;
    for track in &items {
        conn.execute(
            "INSERT INTO tracks (catalog_id) VALUES (?) ON CONFLICT(catalog_id) DO NOTHING",
            [&track.id],
        )?;
    }
    drop(conn);

    let meta = list_track_meta(db)?;
    Ok(merge_tracks(items, &meta))
}

pub fn update_track(db: &Database, catalog_id: &str, video_url: &str) -> Result<()> {
    let conn = db.get()?;
    conn.execute(
        "INSERT INTO tracks (catalog_id, video_url) VALUES (?1, ?2)
         ON CONFLICT(catalog_id) DO UPDATE SET
            video_url = ?2,
            updated_at = CURRENT_TIMESTAMP",
        rusqlite::params![catalog_id, video_url],
    )?;
    Ok(())
}
