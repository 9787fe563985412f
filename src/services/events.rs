use crate::models::{Event, EventWithMedia};
use crate::Database;
use anyhow::Result;

use super::media;

fn event_from_row(row: &rusqlite::Row) -> rusqlite::Result<Event> {
    Ok(Event {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        location: row.get(3)?,
        date: row.get(4)?,
        link: row.get(5)?,
        image: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

const EVENT_COLUMNS: &str =
    "id, title, description, location, date, link, image, created_at, updated_at";

/// Every event, newest date first, with its approved gallery attached.
pub fn list_events(db: &Database) -> Result<Vec<EventWithMedia>> {
    let conn = db.get()?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM events ORDER BY date DESC, id DESC",
        EVENT_COLUMNS
    ))?;
    let events = stmt
        .query_map([], event_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    drop(stmt);
    drop(conn);

    events
        .into_iter()
        .map(|event| {
            let media = media::list_approved(db, event.id)?;
            Ok(EventWithMedia { event, media })
        })
        .collect()
}

pub fn get_event(db: &Database, id: i64) -> Result<Option<Event>> {
    let conn = db.get()?;
    let event = conn
        .query_row(
            &format!("SELECT {} FROM events WHERE id = ?", EVENT_COLUMNS),
            [id],
            event_from_row,
        )
        .ok();
    Ok(event)
}

#[derive(Debug, Default)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: String,
    pub link: String,
    pub image: String,
}

pub fn create_event(db: &Database, new: NewEvent) -> Result<Event> {
    if new.title.is_empty() || new.date.is_empty() {
        anyhow::bail!("Missing required fields");
    }

    let conn = db.get()?;
    conn.execute(
        "INSERT INTO events (title, description, location, date, link, image)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![new.title, new.description, new.location, new.date, new.link, new.image],
    )?;
    let id = conn.last_insert_rowid();
    drop(conn);

    get_event(db, id)?.ok_or_else(|| anyhow::anyhow!("Event vanished after insert"))
}

#[derive(Debug, Default)]
pub struct UpdateEvent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub link: Option<String>,
    pub image: Option<String>,
}

/// Partial update; returns whether a matching event existed.
pub fn update_event(db: &Database, id: i64, update: UpdateEvent) -> Result<bool> {
    let conn = db.get()?;
    let affected = conn.execute(
        "UPDATE events SET
            title = COALESCE(?1, title),
            description = COALESCE(?2, description),
            location = COALESCE(?3, location),
            date = COALESCE(?4, date),
            link = COALESCE(?5, link),
            image = COALESCE(?6, image),
            updated_at = CURRENT_TIMESTAMP
         WHERE id = ?7",
        rusqlite::params![
            update.title,
            update.description,
            update.location,
            update.date,
            update.link,
            update.image,
            id,
        ],
    )?;
    Ok(affected > 0)
}

/// Idempotent. Submissions referencing the event are left behind and
/// keep showing up in the moderation queue by raw id.
pub fn delete_event(db: &Database, id: i64) -> Result<bool> {
    let conn = db.get()?;
    let affected = conn.execute("DELETE FROM events WHERE id = ?", [id])?;
    Ok(affected > 0)
}
