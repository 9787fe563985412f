use crate::models::About;
use crate::Database;
use anyhow::Result;

/// Single-row table; the row is created empty on first read.
pub fn get_about(db: &Database) -> Result<About> {
    let conn = db.get()?;
    conn.execute("INSERT OR IGNORE INTO about (id) VALUES (1)", [])?;
    let about = conn.query_row(
        "SELECT description, image FROM about WHERE id = 1",
        [],
        |row| {
            Ok(About {
                description: row.get(0)?,
                image: row.get(1)?,
            })
        },
    )?;
    Ok(about)
}

/// Merge update: absent fields keep their current value.
pub fn update_about(
    db: &Database,
    description: Option<&str>,
    image: Option<&str>,
) -> Result<About> {
    // Make sure the row exists before updating it.
    get_about(db)?;

    let conn = db.get()?;
    conn.execute(
        "UPDATE about SET
            description = COALESCE(?1, description),
            image = COALESCE(?2, image)
         WHERE id = 1",
        rusqlite::params![description, image],
    )?;
    drop(conn);

    get_about(db)
}
