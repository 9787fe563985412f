use crate::models::{User, UserRole};
use crate::Database;
use anyhow::Result;

use super::auth;

const MAX_EMAIL_LENGTH: usize = 254;

fn validate_email(email: &str) -> Result<()> {
    if email.is_empty() {
        anyhow::bail!("Email cannot be empty");
    }
    if email.len() > MAX_EMAIL_LENGTH {
        anyhow::bail!("Email must be {} characters or less", MAX_EMAIL_LENGTH);
    }
    if !email.contains('@') || !email.contains('.') {
        anyhow::bail!("Invalid email format");
    }
    Ok(())
}

pub(crate) fn user_from_row(row: &rusqlite::Row) -> rusqlite::Result<User> {
    let role: String = row.get(4)?;
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        password_hash: row.get(3)?,
        role: role.parse().unwrap_or(UserRole::Editor),
        is_band_member: row.get(5)?,
        display_name: row.get(6)?,
        bio: row.get(7)?,
        image: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

const USER_COLUMNS: &str = "id, email, name, password_hash, role, is_band_member,
                            display_name, bio, image, created_at, updated_at";

#[derive(Debug, Default)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password: String,
    pub role: Option<UserRole>,
    pub is_band_member: bool,
    pub display_name: String,
    pub bio: String,
    pub image: String,
}

pub fn create_user(db: &Database, new: NewUser) -> Result<User> {
    validate_email(&new.email)?;

    if get_user_by_email(db, &new.email)?.is_some() {
        anyhow::bail!("User already exists");
    }

    let password_hash = auth::hash_password(&new.password)?;
    let role = new.role.unwrap_or(UserRole::Editor);

    let conn = db.get()?;
    conn.execute(
        "INSERT INTO users (email, name, password_hash, role, is_band_member, display_name, bio, image)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            new.email,
            new.name,
            password_hash,
            role.to_string(),
            new.is_band_member,
            new.display_name.trim(),
            new.bio,
            new.image,
        ],
    )?;
    let id = conn.last_insert_rowid();
    drop(conn);

    get_user(db, id)?.ok_or_else(|| anyhow::anyhow!("User vanished after insert"))
}

pub fn get_user(db: &Database, id: i64) -> Result<Option<User>> {
    let conn = db.get()?;
    let user = conn
        .query_row(
            &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
            [id],
            user_from_row,
        )
        .ok();
    Ok(user)
}

pub fn get_user_by_email(db: &Database, email: &str) -> Result<Option<User>> {
    let conn = db.get()?;
    let user = conn
        .query_row(
            &format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS),
            [email],
            user_from_row,
        )
        .ok();
    Ok(user)
}

/// Newest first, matching the admin listing.
pub fn list_users(db: &Database) -> Result<Vec<User>> {
    let conn = db.get()?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM users ORDER BY created_at DESC, id DESC",
        USER_COLUMNS
    ))?;
    let users = stmt
        .query_map([], user_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(users)
}

#[derive(Debug, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub role: Option<UserRole>,
    pub password: Option<String>,
    pub is_band_member: Option<bool>,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
}

/// Partial update; absent fields are left untouched. Returns whether a
/// matching user existed.
pub fn update_user(db: &Database, id: i64, update: UpdateUser) -> Result<bool> {
    let password_hash = match update.password.as_deref() {
        Some(p) if !p.is_empty() => Some(auth::hash_password(p)?),
        _ => None,
    };

    let conn = db.get()?;
    let affected = conn.execute(
        "UPDATE users SET
            name = COALESCE(?1, name),
            role = COALESCE(?2, role),
            password_hash = COALESCE(?3, password_hash),
            is_band_member = COALESCE(?4, is_band_member),
            display_name = COALESCE(?5, display_name),
            bio = COALESCE(?6, bio),
            image = COALESCE(?7, image),
            updated_at = CURRENT_TIMESTAMP
         WHERE id = ?8",
        rusqlite::params![
            update.name,
            update.role.map(|r| r.to_string()),
            password_hash,
            update.is_band_member,
            update.display_name.map(|d| d.trim().to_string()),
            update.bio,
            update.image,
            id,
        ],
    )?;
    Ok(affected > 0)
}

pub fn delete_user(db: &Database, id: i64) -> Result<bool> {
    let conn = db.get()?;
    let affected = conn.execute("DELETE FROM users WHERE id = ?", [id])?;
    Ok(affected > 0)
}
