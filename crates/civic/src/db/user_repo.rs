//! User repository: CRUD for the `users` table.

use rusqlite::{params, Connection, Row};

use crate::records::User;

use super::{
    format_timestamp, get_date, get_parsed, get_timestamp, to_json, Database, DatabaseError,
};

fn user_from_row(row: &Row<'_>) -> Result<User, rusqlite::Error> {
    let emergency_contact: Option<String> = row.get("emergency_contact")?;
    let emergency_contact = emergency_contact
        .map(|raw| serde_json::from_str(&raw))
        .transpose()
        .map_err(|e| super::conversion_error(row, "emergency_contact", e))?;

    Ok(User {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        date_of_birth: get_date(row, "date_of_birth")?,
        gender: get_parsed(row, "gender")?,
        blood_group: row.get("blood_group")?,
        address: row.get("address")?,
        emergency_contact,
        created_at: get_timestamp(row, "created_at")?,
        updated_at: get_timestamp(row, "updated_at")?,
    })
}

fn email_conflict(user: &User) -> impl FnOnce(rusqlite::Error) -> DatabaseError + '_ {
    move |e| {
        if DatabaseError::is_unique_violation(&e) {
            DatabaseError::Conflict(format!("User with email {}", user.email))
        } else {
            DatabaseError::Sqlite(e)
        }
    }
}

/// Inserts a new user. A taken email address is a `Conflict`.
pub fn insert(db: &Database, user: &User) -> Result<(), DatabaseError> {
    let emergency_contact = user.emergency_contact.as_ref().map(to_json).transpose()?;
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO users (id, name, email, phone, date_of_birth, gender, blood_group,
             address, emergency_contact, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                user.id,
                user.name,
                user.email,
                user.phone,
                user.date_of_birth.to_string(),
                user.gender.id(),
                user.blood_group,
                user.address,
                emergency_contact,
                format_timestamp(&user.created_at),
                format_timestamp(&user.updated_at),
            ],
        )
        .map_err(email_conflict(user))?;
        Ok(())
    })
}

/// Overwrites every field except `id` and `created_at`.
pub fn update(db: &Database, user: &User) -> Result<(), DatabaseError> {
    let emergency_contact = user.emergency_contact.as_ref().map(to_json).transpose()?;
    db.with_conn(|conn| {
        conn.execute(
            "UPDATE users SET name=?2, email=?3, phone=?4, date_of_birth=?5, gender=?6,
             blood_group=?7, address=?8, emergency_contact=?9, updated_at=?10
             WHERE id=?1",
            params![
                user.id,
                user.name,
                user.email,
                user.phone,
                user.date_of_birth.to_string(),
                user.gender.id(),
                user.blood_group,
                user.address,
                emergency_contact,
                format_timestamp(&user.updated_at),
            ],
        )
        .map_err(email_conflict(user))?;
        Ok(())
    })
}

fn find_one(conn: &Connection, sql: &str, value: &str) -> Result<Option<User>, DatabaseError> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query_map(params![value], user_from_row)?;
    match rows.next() {
        Some(Ok(user)) => Ok(Some(user)),
        Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
        None => Ok(None),
    }
}

pub fn find_by_id(db: &Database, id: &str) -> Result<Option<User>, DatabaseError> {
    db.with_conn(|conn| find_one(conn, "SELECT * FROM users WHERE id = ?1", id))
}

/// Emails are stored lowercased; the lookup is case-insensitive.
pub fn find_by_email(db: &Database, email: &str) -> Result<Option<User>, DatabaseError> {
    let email = email.trim().to_lowercase();
    db.with_conn(|conn| find_one(conn, "SELECT * FROM users WHERE email = ?1", &email))
}
