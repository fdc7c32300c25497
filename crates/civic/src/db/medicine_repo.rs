//! Medicine repository.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};

use crate::records::{DoseLog, Medicine};

use super::{
    format_timestamp, get_json, get_optional_timestamp, get_timestamp, to_json, Database,
    DatabaseError,
};

fn medicine_from_row(row: &Row<'_>) -> Result<Medicine, rusqlite::Error> {
    Ok(Medicine {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        name: row.get("name")?,
        dosage: row.get("dosage")?,
        frequency: row.get("frequency")?,
        timing: get_json(row, "timing")?,
        start_date: get_timestamp(row, "start_date")?,
        end_date: get_optional_timestamp(row, "end_date")?,
        purpose: row.get("purpose")?,
        side_effects: get_json(row, "side_effects")?,
        instructions: row.get("instructions")?,
        reminder_enabled: row.get("reminder_enabled")?,
        taken: get_json(row, "taken")?,
        created_at: get_timestamp(row, "created_at")?,
        updated_at: get_timestamp(row, "updated_at")?,
    })
}

pub fn insert(db: &Database, medicine: &Medicine) -> Result<(), DatabaseError> {
    let timing = to_json(&medicine.timing)?;
    let side_effects = to_json(&medicine.side_effects)?;
    let taken = to_json(&medicine.taken)?;
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO medicines (id, user_id, name, dosage, frequency, timing, start_date,
             end_date, purpose, side_effects, instructions, reminder_enabled, taken,
             created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                medicine.id,
                medicine.user_id,
                medicine.name,
                medicine.dosage,
                medicine.frequency,
                timing,
                format_timestamp(&medicine.start_date),
                medicine.end_date.as_ref().map(format_timestamp),
                medicine.purpose,
                side_effects,
                medicine.instructions,
                medicine.reminder_enabled,
                taken,
                format_timestamp(&medicine.created_at),
                format_timestamp(&medicine.updated_at),
            ],
        )?;
        Ok(())
    })
}

pub fn find_by_id(db: &Database, id: &str) -> Result<Option<Medicine>, DatabaseError> {
    db.with_conn(|conn| {
        let medicine = conn
            .query_row(
                "SELECT * FROM medicines WHERE id = ?1",
                params![id],
                medicine_from_row,
            )
            .optional()?;
        Ok(medicine)
    })
}

/// A user's medicines, most recently started first.
pub fn find_by_user(db: &Database, user_id: &str) -> Result<Vec<Medicine>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn
            .prepare("SELECT * FROM medicines WHERE user_id = ?1 ORDER BY start_date DESC")?;
        let medicines = stmt
            .query_map(params![user_id], medicine_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(medicines)
    })
}

/// Medicines the user is currently taking.
pub fn active(
    db: &Database,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<Vec<Medicine>, DatabaseError> {
    // Timestamps can carry different fractional precisions, so the period
    // check runs on parsed values.
    Ok(find_by_user(db, user_id)?
        .into_iter()
        .filter(|m| m.is_active(now))
        .collect())
}

/// Overwrites every field except `id`, `user_id`, the dose log and `created_at`.
pub fn update(db: &Database, medicine: &Medicine) -> Result<(), DatabaseError> {
    let timing = to_json(&medicine.timing)?;
    let side_effects = to_json(&medicine.side_effects)?;
    db.with_conn(|conn| {
        conn.execute(
            "UPDATE medicines SET name=?2, dosage=?3, frequency=?4, timing=?5, start_date=?6,
             end_date=?7, purpose=?8, side_effects=?9, instructions=?10, reminder_enabled=?11,
             updated_at=?12
             WHERE id=?1",
            params![
                medicine.id,
                medicine.name,
                medicine.dosage,
                medicine.frequency,
                timing,
                format_timestamp(&medicine.start_date),
                medicine.end_date.as_ref().map(format_timestamp),
                medicine.purpose,
                side_effects,
                medicine.instructions,
                medicine.reminder_enabled,
                format_timestamp(&medicine.updated_at),
            ],
        )?;
        Ok(())
    })
}

/// Appends a dose log entry. Returns the updated medicine, or `None` if it
/// does not exist.
pub fn mark_taken(
    db: &Database,
    id: &str,
    entry: DoseLog,
    now: DateTime<Utc>,
) -> Result<Option<Medicine>, DatabaseError> {
    let Some(mut medicine) = find_by_id(db, id)? else {
        return Ok(None);
    };
    medicine.taken.push(entry);
    medicine.updated_at = now;

    let taken = to_json(&medicine.taken)?;
    db.with_conn(|conn| {
        conn.execute(
            "UPDATE medicines SET taken=?2, updated_at=?3 WHERE id=?1",
            params![id, taken, format_timestamp(&medicine.updated_at)],
        )?;
        Ok(())
    })?;
    Ok(Some(medicine))
}

/// Deletes a medicine. Returns whether a row was removed.
pub fn delete(db: &Database, id: &str) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let removed = conn.execute("DELETE FROM medicines WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    })
}
