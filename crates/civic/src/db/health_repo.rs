//! Health record repository.

use rusqlite::{params, OptionalExtension, Row};

use crate::records::{HealthRecord, HealthRecordKind};

use super::{
    format_timestamp, get_json, get_parsed, get_timestamp, to_json, Database, DatabaseError,
};

/// Number of vital readings returned by [`vitals`].
pub const VITALS_LIMIT: u32 = 30;

fn record_from_row(row: &Row<'_>) -> Result<HealthRecord, rusqlite::Error> {
    Ok(HealthRecord {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        kind: get_parsed(row, "kind")?,
        date: get_timestamp(row, "date")?,
        vitals: get_json(row, "vitals")?,
        symptoms: get_json(row, "symptoms")?,
        diagnosis: row.get("diagnosis")?,
        notes: row.get("notes")?,
        attachments: get_json(row, "attachments")?,
        doctor_id: row.get("doctor_id")?,
        created_at: get_timestamp(row, "created_at")?,
        updated_at: get_timestamp(row, "updated_at")?,
    })
}

pub fn insert(db: &Database, record: &HealthRecord) -> Result<(), DatabaseError> {
    let vitals = record.vitals.as_ref().map(to_json).transpose()?;
    let symptoms = to_json(&record.symptoms)?;
    let attachments = to_json(&record.attachments)?;
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO health_records (id, user_id, kind, date, vitals, symptoms, diagnosis,
             notes, attachments, doctor_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                record.id,
                record.user_id,
                record.kind.id(),
                format_timestamp(&record.date),
                vitals,
                symptoms,
                record.diagnosis,
                record.notes,
                attachments,
                record.doctor_id,
                format_timestamp(&record.created_at),
                format_timestamp(&record.updated_at),
            ],
        )?;
        Ok(())
    })
}

pub fn find_by_id(db: &Database, id: &str) -> Result<Option<HealthRecord>, DatabaseError> {
    db.with_conn(|conn| {
        let record = conn
            .query_row(
                "SELECT * FROM health_records WHERE id = ?1",
                params![id],
                record_from_row,
            )
            .optional()?;
        Ok(record)
    })
}

/// All of a user's records, newest first.
pub fn find_by_user(db: &Database, user_id: &str) -> Result<Vec<HealthRecord>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT * FROM health_records WHERE user_id = ?1 ORDER BY date DESC, created_at DESC",
        )?;
        let records = stmt
            .query_map(params![user_id], record_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    })
}

/// The user's most recent vital readings, newest first.
pub fn vitals(db: &Database, user_id: &str) -> Result<Vec<HealthRecord>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT * FROM health_records WHERE user_id = ?1 AND kind = ?2
             ORDER BY date DESC, created_at DESC LIMIT ?3",
        )?;
        let records = stmt
            .query_map(
                params![user_id, HealthRecordKind::Vital.id(), VITALS_LIMIT],
                record_from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    })
}

/// Overwrites every field except `id`, `user_id` and `created_at`.
pub fn update(db: &Database, record: &HealthRecord) -> Result<(), DatabaseError> {
    let vitals = record.vitals.as_ref().map(to_json).transpose()?;
    let symptoms = to_json(&record.symptoms)?;
    let attachments = to_json(&record.attachments)?;
    db.with_conn(|conn| {
        conn.execute(
            "UPDATE health_records SET kind=?2, date=?3, vitals=?4, symptoms=?5, diagnosis=?6,
             notes=?7, attachments=?8, doctor_id=?9, updated_at=?10
             WHERE id=?1",
            params![
                record.id,
                record.kind.id(),
                format_timestamp(&record.date),
                vitals,
                symptoms,
                record.diagnosis,
                record.notes,
                attachments,
                record.doctor_id,
                format_timestamp(&record.updated_at),
            ],
        )?;
        Ok(())
    })
}

/// Deletes a record. Returns whether a row was removed.
pub fn delete(db: &Database, id: &str) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let removed = conn.execute("DELETE FROM health_records WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    })
}
