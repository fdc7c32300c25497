//! Doctor repository.

use rusqlite::{params, Row};

use crate::records::Doctor;

use super::{format_timestamp, get_json, get_timestamp, to_json, Database, DatabaseError};

pub(crate) fn doctor_from_row(row: &Row<'_>) -> Result<Doctor, rusqlite::Error> {
    Ok(Doctor {
        id: row.get("id")?,
        name: row.get("name")?,
        specialty: row.get("specialty")?,
        qualification: row.get("qualification")?,
        experience: row.get("experience")?,
        phone: row.get("phone")?,
        email: row.get("email")?,
        hospital: row.get("hospital")?,
        address: row.get("address")?,
        consultation_fee: row.get("consultation_fee")?,
        rating: row.get("rating")?,
        available_slots: get_json(row, "available_slots")?,
        created_at: get_timestamp(row, "created_at")?,
        updated_at: get_timestamp(row, "updated_at")?,
    })
}

pub fn insert(db: &Database, doctor: &Doctor) -> Result<(), DatabaseError> {
    let slots = to_json(&doctor.available_slots)?;
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO doctors (id, name, specialty, qualification, experience, phone, email,
             hospital, address, consultation_fee, rating, available_slots, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                doctor.id,
                doctor.name,
                doctor.specialty,
                doctor.qualification,
                doctor.experience,
                doctor.phone,
                doctor.email,
                doctor.hospital,
                doctor.address,
                doctor.consultation_fee,
                doctor.rating,
                slots,
                format_timestamp(&doctor.created_at),
                format_timestamp(&doctor.updated_at),
            ],
        )?;
        Ok(())
    })
}

pub fn find_by_id(db: &Database, id: &str) -> Result<Option<Doctor>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM doctors WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id], doctor_from_row)?;
        match rows.next() {
            Some(Ok(doctor)) => Ok(Some(doctor)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}

/// All doctors, best rated first.
pub fn list_by_rating(db: &Database) -> Result<Vec<Doctor>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM doctors ORDER BY rating DESC, name ASC")?;
        let doctors = stmt
            .query_map([], doctor_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(doctors)
    })
}

/// Doctors whose specialty contains `specialty`, ignoring case, best rated first.
///
/// Matching happens in Rust: SQLite's `lower()` folds ASCII only.
pub fn search_by_specialty(db: &Database, specialty: &str) -> Result<Vec<Doctor>, DatabaseError> {
    let needle = specialty.trim().to_lowercase();
    let doctors = list_by_rating(db)?
        .into_iter()
        .filter(|doctor| doctor.specialty.to_lowercase().contains(&needle))
        .collect();
    Ok(doctors)
}

/// Overwrites every field except `id` and `created_at`.
pub fn update(db: &Database, doctor: &Doctor) -> Result<(), DatabaseError> {
    let slots = to_json(&doctor.available_slots)?;
    db.with_conn(|conn| {
        conn.execute(
            "UPDATE doctors SET name=?2, specialty=?3, qualification=?4, experience=?5,
             phone=?6, email=?7, hospital=?8, address=?9, consultation_fee=?10, rating=?11,
             available_slots=?12, updated_at=?13
             WHERE id=?1",
            params![
                doctor.id,
                doctor.name,
                doctor.specialty,
                doctor.qualification,
                doctor.experience,
                doctor.phone,
                doctor.email,
                doctor.hospital,
                doctor.address,
                doctor.consultation_fee,
                doctor.rating,
                slots,
                format_timestamp(&doctor.updated_at),
            ],
        )?;
        Ok(())
    })
}
