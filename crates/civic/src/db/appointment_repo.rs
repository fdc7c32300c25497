//! Appointment repository.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};

use crate::records::{Appointment, AppointmentStatus, AppointmentWithDoctor};

use super::doctor_repo::doctor_from_row;
use super::{format_timestamp, get_date, get_parsed, get_timestamp, Database, DatabaseError};

fn appointment_from_row(row: &Row<'_>) -> Result<Appointment, rusqlite::Error> {
    Ok(Appointment {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        doctor_id: row.get("doctor_id")?,
        date: get_date(row, "date")?,
        time: row.get("time")?,
        kind: get_parsed(row, "kind")?,
        status: get_parsed(row, "status")?,
        reason: row.get("reason")?,
        notes: row.get("notes")?,
        prescription: row.get("prescription")?,
        created_at: get_timestamp(row, "created_at")?,
        updated_at: get_timestamp(row, "updated_at")?,
    })
}

pub fn insert(db: &Database, appointment: &Appointment) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO appointments (id, user_id, doctor_id, date, time, kind, status, reason,
             notes, prescription, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                appointment.id,
                appointment.user_id,
                appointment.doctor_id,
                appointment.date.to_string(),
                appointment.time,
                appointment.kind.id(),
                appointment.status.id(),
                appointment.reason,
                appointment.notes,
                appointment.prescription,
                format_timestamp(&appointment.created_at),
                format_timestamp(&appointment.updated_at),
            ],
        )?;
        Ok(())
    })
}

pub fn find_by_id(db: &Database, id: &str) -> Result<Option<Appointment>, DatabaseError> {
    db.with_conn(|conn| {
        let appointment = conn
            .query_row(
                "SELECT * FROM appointments WHERE id = ?1",
                params![id],
                appointment_from_row,
            )
            .optional()?;
        Ok(appointment)
    })
}

/// A user's appointments, latest date first, each with its doctor.
pub fn find_by_user(
    db: &Database,
    user_id: &str,
) -> Result<Vec<AppointmentWithDoctor>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT * FROM appointments WHERE user_id = ?1
             ORDER BY date DESC, time DESC, created_at DESC",
        )?;
        let appointments = stmt
            .query_map(params![user_id], appointment_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut doctor_stmt = conn.prepare("SELECT * FROM doctors WHERE id = ?1")?;
        let mut populated = Vec::with_capacity(appointments.len());
        for appointment in appointments {
            let doctor = doctor_stmt
                .query_row(params![appointment.doctor_id], doctor_from_row)
                .optional()?;
            populated.push(AppointmentWithDoctor {
                appointment,
                doctor,
            });
        }
        Ok(populated)
    })
}

/// Overwrites every field except `id`, the participants and `created_at`.
pub fn update(db: &Database, appointment: &Appointment) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "UPDATE appointments SET date=?2, time=?3, kind=?4, status=?5, reason=?6,
             notes=?7, prescription=?8, updated_at=?9
             WHERE id=?1",
            params![
                appointment.id,
                appointment.date.to_string(),
                appointment.time,
                appointment.kind.id(),
                appointment.status.id(),
                appointment.reason,
                appointment.notes,
                appointment.prescription,
                format_timestamp(&appointment.updated_at),
            ],
        )?;
        Ok(())
    })
}

/// Marks an appointment cancelled. The row is kept.
pub fn cancel(
    db: &Database,
    id: &str,
    now: DateTime<Utc>,
) -> Result<Option<Appointment>, DatabaseError> {
    let Some(mut appointment) = find_by_id(db, id)? else {
        return Ok(None);
    };
    appointment.status = AppointmentStatus::Cancelled;
    appointment.updated_at = now;
    update(db, &appointment)?;
    Ok(Some(appointment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::doctor_repo;
    use crate::db::doctor_repo::tests::make_doctor;
    use crate::records::AppointmentType;
    use chrono::NaiveDate;

    fn make_appointment(id: &str, doctor_id: &str, day: u32) -> Appointment {
        let now = Utc::now();
        Appointment {
            id: id.to_string(),
            user_id: "u1".to_string(),
            doctor_id: doctor_id.to_string(),
            date: NaiveDate::from_ymd_opt(2026, 11, day).unwrap(),
            time: "10:00".to_string(),
            kind: AppointmentType::Checkup,
            status: AppointmentStatus::Scheduled,
            reason: "Annual checkup".to_string(),
            notes: None,
            prescription: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_insert_and_find() {
        let db = Database::open_in_memory().unwrap();
        let appointment = make_appointment("a1", "d1", 3);
        insert(&db, &appointment).unwrap();
        assert_eq!(find_by_id(&db, "a1").unwrap(), Some(appointment));
        assert!(find_by_id(&db, "missing").unwrap().is_none());
    }

    #[test]
    fn test_find_by_user_populates_doctor() {
        let db = Database::open_in_memory().unwrap();
        doctor_repo::insert(&db, &make_doctor("d1", "Cardiology", 4.6)).unwrap();
        insert(&db, &make_appointment("a1", "d1", 3)).unwrap();
        insert(&db, &make_appointment("a2", "gone", 9)).unwrap();

        let mut other = make_appointment("a3", "d1", 5);
        other.user_id = "u2".to_string();
        insert(&db, &other).unwrap();

        let found = find_by_user(&db, "u1").unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].appointment.id, "a2");
        assert!(found[0].doctor.is_none());
        assert_eq!(found[1].appointment.id, "a1");
        assert_eq!(found[1].doctor.as_ref().unwrap().specialty, "Cardiology");
    }

    #[test]
    fn test_cancel_keeps_row() {
        let db = Database::open_in_memory().unwrap();
        insert(&db, &make_appointment("a1", "d1", 3)).unwrap();

        let cancelled = cancel(&db, "a1", Utc::now()).unwrap().unwrap();
        assert_eq!(cancelled.status, AppointmentStatus::Cancelled);

        let stored = find_by_id(&db, "a1").unwrap().unwrap();
        assert_eq!(stored.status, AppointmentStatus::Cancelled);
        assert!(cancel(&db, "missing", Utc::now()).unwrap().is_none());
    }

    #[test]
    fn test_update() {
        let db = Database::open_in_memory().unwrap();
        let mut appointment = make_appointment("a1", "d1", 3);
        insert(&db, &appointment).unwrap();

        appointment.status = AppointmentStatus::Completed;
        appointment.prescription = Some("Rest for a week".to_string());
        update(&db, &appointment).unwrap();

        let stored = find_by_id(&db, "a1").unwrap().unwrap();
        assert_eq!(stored.status, AppointmentStatus::Completed);
        assert_eq!(stored.prescription.as_deref(), Some("Rest for a week"));
    }
}
