//! Report repository: persistence for filed civic reports.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use crate::catalog::{Category, SubCategory};
use crate::location::Location;
use crate::records::{ReportStatus, StoredReport};

use super::{
    conversion_error, format_timestamp, get_json, get_optional_timestamp, get_parsed,
    get_timestamp, to_json, Database, DatabaseError,
};

/// Listing filter. Results are always newest first.
#[derive(Debug, Default, Clone)]
pub struct ReportFilter {
    pub status: Option<ReportStatus>,
    pub limit: Option<u64>,
}

fn report_from_row(row: &Row<'_>) -> Result<StoredReport, rusqlite::Error> {
    let category: Category = get_parsed(row, "category")?;
    let sub_category_id: String = row.get("sub_category")?;
    let sub_category = SubCategory::parse(category, &sub_category_id)
        .map_err(|e| conversion_error(row, "sub_category", e))?;

    let latitude: Option<f64> = row.get("latitude")?;
    let longitude: Option<f64> = row.get("longitude")?;
    let location = match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => Some(Location {
            latitude,
            longitude,
            accuracy: row.get::<_, Option<f64>>("accuracy")?.unwrap_or_default(),
            address: row.get("address")?,
        }),
        _ => None,
    };

    Ok(StoredReport {
        reference: get_parsed(row, "reference")?,
        category,
        sub_category,
        description: row.get("description")?,
        severity: get_parsed(row, "severity")?,
        is_anonymous: row.get("is_anonymous")?,
        images: get_json(row, "images")?,
        location,
        reporter: row.get("reporter")?,
        status: get_parsed(row, "status")?,
        created_at: get_timestamp(row, "created_at")?,
        updated_at: get_timestamp(row, "updated_at")?,
        resolved_at: get_optional_timestamp(row, "resolved_at")?,
    })
}

/// Inserts a new report. A reused reference number is a `Conflict`.
pub fn insert(db: &Database, report: &StoredReport) -> Result<(), DatabaseError> {
    let images = to_json(&report.images)?;
    let location = report.location.as_ref();
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO reports (reference, category, sub_category, description, severity,
             is_anonymous, images, latitude, longitude, accuracy, address, reporter, status,
             created_at, updated_at, resolved_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            params![
                report.reference.as_str(),
                report.category.id(),
                report.sub_category.id(),
                report.description,
                report.severity.id(),
                report.is_anonymous,
                images,
                location.map(|l| l.latitude),
                location.map(|l| l.longitude),
                location.map(|l| l.accuracy),
                location.and_then(|l| l.address.clone()),
                report.reporter,
                report.status.id(),
                format_timestamp(&report.created_at),
                format_timestamp(&report.updated_at),
                report.resolved_at.as_ref().map(format_timestamp),
            ],
        )
        .map_err(|e| {
            if DatabaseError::is_unique_violation(&e) {
                DatabaseError::Conflict(format!("Report {}", report.reference))
            } else {
                DatabaseError::Sqlite(e)
            }
        })?;
        Ok(())
    })
}

/// Finds a report by its reference number.
pub fn find_by_reference(
    db: &Database,
    reference: &str,
) -> Result<Option<StoredReport>, DatabaseError> {
    db.with_conn(|conn| find_in(conn, reference))
}

fn find_in(conn: &Connection, reference: &str) -> Result<Option<StoredReport>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT * FROM reports WHERE reference = ?1")?;
    let mut rows = stmt.query_map(params![reference], report_from_row)?;
    match rows.next() {
        Some(Ok(report)) => Ok(Some(report)),
        Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
        None => Ok(None),
    }
}

/// Lists reports matching the filter, newest first.
pub fn list(db: &Database, filter: &ReportFilter) -> Result<Vec<StoredReport>, DatabaseError> {
    db.with_conn(|conn| {
        let mut conditions = Vec::new();
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(status) = filter.status {
            conditions.push(format!("status = ?{}", param_values.len() + 1));
            param_values.push(Box::new(status.id()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        // SQLite treats a negative LIMIT as unbounded.
        let limit = filter
            .limit
            .map(|l| i64::try_from(l).unwrap_or(i64::MAX))
            .unwrap_or(-1);
        param_values.push(Box::new(limit));
        let query_sql = format!(
            "SELECT * FROM reports {} ORDER BY created_at DESC, reference DESC LIMIT ?{}",
            where_clause,
            param_values.len()
        );

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&query_sql)?;
        let reports = stmt
            .query_map(params_ref.as_slice(), report_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(reports)
    })
}

/// Moves a report to `status`. Entering `Resolved` stamps `resolved_at`;
/// leaving it clears the stamp. Returns the updated report, or `None` when
/// no report has that reference.
pub fn update_status(
    db: &Database,
    reference: &str,
    status: ReportStatus,
    now: DateTime<Utc>,
) -> Result<Option<StoredReport>, DatabaseError> {
    db.with_conn(|conn| {
        let Some(mut report) = find_in(conn, reference)? else {
            return Ok(None);
        };

        if status.is_resolved() {
            if !report.status.is_resolved() {
                report.resolved_at = Some(now);
            }
        } else {
            report.resolved_at = None;
        }
        report.status = status;
        report.updated_at = now;

        conn.execute(
            "UPDATE reports SET status = ?2, updated_at = ?3, resolved_at = ?4
             WHERE reference = ?1",
            params![
                reference,
                report.status.id(),
                format_timestamp(&report.updated_at),
                report.resolved_at.as_ref().map(format_timestamp),
            ],
        )?;
        Ok(Some(report))
    })
}

/// Counts reports, optionally restricted to one status.
pub fn count(db: &Database, status: Option<ReportStatus>) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let total: u64 = match status {
            Some(status) => conn.query_row(
                "SELECT COUNT(*) FROM reports WHERE status = ?1",
                params![status.id()],
                |r| r.get(0),
            )?,
            None => conn.query_row("SELECT COUNT(*) FROM reports", [], |r| r.get(0))?,
        };
        Ok(total)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Severity, WasteIssue, WaterIssue};
    use crate::submission::{ReferenceNumber, ReportPayload};
    use chrono::{Duration, TimeZone};

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
    }

    fn make_report(reference: &str, minutes: i64) -> StoredReport {
        let payload = ReportPayload {
            category: Category::Waste,
            sub_category: SubCategory::from(WasteIssue::GarbagePile),
            description: "Garbage pile blocking road".to_string(),
            severity: Severity::Medium,
            is_anonymous: false,
            images: vec!["photo-1.jpg".to_string()],
            location: Some(
                Location {
                    latitude: 28.6139,
                    longitude: 77.209,
                    accuracy: 12.0,
                    address: None,
                }
                .with_address("Connaught Place, New Delhi"),
            ),
        };
        StoredReport::new(
            ReferenceNumber::parse(reference).unwrap(),
            &payload,
            Some("Priya Singh".to_string()),
            base_time() + Duration::minutes(minutes),
        )
    }

    #[test]
    fn test_insert_and_find() {
        let db = Database::open_in_memory().unwrap();
        let report = make_report("DL-CIV-100", 0);
        insert(&db, &report).unwrap();

        let found = find_by_reference(&db, "DL-CIV-100").unwrap().unwrap();
        assert_eq!(found, report);
        assert_eq!(
            found.location.unwrap().address.as_deref(),
            Some("Connaught Place, New Delhi")
        );
    }

    #[test]
    fn test_find_nonexistent() {
        let db = Database::open_in_memory().unwrap();
        assert!(find_by_reference(&db, "DL-CIV-1").unwrap().is_none());
    }

    #[test]
    fn test_report_without_location() {
        let db = Database::open_in_memory().unwrap();
        let mut report = make_report("DL-CIV-5", 0);
        report.location = None;
        report.category = Category::Water;
        report.sub_category = SubCategory::from(WaterIssue::SewerBlockage);
        insert(&db, &report).unwrap();

        let found = find_by_reference(&db, "DL-CIV-5").unwrap().unwrap();
        assert_eq!(found.location, None);
        assert_eq!(found.sub_category, SubCategory::from(WaterIssue::SewerBlockage));
    }

    #[test]
    fn test_duplicate_reference_is_conflict() {
        let db = Database::open_in_memory().unwrap();
        insert(&db, &make_report("DL-CIV-7", 0)).unwrap();
        let err = insert(&db, &make_report("DL-CIV-7", 1)).unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));
    }

    #[test]
    fn test_list_newest_first_with_filter() {
        let db = Database::open_in_memory().unwrap();
        insert(&db, &make_report("DL-CIV-1", 0)).unwrap();
        insert(&db, &make_report("DL-CIV-2", 10)).unwrap();
        insert(&db, &make_report("DL-CIV-3", 5)).unwrap();
        update_status(&db, "DL-CIV-3", ReportStatus::Resolved, base_time()).unwrap();

        let all = list(&db, &ReportFilter::default()).unwrap();
        let refs: Vec<&str> = all.iter().map(|r| r.reference.as_str()).collect();
        assert_eq!(refs, vec!["DL-CIV-2", "DL-CIV-3", "DL-CIV-1"]);

        let pending = list(
            &db,
            &ReportFilter {
                status: Some(ReportStatus::Pending),
                limit: Some(1),
            },
        )
        .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].reference.as_str(), "DL-CIV-2");
    }

    #[test]
    fn test_update_status_stamps_resolution() {
        let db = Database::open_in_memory().unwrap();
        insert(&db, &make_report("DL-CIV-9", 0)).unwrap();

        let resolved_at = base_time() + Duration::hours(3);
        let report = update_status(&db, "DL-CIV-9", ReportStatus::Resolved, resolved_at)
            .unwrap()
            .unwrap();
        assert_eq!(report.resolved_at, Some(resolved_at));

        let stored = find_by_reference(&db, "DL-CIV-9").unwrap().unwrap();
        assert_eq!(stored.status, ReportStatus::Resolved);
        assert_eq!(stored.resolved_at, Some(resolved_at));

        let reopened = update_status(&db, "DL-CIV-9", ReportStatus::InProgress, resolved_at)
            .unwrap()
            .unwrap();
        assert_eq!(reopened.resolved_at, None);
    }

    #[test]
    fn test_list_with_oversized_limit() {
        let db = Database::open_in_memory().unwrap();
        insert(&db, &make_report("DL-CIV-1", 0)).unwrap();
        insert(&db, &make_report("DL-CIV-2", 1)).unwrap();

        let all = list(
            &db,
            &ReportFilter {
                status: None,
                limit: Some(u64::MAX),
            },
        )
        .unwrap();
        assert_eq!(all.len(), 2);

        let none = list(
            &db,
            &ReportFilter {
                status: None,
                limit: Some(0),
            },
        )
        .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_concurrent_resolutions_keep_first_stamp() {
        let db = Database::open_in_memory().unwrap();
        insert(&db, &make_report("DL-CIV-11", 0)).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let db = db.clone();
                std::thread::spawn(move || {
                    let at = base_time() + Duration::minutes(i);
                    update_status(&db, "DL-CIV-11", ReportStatus::Resolved, at)
                        .unwrap()
                        .unwrap()
                        .resolved_at
                })
            })
            .collect();
        let stamps: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let stored = find_by_reference(&db, "DL-CIV-11").unwrap().unwrap();
        assert!(stored.resolved_at.is_some());
        assert!(stamps.iter().all(|s| *s == stored.resolved_at));
    }

    #[test]
    fn test_update_status_missing_report() {
        let db = Database::open_in_memory().unwrap();
        let result = update_status(&db, "DL-CIV-404", ReportStatus::Verifying, Utc::now());
        assert!(result.unwrap().is_none());
    }

    #[test]
    fn test_count() {
        let db = Database::open_in_memory().unwrap();
        insert(&db, &make_report("DL-CIV-1", 0)).unwrap();
        insert(&db, &make_report("DL-CIV-2", 1)).unwrap();
        update_status(&db, "DL-CIV-1", ReportStatus::Resolved, Utc::now()).unwrap();

        assert_eq!(count(&db, None).unwrap(), 2);
        assert_eq!(count(&db, Some(ReportStatus::Resolved)).unwrap(), 1);
        assert_eq!(count(&db, Some(ReportStatus::Verifying)).unwrap(), 0);
    }
}
