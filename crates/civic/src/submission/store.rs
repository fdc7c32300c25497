//! Submission backed by the local report store.

use async_trait::async_trait;
use chrono::Utc;

use crate::db::{report_repo, Database, DatabaseError};
use crate::records::StoredReport;

use super::{ReferenceNumber, ReportPayload, SubmissionError, Submitter};

/// Fresh reference numbers tried before giving up on collisions.
const MAX_ATTEMPTS: usize = 5;

/// Persists each report as `pending` under a newly generated reference.
#[derive(Clone)]
pub struct StoreSubmitter {
    db: Database,
    prefix: String,
    reporter: Option<String>,
}

impl StoreSubmitter {
    pub fn new(db: Database, prefix: impl Into<String>) -> Self {
        Self {
            db,
            prefix: prefix.into(),
            reporter: None,
        }
    }

    /// Attributes non-anonymous reports to `reporter`.
    pub fn with_reporter(mut self, reporter: impl Into<String>) -> Self {
        self.reporter = Some(reporter.into());
        self
    }

    /// Stores the payload synchronously. Used by the async `submit` and by
    /// callers already off the async runtime.
    pub fn store(&self, payload: &ReportPayload) -> Result<StoredReport, DatabaseError> {
        let mut attempt = 1;
        loop {
            let reference = ReferenceNumber::generate(&self.prefix);
            let report = StoredReport::new(reference, payload, self.reporter.clone(), Utc::now());
            match report_repo::insert(&self.db, &report) {
                Ok(()) => {
                    log::info!("Stored report {}", report.reference);
                    return Ok(report);
                }
                Err(DatabaseError::Conflict(_)) if attempt < MAX_ATTEMPTS => {
                    log::debug!(
                        "Reference {} already taken, retrying ({}/{})",
                        report.reference,
                        attempt,
                        MAX_ATTEMPTS
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl Submitter for StoreSubmitter {
    async fn submit(&self, payload: &ReportPayload) -> Result<ReferenceNumber, SubmissionError> {
        let this = self.clone();
        let payload = payload.clone();
        let report = tokio::task::spawn_blocking(move || this.store(&payload))
            .await
            .map_err(|e| SubmissionError::Store(e.to_string()))??;
        Ok(report.reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, PowerIssue, Severity, SubCategory};
    use crate::records::ReportStatus;

    fn payload(is_anonymous: bool) -> ReportPayload {
        ReportPayload {
            category: Category::Power,
            sub_category: SubCategory::from(PowerIssue::StreetLight),
            description: "Street light out for a week".to_string(),
            severity: Severity::Low,
            is_anonymous,
            images: vec![],
            location: None,
        }
    }

    #[tokio::test]
    async fn test_submit_persists_pending_report() {
        let db = Database::open_in_memory().unwrap();
        let submitter = StoreSubmitter::new(db.clone(), "DL-CIV").with_reporter("You");

        let reference = submitter.submit(&payload(false)).await.unwrap();
        assert_eq!(reference.prefix(), "DL-CIV");

        let stored = report_repo::find_by_reference(&db, reference.as_str())
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, ReportStatus::Pending);
        assert_eq!(stored.reporter.as_deref(), Some("You"));
        assert_eq!(stored.description, "Street light out for a week");
    }

    #[tokio::test]
    async fn test_anonymous_submit_has_no_reporter() {
        let db = Database::open_in_memory().unwrap();
        let submitter = StoreSubmitter::new(db.clone(), "DL-CIV").with_reporter("You");

        let reference = submitter.submit(&payload(true)).await.unwrap();
        let stored = report_repo::find_by_reference(&db, reference.as_str())
            .unwrap()
            .unwrap();
        assert_eq!(stored.reporter, None);
    }

    #[test]
    fn test_store_many_without_collision_errors() {
        let db = Database::open_in_memory().unwrap();
        let submitter = StoreSubmitter::new(db.clone(), "T");
        for _ in 0..50 {
            submitter.store(&payload(false)).unwrap();
        }
        assert_eq!(report_repo::count(&db, None).unwrap(), 50);
    }
}
