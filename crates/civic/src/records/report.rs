//! A filed civic report as kept by the store.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{Category, Severity, SubCategory};
use crate::location::Location;
use crate::submission::{ReferenceNumber, ReportPayload};

use super::RecordError;

/// Lifecycle of a filed report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    #[default]
    Pending,
    Verifying,
    InProgress,
    Resolved,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 4] = [
        ReportStatus::Pending,
        ReportStatus::Verifying,
        ReportStatus::InProgress,
        ReportStatus::Resolved,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Verifying => "verifying",
            ReportStatus::InProgress => "in_progress",
            ReportStatus::Resolved => "resolved",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "Pending",
            ReportStatus::Verifying => "Verifying",
            ReportStatus::InProgress => "In Progress",
            ReportStatus::Resolved => "Resolved",
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, ReportStatus::Resolved)
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ReportStatus {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportStatus::ALL
            .into_iter()
            .find(|status| status.id() == s)
            .ok_or_else(|| RecordError::UnknownVariant {
                field: "status",
                value: s.to_string(),
            })
    }
}

/// A persisted report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredReport {
    pub reference: ReferenceNumber,
    pub category: Category,
    pub sub_category: SubCategory,
    pub description: String,
    pub severity: Severity,
    pub is_anonymous: bool,
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// Display name of the reporter. Always `None` for anonymous reports.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter: Option<String>,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl StoredReport {
    /// A freshly filed, pending report.
    pub fn new(
        reference: ReferenceNumber,
        payload: &ReportPayload,
        reporter: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let reporter = if payload.is_anonymous { None } else { reporter };
        Self {
            reference,
            category: payload.category,
            sub_category: payload.sub_category,
            description: payload.description.clone(),
            severity: payload.severity,
            is_anonymous: payload.is_anonymous,
            images: payload.images.clone(),
            location: payload.location.clone(),
            reporter,
            status: ReportStatus::Pending,
            created_at: now,
            updated_at: now,
            resolved_at: None,
        }
    }

    /// Civic points earned by this report.
    pub fn points(&self) -> u32 {
        self.severity.points()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::WasteIssue;

    fn payload(is_anonymous: bool) -> ReportPayload {
        ReportPayload {
            category: Category::Waste,
            sub_category: SubCategory::from(WasteIssue::DeadAnimal),
            description: "Dead dog on the roadside".to_string(),
            severity: Severity::High,
            is_anonymous,
            images: vec!["img-1".to_string()],
            location: None,
        }
    }

    #[test]
    fn test_status_round_trip() {
        for status in ReportStatus::ALL {
            assert_eq!(status.id().parse::<ReportStatus>().unwrap(), status);
        }
        assert!("closed".parse::<ReportStatus>().is_err());
        assert_eq!(ReportStatus::InProgress.label(), "In Progress");
    }

    #[test]
    fn test_new_report_is_pending() {
        let now = Utc::now();
        let reference = ReferenceNumber::parse("DL-CIV-42").unwrap();
        let report = StoredReport::new(reference, &payload(false), Some("Priya".into()), now);
        assert_eq!(report.status, ReportStatus::Pending);
        assert_eq!(report.reporter.as_deref(), Some("Priya"));
        assert_eq!(report.points(), 75);
        assert_eq!(report.created_at, now);
    }

    #[test]
    fn test_anonymous_report_drops_reporter() {
        let reference = ReferenceNumber::parse("DL-CIV-43").unwrap();
        let report = StoredReport::new(reference, &payload(true), Some("Priya".into()), Utc::now());
        assert_eq!(report.reporter, None);
    }
}
