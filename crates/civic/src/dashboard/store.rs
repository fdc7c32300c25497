//! Dashboard data computed from stored reports.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, Utc};

use crate::db::report_repo::{self, ReportFilter};
use crate::db::{Database, DatabaseError};
use crate::records::{ReportStatus, StoredReport};

use super::{
    avatar, relative_time, ActivityPoint, CivicData, Complaint, DashboardStats,
    LeaderboardEntry, TimelineStage, WEEKDAYS,
};

/// Shown for complaints filed without a location.
const NO_LOCATION: &str = "Location not provided";

/// Dashboard data for one reporter, or for everyone when no reporter is set.
#[derive(Clone)]
pub struct StoreData {
    db: Database,
    reporter: Option<String>,
}

impl StoreData {
    pub fn new(db: Database) -> Self {
        Self { db, reporter: None }
    }

    /// Scopes stats and complaints to `reporter` and marks their
    /// leaderboard entry.
    pub fn with_reporter(mut self, reporter: impl Into<String>) -> Self {
        self.reporter = Some(reporter.into());
        self
    }

    fn reports(&self, status: Option<ReportStatus>) -> Result<Vec<StoredReport>, DatabaseError> {
        let filter = ReportFilter {
            status,
            limit: None,
        };
        let reports = report_repo::list(&self.db, &filter)?;
        Ok(match &self.reporter {
            Some(reporter) => reports
                .into_iter()
                .filter(|r| r.reporter.as_deref() == Some(reporter.as_str()))
                .collect(),
            None => reports,
        })
    }

    /// Activity for the Monday-to-Sunday week containing `now`.
    pub fn weekly_activity_at(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<ActivityPoint>, DatabaseError> {
        let today = now.date_naive();
        let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
        let bucket = |at: DateTime<Utc>| {
            let offset = (at.date_naive() - monday).num_days();
            (0..7).contains(&offset).then_some(offset as usize)
        };

        let mut reports = [0u32; 7];
        let mut resolved = [0u32; 7];
        for report in self.reports(None)? {
            if let Some(i) = bucket(report.created_at) {
                reports[i] += 1;
            }
            if let Some(i) = report.resolved_at.and_then(bucket) {
                resolved[i] += 1;
            }
        }

        Ok(WEEKDAYS
            .iter()
            .enumerate()
            .map(|(i, day)| ActivityPoint {
                day: day.to_string(),
                reports: reports[i],
                resolved: resolved[i],
            })
            .collect())
    }

    pub fn complaints_at(
        &self,
        status: Option<ReportStatus>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Complaint>, DatabaseError> {
        Ok(self
            .reports(status)?
            .iter()
            .map(|report| complaint(report, now))
            .collect())
    }
}

fn complaint(report: &StoredReport, now: DateTime<Utc>) -> Complaint {
    Complaint {
        id: report.reference.to_string(),
        category: report.category.name().to_string(),
        title: report.sub_category.label().to_string(),
        location: report
            .location
            .as_ref()
            .map(|l| l.display_address())
            .unwrap_or_else(|| NO_LOCATION.to_string()),
        date: relative_time(report.created_at, now),
        status: report.status,
        timeline: timeline(report, now),
        is_emergency: report.severity == crate::catalog::Severity::Critical,
        points: report.points(),
    }
}

/// Progress stages of a report. A stage is done once the status has
/// reached it.
fn timeline(report: &StoredReport, now: DateTime<Utc>) -> Vec<TimelineStage> {
    let reached = match report.status {
        ReportStatus::Pending => 1,
        ReportStatus::Verifying => 2,
        ReportStatus::InProgress => 3,
        ReportStatus::Resolved => 4,
    };
    let resolved_time = report
        .resolved_at
        .map(|at| relative_time(at, now))
        .unwrap_or_else(|| "Pending".to_string());

    [
        ("Reported", relative_time(report.created_at, now)),
        ("Verification", "Completed".to_string()),
        ("Authority Assigned", "Completed".to_string()),
        ("Resolved", resolved_time),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (stage, time))| {
        let done = i < reached;
        TimelineStage {
            stage: stage.to_string(),
            time: if done { time } else { "Pending".to_string() },
            done,
        }
    })
    .collect()
}

impl CivicData for StoreData {
    fn stats(&self) -> Result<DashboardStats, DatabaseError> {
        let reports = self.reports(None)?;
        let resolved = reports.iter().filter(|r| r.status.is_resolved()).count() as u64;
        let total = reports.len() as u64;
        Ok(DashboardStats {
            total_reports: total,
            resolved_issues: resolved,
            pending_issues: total - resolved,
            civic_points: reports.iter().map(|r| r.points() as u64).sum(),
        })
    }

    fn weekly_activity(&self) -> Result<Vec<ActivityPoint>, DatabaseError> {
        self.weekly_activity_at(Utc::now())
    }

    fn complaints(&self, status: Option<ReportStatus>) -> Result<Vec<Complaint>, DatabaseError> {
        self.complaints_at(status, Utc::now())
    }

    fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, DatabaseError> {
        let mut points: HashMap<String, u64> = HashMap::new();
        for report in report_repo::list(&self.db, &ReportFilter::default())? {
            if let Some(reporter) = report.reporter.clone() {
                *points.entry(reporter).or_default() += report.points() as u64;
            }
        }

        let mut board: Vec<(String, u64)> = points.into_iter().collect();
        board.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Ok(board
            .into_iter()
            .zip(1..)
            .map(|((name, points), rank)| LeaderboardEntry {
                rank,
                avatar: avatar(&name),
                active: self.reporter.as_deref() == Some(name.as_str()),
                name,
                points,
            })
            .collect())
    }
}
