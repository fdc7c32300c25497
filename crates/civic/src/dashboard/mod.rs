//! Data shown on the citizen dashboard: headline stats, weekly activity,
//! tracked complaints and the contributor leaderboard.
//!
//! [`CivicData`] is the access interface; [`FixtureData`] serves a fixed
//! demo data set and [`StoreData`] computes everything from stored reports.

pub mod fixture;
pub mod store;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::DatabaseError;
use crate::records::ReportStatus;

pub use fixture::FixtureData;
pub use store::StoreData;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_reports: u64,
    pub resolved_issues: u64,
    pub pending_issues: u64,
    pub civic_points: u64,
}

/// Reports filed and resolved on one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityPoint {
    pub day: String,
    pub reports: u32,
    pub resolved: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineStage {
    pub stage: String,
    pub time: String,
    pub done: bool,
}

/// A report as tracked by its reporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub id: String,
    pub category: String,
    pub title: String,
    pub location: String,
    pub date: String,
    pub status: ReportStatus,
    pub timeline: Vec<TimelineStage>,
    pub is_emergency: bool,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub name: String,
    pub points: u64,
    pub avatar: String,
    /// The entry of the current user.
    pub active: bool,
}

/// Source of dashboard data.
pub trait CivicData: Send + Sync {
    fn stats(&self) -> Result<DashboardStats, DatabaseError>;

    /// Seven buckets, Monday first.
    fn weekly_activity(&self) -> Result<Vec<ActivityPoint>, DatabaseError>;

    /// Complaints, newest first. `None` returns every status.
    fn complaints(&self, status: Option<ReportStatus>) -> Result<Vec<Complaint>, DatabaseError>;

    /// Contributors by points, highest first, ranked from 1.
    fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, DatabaseError>;
}

pub(crate) const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Avatar text for a contributor: initials of the first two words, or a
/// single word as-is.
pub fn avatar(name: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    match words.as_slice() {
        [] => String::new(),
        [word] => word.to_string(),
        [first, second, ..] => first
            .chars()
            .take(1)
            .chain(second.chars().take(1))
            .flat_map(char::to_uppercase)
            .collect(),
    }
}

/// Coarse human wording of the time elapsed between `then` and `now`.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes == 1 {
        "1 minute ago".to_string()
    } else if hours < 1 {
        format!("{} minutes ago", minutes)
    } else if hours == 1 {
        "1 hour ago".to_string()
    } else if days < 1 {
        format!("{} hours ago", hours)
    } else if days == 1 {
        "Yesterday".to_string()
    } else if days < 7 {
        format!("{} days ago", days)
    } else {
        then.format("%d %b %Y").to_string()
    }
}
