//! Fixed demo data set.

use crate::db::DatabaseError;
use crate::records::ReportStatus;

use super::{
    avatar, ActivityPoint, CivicData, Complaint, DashboardStats, LeaderboardEntry, TimelineStage,
};

/// Serves the same demo data on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureData;

fn stage(stage: &str, time: &str, done: bool) -> TimelineStage {
    TimelineStage {
        stage: stage.to_string(),
        time: time.to_string(),
        done,
    }
}

fn complaints() -> Vec<Complaint> {
    vec![
        Complaint {
            id: "DL-CIV-8291".to_string(),
            category: "Waste Management".to_string(),
            title: "Garbage Pile at Market Entrance".to_string(),
            location: "Sector 14, Dwarka".to_string(),
            date: "2 hours ago".to_string(),
            status: ReportStatus::Verifying,
            timeline: vec![
                stage("Reported", "10:30 AM", true),
                stage("AI Verification", "10:31 AM", true),
                stage("Authority Assigned", "Pending", false),
                stage("Resolved", "Pending", false),
            ],
            is_emergency: false,
            points: 50,
        },
        Complaint {
            id: "DL-CIV-3321".to_string(),
            category: "Water Supply".to_string(),
            title: "Pipeline Leakage on Main Road".to_string(),
            location: "Vasant Kunj Block C".to_string(),
            date: "Yesterday".to_string(),
            status: ReportStatus::InProgress,
            timeline: vec![
                stage("Reported", "Yesterday", true),
                stage("AI Verification", "Yesterday", true),
                stage("Authority Assigned", "DJB Unit 4", true),
                stage("Resolution in Progress", "Today", false),
            ],
            is_emergency: true,
            points: 100,
        },
        Complaint {
            id: "DL-CIV-1002".to_string(),
            category: "Street Light".to_string(),
            title: "Street Light Not Working".to_string(),
            location: "Saket Metro Station".to_string(),
            date: "3 Days Ago".to_string(),
            status: ReportStatus::Resolved,
            timeline: vec![
                stage("Reported", "3 days ago", true),
                stage("Assigned", "2 days ago", true),
                stage("Fixed", "Yesterday", true),
                stage("Closed", "Yesterday", true),
            ],
            is_emergency: false,
            points: 20,
        },
    ]
}

impl CivicData for FixtureData {
    fn stats(&self) -> Result<DashboardStats, DatabaseError> {
        Ok(DashboardStats {
            total_reports: 12,
            resolved_issues: 8,
            pending_issues: 4,
            civic_points: 450,
        })
    }

    fn weekly_activity(&self) -> Result<Vec<ActivityPoint>, DatabaseError> {
        let counts = [(2, 1), (1, 2), (3, 1), (2, 2), (1, 1), (2, 0), (1, 1)];
        Ok(super::WEEKDAYS
            .iter()
            .zip(counts)
            .map(|(day, (reports, resolved))| ActivityPoint {
                day: day.to_string(),
                reports,
                resolved,
            })
            .collect())
    }

    fn complaints(&self, status: Option<ReportStatus>) -> Result<Vec<Complaint>, DatabaseError> {
        Ok(complaints()
            .into_iter()
            .filter(|c| status.map_or(true, |s| c.status == s))
            .collect())
    }

    fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, DatabaseError> {
        let board = [
            ("Suresh Kumar", 4500),
            ("Priya Singh", 3820),
            ("You", 2450),
            ("Amit Verma", 2100),
        ];
        Ok(board
            .into_iter()
            .zip(1..)
            .map(|((name, points), rank)| LeaderboardEntry {
                rank,
                name: name.to_string(),
                points,
                avatar: avatar(name),
                active: name == "You",
            })
            .collect())
    }
}
