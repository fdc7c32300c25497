use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use serde::Deserialize;

use civic::dashboard::{ActivityPoint, Complaint, DashboardStats, LeaderboardEntry};
use civic::records::ReportStatus;

use super::blocking;
use crate::error::AppError;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ComplaintQuery {
    /// A status id, or `all`.
    pub status: Option<String>,
}

impl ComplaintQuery {
    fn status(&self) -> Result<Option<ReportStatus>, AppError> {
        match self.status.as_deref() {
            None | Some("all") | Some("") => Ok(None),
            Some(s) => Ok(Some(s.parse()?)),
        }
    }
}

pub async fn stats(State(state): State<AppState>) -> Result<ApiResponse<DashboardStats>, AppError> {
    let stats = blocking(move || Ok(state.dashboard.stats()?)).await?;
    Ok(ApiResponse::ok(stats))
}

pub async fn activity(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<ActivityPoint>>, AppError> {
    let activity = blocking(move || Ok(state.dashboard.weekly_activity()?)).await?;
    Ok(ApiResponse::ok(activity))
}

pub async fn complaints(
    State(state): State<AppState>,
    query: Result<Query<ComplaintQuery>, QueryRejection>,
) -> Result<ApiResponse<Vec<Complaint>>, AppError> {
    let Query(query) = query?;
    let status = query.status()?;
    let complaints = blocking(move || Ok(state.dashboard.complaints(status)?)).await?;
    Ok(ApiResponse::ok(complaints))
}

pub async fn leaderboard(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<LeaderboardEntry>>, AppError> {
    let board = blocking(move || Ok(state.dashboard.leaderboard()?)).await?;
    Ok(ApiResponse::ok(board))
}
