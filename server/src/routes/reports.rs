use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use civic::db::report_repo::{self, ReportFilter};
use civic::location::resolve_address;
use civic::records::{ReportStatus, StoredReport};
use civic::submission::ReportDraft;

use super::blocking;
use crate::error::AppError;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ReportCreated {
    pub success: bool,
    pub message: &'static str,
    pub report: StoredReport,
}

#[derive(Debug, Serialize)]
pub struct ReportList {
    pub success: bool,
    pub count: usize,
    pub reports: Vec<StoredReport>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub status: Option<ReportStatus>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: ReportStatus,
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<ReportDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<ReportCreated>), AppError> {
    let Json(draft) = body?;
    let mut payload = draft.validate()?;

    if let Some(location) = payload.location.as_mut() {
        if location.address.as_deref().map_or(true, |a| a.trim().is_empty()) {
            let address = resolve_address(
                state.geocoder.as_deref(),
                location.latitude,
                location.longitude,
            )
            .await;
            location.address = Some(address);
        }
    }

    let report = blocking(move || Ok(state.reports.store(&payload)?)).await?;
    log::info!(
        "Report {} filed: {}/{}",
        report.reference,
        report.category,
        report.sub_category
    );

    Ok((
        StatusCode::CREATED,
        Json(ReportCreated {
            success: true,
            message: "Report submitted successfully",
            report,
        }),
    ))
}

pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> Result<Json<ReportList>, AppError> {
    let Query(query) = query?;
    let filter = ReportFilter {
        status: query.status,
        limit: query.limit,
    };

    let reports = blocking(move || Ok(report_repo::list(&state.db, &filter)?)).await?;
    Ok(Json(ReportList {
        success: true,
        count: reports.len(),
        reports,
    }))
}

pub async fn get(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<ApiResponse<StoredReport>, AppError> {
    let report = blocking(move || Ok(report_repo::find_by_reference(&state.db, &reference)?))
        .await?
        .ok_or(AppError::NotFound("Report"))?;
    Ok(ApiResponse::ok(report))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(reference): Path<String>,
    body: Result<Json<StatusUpdate>, JsonRejection>,
) -> Result<ApiResponse<StoredReport>, AppError> {
    let Json(update) = body?;
    let report = blocking(move || {
        Ok(report_repo::update_status(
            &state.db,
            &reference,
            update.status,
            Utc::now(),
        )?)
    })
    .await?
    .ok_or(AppError::NotFound("Report"))?;

    log::info!("Report {} is now {}", report.reference, report.status);
    Ok(ApiResponse::ok(report))
}
