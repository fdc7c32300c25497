use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;

use civic::db::health_repo;
use civic::records::{HealthRecord, HealthRecordPatch, NewHealthRecord};

use super::blocking;
use crate::error::AppError;
use crate::response::ApiResponse;
use crate::state::AppState;

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<NewHealthRecord>, JsonRejection>,
) -> Result<(StatusCode, ApiResponse<HealthRecord>), AppError> {
    let Json(new_record) = body?;
    new_record.validate()?;
    let record = new_record.into_record(Utc::now());

    let record = blocking(move || {
        health_repo::insert(&state.db, &record)?;
        Ok(record)
    })
    .await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(record)))
}

pub async fn by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse<Vec<HealthRecord>>, AppError> {
    let records = blocking(move || Ok(health_repo::find_by_user(&state.db, &user_id)?)).await?;
    Ok(ApiResponse::ok(records))
}

pub async fn vitals(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse<Vec<HealthRecord>>, AppError> {
    let records = blocking(move || Ok(health_repo::vitals(&state.db, &user_id)?)).await?;
    Ok(ApiResponse::ok(records))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<HealthRecordPatch>, JsonRejection>,
) -> Result<ApiResponse<HealthRecord>, AppError> {
    let Json(patch) = body?;
    let record = blocking(move || {
        let mut record = health_repo::find_by_id(&state.db, &id)?
            .ok_or(AppError::NotFound("Health record"))?;
        patch.apply(&mut record, Utc::now());
        health_repo::update(&state.db, &record)?;
        Ok(record)
    })
    .await?;
    Ok(ApiResponse::ok(record))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    if !blocking(move || Ok(health_repo::delete(&state.db, &id)?)).await? {
        return Err(AppError::NotFound("Health record"));
    }
    Ok(ApiResponse::done())
}
