use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;

use civic::db::medicine_repo;
use civic::records::{DoseLog, Medicine, MedicinePatch, NewMedicine};

use super::blocking;
use crate::error::AppError;
use crate::response::ApiResponse;
use crate::state::AppState;

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<NewMedicine>, JsonRejection>,
) -> Result<(StatusCode, ApiResponse<Medicine>), AppError> {
    let Json(new_medicine) = body?;
    new_medicine.validate()?;
    let medicine = new_medicine.into_medicine(Utc::now());

    let medicine = blocking(move || {
        medicine_repo::insert(&state.db, &medicine)?;
        Ok(medicine)
    })
    .await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(medicine)))
}

pub async fn by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse<Vec<Medicine>>, AppError> {
    let medicines =
        blocking(move || Ok(medicine_repo::find_by_user(&state.db, &user_id)?)).await?;
    Ok(ApiResponse::ok(medicines))
}

pub async fn active(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse<Vec<Medicine>>, AppError> {
    let medicines =
        blocking(move || Ok(medicine_repo::active(&state.db, &user_id, Utc::now())?)).await?;
    Ok(ApiResponse::ok(medicines))
}

pub async fn mark_taken(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<DoseLog>, JsonRejection>,
) -> Result<ApiResponse<Medicine>, AppError> {
    let Json(dose) = body?;
    let medicine = blocking(move || Ok(medicine_repo::mark_taken(&state.db, &id, dose, Utc::now())?))
        .await?
        .ok_or(AppError::NotFound("Medicine"))?;
    Ok(ApiResponse::ok(medicine))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<MedicinePatch>, JsonRejection>,
) -> Result<ApiResponse<Medicine>, AppError> {
    let Json(patch) = body?;
    let medicine = blocking(move || {
        let mut medicine =
            medicine_repo::find_by_id(&state.db, &id)?.ok_or(AppError::NotFound("Medicine"))?;
        patch.apply(&mut medicine, Utc::now())?;
        medicine_repo::update(&state.db, &medicine)?;
        Ok(medicine)
    })
    .await?;
    Ok(ApiResponse::ok(medicine))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    if !blocking(move || Ok(medicine_repo::delete(&state.db, &id)?)).await? {
        return Err(AppError::NotFound("Medicine"));
    }
    Ok(ApiResponse::done())
}
