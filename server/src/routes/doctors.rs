use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;

use civic::db::doctor_repo;
use civic::records::{Doctor, DoctorPatch, NewDoctor};

use super::blocking;
use crate::error::AppError;
use crate::response::ApiResponse;
use crate::state::AppState;

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<NewDoctor>, JsonRejection>,
) -> Result<(StatusCode, ApiResponse<Doctor>), AppError> {
    let Json(new_doctor) = body?;
    new_doctor.validate()?;
    let doctor = new_doctor.into_doctor(Utc::now());

    let doctor = blocking(move || {
        doctor_repo::insert(&state.db, &doctor)?;
        Ok(doctor)
    })
    .await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(doctor)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Doctor>, AppError> {
    let doctor = blocking(move || Ok(doctor_repo::find_by_id(&state.db, &id)?))
        .await?
        .ok_or(AppError::NotFound("Doctor"))?;
    Ok(ApiResponse::ok(doctor))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<DoctorPatch>, JsonRejection>,
) -> Result<ApiResponse<Doctor>, AppError> {
    let Json(patch) = body?;
    let doctor = blocking(move || {
        let mut doctor =
            doctor_repo::find_by_id(&state.db, &id)?.ok_or(AppError::NotFound("Doctor"))?;
        patch.apply(&mut doctor, Utc::now())?;
        doctor_repo::update(&state.db, &doctor)?;
        Ok(doctor)
    })
    .await?;
    Ok(ApiResponse::ok(doctor))
}
