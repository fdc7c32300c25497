use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;

use civic::db::{appointment_repo, doctor_repo};
use civic::records::{
    Appointment, AppointmentPatch, AppointmentWithDoctor, Doctor, NewAppointment,
};

use super::blocking;
use crate::error::AppError;
use crate::response::ApiResponse;
use crate::state::AppState;

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<NewAppointment>, JsonRejection>,
) -> Result<(StatusCode, ApiResponse<Appointment>), AppError> {
    let Json(new_appointment) = body?;
    new_appointment.validate()?;
    let appointment = new_appointment.into_appointment(Utc::now());

    let appointment = blocking(move || {
        appointment_repo::insert(&state.db, &appointment)?;
        Ok(appointment)
    })
    .await?;
    log::info!(
        "Booked appointment {} with doctor {}",
        appointment.id,
        appointment.doctor_id
    );
    Ok((StatusCode::CREATED, ApiResponse::ok(appointment)))
}

pub async fn by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse<Vec<AppointmentWithDoctor>>, AppError> {
    let appointments =
        blocking(move || Ok(appointment_repo::find_by_user(&state.db, &user_id)?)).await?;
    Ok(ApiResponse::ok(appointments))
}

pub async fn doctors(State(state): State<AppState>) -> Result<ApiResponse<Vec<Doctor>>, AppError> {
    let doctors = blocking(move || Ok(doctor_repo::list_by_rating(&state.db)?)).await?;
    Ok(ApiResponse::ok(doctors))
}

pub async fn doctors_by_specialty(
    State(state): State<AppState>,
    Path(specialty): Path<String>,
) -> Result<ApiResponse<Vec<Doctor>>, AppError> {
    let doctors =
        blocking(move || Ok(doctor_repo::search_by_specialty(&state.db, &specialty)?)).await?;
    Ok(ApiResponse::ok(doctors))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<AppointmentPatch>, JsonRejection>,
) -> Result<ApiResponse<Appointment>, AppError> {
    let Json(patch) = body?;
    let appointment = blocking(move || {
        let mut appointment = appointment_repo::find_by_id(&state.db, &id)?
            .ok_or(AppError::NotFound("Appointment"))?;
        patch.apply(&mut appointment, Utc::now())?;
        appointment_repo::update(&state.db, &appointment)?;
        Ok(appointment)
    })
    .await?;
    Ok(ApiResponse::ok(appointment))
}

/// Cancels the appointment; the record is kept.
pub async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Appointment>, AppError> {
    let appointment = blocking(move || Ok(appointment_repo::cancel(&state.db, &id, Utc::now())?))
        .await?
        .ok_or(AppError::NotFound("Appointment"))?;
    log::info!("Cancelled appointment {}", appointment.id);
    Ok(ApiResponse::ok(appointment))
}
