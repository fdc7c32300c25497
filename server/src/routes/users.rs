use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;

use civic::db::user_repo;
use civic::records::{NewUser, User, UserPatch};

use super::blocking;
use crate::error::AppError;
use crate::response::ApiResponse;
use crate::state::AppState;

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<NewUser>, JsonRejection>,
) -> Result<(StatusCode, ApiResponse<User>), AppError> {
    let Json(new_user) = body?;
    new_user.validate()?;
    let user = new_user.into_user(Utc::now());

    let user = blocking(move || {
        user_repo::insert(&state.db, &user)?;
        Ok(user)
    })
    .await?;
    log::info!("Created user {}", user.id);
    Ok((StatusCode::CREATED, ApiResponse::ok(user)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<User>, AppError> {
    let user = blocking(move || Ok(user_repo::find_by_id(&state.db, &id)?))
        .await?
        .ok_or(AppError::NotFound("User"))?;
    Ok(ApiResponse::ok(user))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UserPatch>, JsonRejection>,
) -> Result<ApiResponse<User>, AppError> {
    let Json(patch) = body?;
    let user = blocking(move || {
        let mut user = user_repo::find_by_id(&state.db, &id)?.ok_or(AppError::NotFound("User"))?;
        patch.apply(&mut user, Utc::now())?;
        user_repo::update(&state.db, &user)?;
        Ok(user)
    })
    .await?;
    Ok(ApiResponse::ok(user))
}
