//! HTTP handlers, grouped by resource.

pub mod appointments;
pub mod dashboard;
pub mod doctors;
pub mod health;
pub mod medicines;
pub mod reports;
pub mod users;

use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use crate::error::AppError;

/// Runs store work off the async worker threads.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Civic Assistant API is running" }))
}

pub async fn connection_test() -> Json<Value> {
    Json(json!({
        "status": "success",
        "message": "Backend is connected!",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
