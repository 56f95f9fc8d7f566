//! Medication endpoint.

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db;
use crate::models::Medication;

pub const FETCH_FAILED: &str = "Failed to fetch medications";

/// `GET /medications`: every medication with its ordered time list.
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<Medication>>, ApiError> {
    let conn = ctx
        .core
        .open_db()
        .map_err(|e| ApiError::query(FETCH_FAILED, e))?;
    let medications =
        db::list_medications(&conn).map_err(|e| ApiError::query(FETCH_FAILED, e))?;
    Ok(Json(medications))
}
