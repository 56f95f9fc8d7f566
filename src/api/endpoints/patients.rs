//! Patient endpoint.

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db;
use crate::models::Patient;

pub const FETCH_FAILED: &str = "Failed to fetch patients";

/// `GET /patients`: every patient row, unfiltered.
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<Patient>>, ApiError> {
    let conn = ctx
        .core
        .open_db()
        .map_err(|e| ApiError::query(FETCH_FAILED, e))?;
    let patients = db::list_patients(&conn).map_err(|e| ApiError::query(FETCH_FAILED, e))?;
    Ok(Json(patients))
}
