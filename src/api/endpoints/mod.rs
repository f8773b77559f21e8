//! API endpoint handlers.
//!
//! Handlers are thin: extract, call `ScheduleService`, wrap in JSON.

pub mod doses;
pub mod health;
pub mod prescriptions;
pub mod schedule;

use crate::api::error::ApiError;

/// Fallback for unknown routes, so clients always get the JSON error shape.
pub async fn not_found() -> ApiError {
    ApiError::NotFound("No such route".into())
}

pub(crate) fn parse_patient_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|e| ApiError::BadRequest(format!("Invalid patient ID '{raw}': {e}")))
}
