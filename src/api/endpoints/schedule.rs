//! `GET /api/patients/:patient_id/schedule`: day-grouped dose checklist.
//!
//! Optional `from` / `to` query parameters (YYYY-MM-DD, inclusive) narrow
//! the returned days.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::Json;

use super::parse_patient_id;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{PatientSchedule, ScheduleWindow};

pub async fn patient_schedule(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
    window: Result<Query<ScheduleWindow>, QueryRejection>,
) -> Result<Json<PatientSchedule>, ApiError> {
    let patient_id = parse_patient_id(&patient_id)?;
    let Query(window) = window.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    Ok(Json(ctx.service.get_patient_schedule(patient_id, window)?))
}
