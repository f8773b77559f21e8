//! Prescription endpoints.
//!
//! - `POST /api/prescriptions`: create
//! - `GET /api/prescriptions/:id`: detail
//! - `GET /api/patients/:patient_id/prescriptions`: list for one patient

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use super::parse_patient_id;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{NewPrescription, Prescription};

/// `POST /api/prescriptions`: validate and store a prescription.
pub async fn create(
    State(ctx): State<ApiContext>,
    payload: Result<Json<NewPrescription>, JsonRejection>,
) -> Result<(StatusCode, Json<Prescription>), ApiError> {
    let Json(input) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let prescription = ctx.service.create_prescription(input)?;
    Ok((StatusCode::CREATED, Json(prescription)))
}

/// `GET /api/prescriptions/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(prescription_id): Path<String>,
) -> Result<Json<Prescription>, ApiError> {
    let id = Uuid::parse_str(&prescription_id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid prescription ID: {e}")))?;
    Ok(Json(ctx.service.get_prescription(&id)?))
}

#[derive(Serialize)]
pub struct PrescriptionListResponse {
    pub patient_id: i64,
    pub prescriptions: Vec<Prescription>,
}

/// `GET /api/patients/:patient_id/prescriptions`
pub async fn list_for_patient(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<PrescriptionListResponse>, ApiError> {
    let patient_id = parse_patient_id(&patient_id)?;
    let prescriptions = ctx.service.list_prescriptions(patient_id)?;
    Ok(Json(PrescriptionListResponse {
        patient_id,
        prescriptions,
    }))
}
