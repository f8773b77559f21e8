//! `PUT /api/doses/:dose_id/status`: mark a dose taken or not taken.
//!
//! A stale `client_version` is not an error: the response is 200 with
//! `accepted: false` and the current state.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::SetStatusOutcome;

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub is_taken: bool,
    #[serde(default)]
    pub client_version: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SetStatusResponse {
    pub dose_id: String,
    #[serde(flatten)]
    pub outcome: SetStatusOutcome,
}

pub async fn set_status(
    State(ctx): State<ApiContext>,
    Path(dose_id): Path<String>,
    payload: Result<Json<SetStatusRequest>, JsonRejection>,
) -> Result<Json<SetStatusResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let outcome =
        ctx.service
            .set_dose_status(&dose_id, request.is_taken, request.client_version)?;
    Ok(Json(SetStatusResponse { dose_id, outcome }))
}
