//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`.
//!
//! Layers (outermost → innermost): Cache-Control → access log → handler.

use std::sync::Arc;

use axum::http::{header, HeaderValue};
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::service::ScheduleService;

/// Build the API router over a shared service.
pub fn api_router(service: Arc<ScheduleService>) -> Router {
    build_router(ApiContext::new(service))
}

fn build_router(ctx: ApiContext) -> Router {
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/prescriptions", post(endpoints::prescriptions::create))
        .route("/prescriptions/:id", get(endpoints::prescriptions::detail))
        .route(
            "/patients/:patient_id/prescriptions",
            get(endpoints::prescriptions::list_for_patient),
        )
        .route(
            "/patients/:patient_id/schedule",
            get(endpoints::schedule::patient_schedule),
        )
        .route("/doses/:dose_id/status", put(endpoints::doses::set_status))
        .with_state(ctx);

    Router::new()
        .nest("/api", api)
        .fallback(endpoints::not_found)
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}
