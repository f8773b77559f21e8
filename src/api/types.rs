//! Shared types for the API layer.

use std::sync::Arc;

use crate::service::ScheduleService;

/// Shared context for all API routes.
#[derive(Clone)]
pub struct ApiContext {
    pub service: Arc<ScheduleService>,
}

impl ApiContext {
    pub fn new(service: Arc<ScheduleService>) -> Self {
        Self { service }
    }
}
