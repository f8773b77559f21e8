//! Error kinds surfaced by the schedule core.
//!
//! Validation and not-found errors are terminal for the call. Stale writes
//! are not errors: they come back as a rejected `SetStatusOutcome`.

use thiserror::Error;

use crate::db::DatabaseError;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: String },

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl ScheduleError {
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }
}
