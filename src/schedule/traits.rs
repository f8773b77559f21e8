//! Trait definitions for the schedule core's collaborators.
//!
//! Two traits define the module boundaries:
//! - PrescriptionRepository: prescriptions owned by the registration/CRUD side
//! - AdherenceStore: durable `dose_id -> (is_taken, version)` mapping

use std::collections::HashMap;

use uuid::Uuid;

use super::identity::DoseId;
use crate::db::DatabaseError;
use crate::models::{Prescription, SetStatusOutcome, StatusRecord};

/// Read (and insert) access to prescriptions.
pub trait PrescriptionRepository: Send + Sync {
    /// Persist a freshly validated prescription.
    fn insert_prescription(&self, prescription: &Prescription) -> Result<(), DatabaseError>;

    /// Fetch one prescription, `None` if it does not exist.
    fn get_prescription(&self, prescription_id: &Uuid)
        -> Result<Option<Prescription>, DatabaseError>;

    /// All prescriptions of a patient, ordered by start date then creation time.
    fn list_prescriptions_for_patient(
        &self,
        patient_id: i64,
    ) -> Result<Vec<Prescription>, DatabaseError>;
}

/// Per-dose adherence state. Implementations must serialize `set_status`
/// per dose so concurrent writers cannot lose an update.
pub trait AdherenceStore: Send + Sync {
    /// Stored state for one dose, `None` if it was never toggled.
    fn lookup(&self, dose_id: &DoseId) -> Result<Option<StatusRecord>, DatabaseError>;

    /// Batch lookup of every recorded dose of a prescription.
    fn lookup_prescription(
        &self,
        prescription_id: &Uuid,
    ) -> Result<HashMap<DoseId, StatusRecord>, DatabaseError>;

    /// Apply the update policy in `tracker::apply_update` atomically.
    fn set_status(
        &self,
        dose_id: &DoseId,
        desired_taken: bool,
        client_version: Option<i64>,
    ) -> Result<SetStatusOutcome, DatabaseError>;
}
