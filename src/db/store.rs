//! SQLite-backed implementation of the schedule core's collaborators.

use std::collections::HashMap;

use uuid::Uuid;

use super::repository;
use super::{Database, DatabaseError};
use crate::models::{Prescription, SetStatusOutcome, StatusRecord};
use crate::schedule::identity::DoseId;
use crate::schedule::traits::{AdherenceStore, PrescriptionRepository};

/// Both collaborators over one database file. Each call opens its own
/// connection.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl PrescriptionRepository for SqliteStore {
    fn insert_prescription(&self, prescription: &Prescription) -> Result<(), DatabaseError> {
        let conn = self.db.connect()?;
        repository::insert_prescription(&conn, prescription)
    }

    fn get_prescription(
        &self,
        prescription_id: &Uuid,
    ) -> Result<Option<Prescription>, DatabaseError> {
        let conn = self.db.connect()?;
        repository::get_prescription(&conn, prescription_id)
    }

    fn list_prescriptions_for_patient(
        &self,
        patient_id: i64,
    ) -> Result<Vec<Prescription>, DatabaseError> {
        let conn = self.db.connect()?;
        repository::get_prescriptions_for_patient(&conn, patient_id)
    }
}

impl AdherenceStore for SqliteStore {
    fn lookup(&self, dose_id: &DoseId) -> Result<Option<StatusRecord>, DatabaseError> {
        let conn = self.db.connect()?;
        repository::get_dose_status(&conn, dose_id)
    }

    fn lookup_prescription(
        &self,
        prescription_id: &Uuid,
    ) -> Result<HashMap<DoseId, StatusRecord>, DatabaseError> {
        let conn = self.db.connect()?;
        repository::get_prescription_statuses(&conn, prescription_id)
    }

    fn set_status(
        &self,
        dose_id: &DoseId,
        desired_taken: bool,
        client_version: Option<i64>,
    ) -> Result<SetStatusOutcome, DatabaseError> {
        let mut conn = self.db.connect()?;
        repository::set_dose_status(&mut conn, dose_id, desired_taken, client_version)
    }
}
