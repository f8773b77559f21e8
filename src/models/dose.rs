use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::SlotPeriod;
use crate::schedule::identity::DoseId;

/// Position of a dose within its day, with a display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoseSlot {
    pub index: u32,
    pub period: SlotPeriod,
    pub label: String,
    pub time: NaiveTime,
}

/// One concrete scheduled administration derived from a prescription.
///
/// Display fields are copied from the prescription at generation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dose {
    pub dose_id: DoseId,
    pub prescription_id: Uuid,
    pub due_date: NaiveDate,
    pub slot: DoseSlot,
    pub is_taken: bool,
    /// Adherence record version; 0 when the dose was never toggled.
    pub version: i64,
    pub medicine_name: String,
    pub dosage: String,
    pub disease: Option<String>,
}

/// Stored adherence state for one dose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub is_taken: bool,
    pub version: i64,
}

/// Result of a status update. A stale write is `accepted: false, stale: true`
/// and carries the authoritative state so the caller can reconcile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetStatusOutcome {
    pub accepted: bool,
    pub stale: bool,
    pub current_taken: bool,
    pub current_version: i64,
}
