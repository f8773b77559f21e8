use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Upper bound on doses per day.
pub const MAX_TIMES_PER_DAY: u32 = 24;

/// Upper bound on regimen length, in days (ten years).
pub const MAX_DAYS_TO_TAKE: u32 = 3650;

/// Doctor-authored dosing rule. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prescription {
    pub id: Uuid,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub medicine_name: String,
    pub dosage: String,
    pub symptoms: Option<String>,
    pub disease: Option<String>,
    pub times_per_day: u32,
    pub days_to_take: u32,
    pub start_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Prescription {
    /// Last calendar day of the regimen (inclusive).
    ///
    /// `None` when `days_to_take` is zero or the range leaves chrono's calendar.
    pub fn end_date(&self) -> Option<NaiveDate> {
        let last_offset = self.days_to_take.checked_sub(1)?;
        self.start_date.checked_add_days(Days::new(u64::from(last_offset)))
    }

    pub fn total_doses(&self) -> u64 {
        u64::from(self.times_per_day) * u64::from(self.days_to_take)
    }
}

/// Creation request for a prescription.
///
/// Counts are signed so that non-positive input reaches validation
/// instead of failing deserialization with an opaque message.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPrescription {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub medicine_name: String,
    pub dosage: String,
    #[serde(default)]
    pub symptoms: Option<String>,
    #[serde(default)]
    pub disease: Option<String>,
    pub times_per_day: i64,
    pub days_to_take: i64,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}
