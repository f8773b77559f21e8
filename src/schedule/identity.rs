//! Dose identity scheme.
//!
//! A dose is addressed by the triple `(prescription_id, day_index, slot_index)`.
//! The textual form `"{prescription_id}.{day}.{slot}"` is injective over that
//! triple and parses back to it, so the owning prescription of any id can be
//! recovered without a lookup table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ScheduleError;

/// Stable identifier of one scheduled dose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DoseId {
    prescription_id: Uuid,
    day_index: u32,
    slot_index: u32,
}

/// Derive the dose id for a prescription's `(day_index, slot_index)` pair.
pub fn identify(prescription_id: Uuid, day_index: u32, slot_index: u32) -> DoseId {
    DoseId {
        prescription_id,
        day_index,
        slot_index,
    }
}

impl DoseId {
    pub fn prescription_id(&self) -> Uuid {
        self.prescription_id
    }

    pub fn day_index(&self) -> u32 {
        self.day_index
    }

    pub fn slot_index(&self) -> u32 {
        self.slot_index
    }

    /// Parse the textual form. Anything but exactly three dot-separated
    /// parts (UUID, day, slot) is a validation error.
    pub fn parse(raw: &str) -> Result<Self, ScheduleError> {
        let invalid = || ScheduleError::Validation(format!("Malformed dose id: {raw}"));

        let mut parts = raw.split('.');
        let (Some(rx), Some(day), Some(slot), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        let prescription_id = Uuid::parse_str(rx).map_err(|_| invalid())?;
        // `u32::from_str` accepts a leading '+', which would give one dose two spellings.
        if !is_plain_digits(day) || !is_plain_digits(slot) {
            return Err(invalid());
        }
        let day_index = day.parse::<u32>().map_err(|_| invalid())?;
        let slot_index = slot.parse::<u32>().map_err(|_| invalid())?;

        Ok(identify(prescription_id, day_index, slot_index))
    }
}

fn is_plain_digits(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|b| b.is_ascii_digit())
        && (s == "0" || !s.starts_with('0'))
}

impl fmt::Display for DoseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}",
            self.prescription_id.as_hyphenated(),
            self.day_index,
            self.slot_index
        )
    }
}

impl FromStr for DoseId {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DoseId {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DoseId> for String {
    fn from(id: DoseId) -> Self {
        id.to_string()
    }
}
