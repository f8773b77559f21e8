use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::dose::Dose;

/// All doses due on one calendar date, ordered by slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayGroup {
    pub date: NaiveDate,
    pub doses: Vec<Dose>,
    pub taken_count: usize,
}

/// A patient's checklist, grouped by day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientSchedule {
    pub patient_id: i64,
    pub days: Vec<DayGroup>,
    pub total_doses: usize,
    pub taken_doses: usize,
}

/// Inclusive calendar-date bounds applied to a generated schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ScheduleWindow {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl ScheduleWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }

    pub fn is_inverted(&self) -> bool {
        matches!((self.from, self.to), (Some(from), Some(to)) if from > to)
    }
}
