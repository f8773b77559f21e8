//! Schedule aggregator: day-by-day grouping for presentation.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{DayGroup, Dose, PatientSchedule};

/// Group doses by exact due date. Groups come back in ascending date order;
/// doses within a group in ascending slot order, ties keeping input order.
pub fn group_by_date(doses: Vec<Dose>) -> Vec<DayGroup> {
    let mut by_date: BTreeMap<NaiveDate, Vec<Dose>> = BTreeMap::new();
    for dose in doses {
        by_date.entry(dose.due_date).or_default().push(dose);
    }

    by_date
        .into_iter()
        .map(|(date, mut doses)| {
            // stable sort
            doses.sort_by_key(|d| d.slot.index);
            let taken_count = doses.iter().filter(|d| d.is_taken).count();
            DayGroup {
                date,
                doses,
                taken_count,
            }
        })
        .collect()
}

/// Wrap grouped days with patient-level totals.
pub fn summarize(patient_id: i64, days: Vec<DayGroup>) -> PatientSchedule {
    let total_doses = days.iter().map(|g| g.doses.len()).sum();
    let taken_doses = days.iter().map(|g| g.taken_count).sum();
    PatientSchedule {
        patient_id,
        days,
        total_doses,
        taken_doses,
    }
}
