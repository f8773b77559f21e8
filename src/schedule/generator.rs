//! Schedule generator: expands a prescription into its dose grid.

use std::collections::HashMap;

use chrono::Days;

use super::error::ScheduleError;
use super::identity::{identify, DoseId};
use super::slots::slot_for;
use super::traits::{AdherenceStore, PrescriptionRepository};
use crate::models::{
    Dose, Prescription, ScheduleWindow, StatusRecord, MAX_DAYS_TO_TAKE, MAX_TIMES_PER_DAY,
};

/// Expand one prescription into `times_per_day × days_to_take` doses,
/// day-major then slot order, attaching any recorded adherence state.
pub fn generate(
    prescription: &Prescription,
    statuses: &HashMap<DoseId, StatusRecord>,
) -> Result<Vec<Dose>, ScheduleError> {
    generate_in_window(prescription, statuses, &ScheduleWindow::default())
}

/// Reject counts the generator cannot expand in bounded time and memory.
pub fn check_expandable(prescription: &Prescription) -> Result<(), ScheduleError> {
    if prescription.times_per_day == 0 || prescription.days_to_take == 0 {
        return Err(ScheduleError::Validation(format!(
            "Prescription {} has a non-positive schedule ({} per day for {} days)",
            prescription.id, prescription.times_per_day, prescription.days_to_take
        )));
    }
    if prescription.times_per_day > MAX_TIMES_PER_DAY
        || prescription.days_to_take > MAX_DAYS_TO_TAKE
    {
        return Err(ScheduleError::Validation(format!(
            "Prescription {} exceeds the schedule limits ({} per day for {} days; \
             at most {MAX_TIMES_PER_DAY} per day for {MAX_DAYS_TO_TAKE} days)",
            prescription.id, prescription.times_per_day, prescription.days_to_take
        )));
    }
    Ok(())
}

/// Like `generate`, but only days inside `window` are expanded.
/// Dose ids do not depend on the window.
pub fn generate_in_window(
    prescription: &Prescription,
    statuses: &HashMap<DoseId, StatusRecord>,
    window: &ScheduleWindow,
) -> Result<Vec<Dose>, ScheduleError> {
    check_expandable(prescription)?;

    let slots: Vec<_> = (0..prescription.times_per_day)
        .map(|slot_index| slot_for(slot_index, prescription.times_per_day))
        .collect();

    let mut doses = Vec::new();
    for day_index in 0..prescription.days_to_take {
        let due_date = prescription
            .start_date
            .checked_add_days(Days::new(u64::from(day_index)))
            .ok_or_else(|| {
                ScheduleError::Validation(format!(
                    "Prescription {} runs past the supported calendar range",
                    prescription.id
                ))
            })?;
        if window.to.is_some_and(|to| due_date > to) {
            break;
        }
        if !window.contains(due_date) {
            continue;
        }

        for slot in &slots {
            let dose_id = identify(prescription.id, day_index, slot.index);
            let status = statuses.get(&dose_id);
            doses.push(Dose {
                dose_id,
                prescription_id: prescription.id,
                due_date,
                slot: slot.clone(),
                is_taken: status.map_or(false, |s| s.is_taken),
                version: status.map_or(0, |s| s.version),
                medicine_name: prescription.medicine_name.clone(),
                dosage: prescription.dosage.clone(),
                disease: prescription.disease.clone(),
            });
        }
    }

    tracing::debug!(
        prescription_id = %prescription.id,
        doses = doses.len(),
        "Generated dose schedule"
    );
    Ok(doses)
}

/// Concatenate the generated doses of every prescription of a patient.
///
/// Prescriptions are independent: coinciding dates/slots are not merged.
pub fn generate_patient_schedule(
    prescriptions: &dyn PrescriptionRepository,
    adherence: &dyn AdherenceStore,
    patient_id: i64,
    window: &ScheduleWindow,
) -> Result<Vec<Dose>, ScheduleError> {
    let mut doses = Vec::new();
    for prescription in prescriptions.list_prescriptions_for_patient(patient_id)? {
        let statuses = adherence.lookup_prescription(&prescription.id)?;
        doses.extend(generate_in_window(&prescription, &statuses, window)?);
    }
    Ok(doses)
}
