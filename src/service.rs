//! Schedule service: the operations the CRUD/presentation side calls.
//!
//! Transport-agnostic: the axum handlers and any other caller share one
//! `ScheduleService` behind an `Arc`.

use std::sync::Arc;

use chrono::{Local, SubsecRound, Utc};
use uuid::Uuid;

use crate::db::SqliteStore;
use crate::models::{
    NewPrescription, PatientSchedule, Prescription, ScheduleWindow, SetStatusOutcome,
    MAX_DAYS_TO_TAKE, MAX_TIMES_PER_DAY,
};
use crate::schedule::aggregator::{group_by_date, summarize};
use crate::schedule::generator::generate_patient_schedule;
use crate::schedule::{AdherenceStore, DoseId, PrescriptionRepository, ScheduleError};

pub struct ScheduleService {
    prescriptions: Arc<dyn PrescriptionRepository>,
    adherence: Arc<dyn AdherenceStore>,
}

impl ScheduleService {
    pub fn new(
        prescriptions: Arc<dyn PrescriptionRepository>,
        adherence: Arc<dyn AdherenceStore>,
    ) -> Self {
        Self {
            prescriptions,
            adherence,
        }
    }

    /// Service whose prescriptions and adherence state share one SQLite file.
    pub fn with_sqlite(store: SqliteStore) -> Self {
        let store = Arc::new(store);
        Self::new(store.clone(), store)
    }

    // ── Prescriptions ───────────────────────────────────────

    /// Validate and persist a new prescription. Non-positive counts and counts
    /// above `MAX_TIMES_PER_DAY` / `MAX_DAYS_TO_TAKE` are rejected, never clamped. `start_date` defaults to today (local).
    pub fn create_prescription(
        &self,
        input: NewPrescription,
    ) -> Result<Prescription, ScheduleError> {
        let (times_per_day, days_to_take) = validate_counts(&input).map_err(|e| {
            tracing::warn!(
                patient_id = input.patient_id,
                times_per_day = input.times_per_day,
                days_to_take = input.days_to_take,
                "Rejected prescription: {e}"
            );
            e
        })?;

        let start_date = input.start_date.unwrap_or_else(|| Local::now().date_naive());
        let prescription = Prescription {
            id: Uuid::new_v4(),
            patient_id: input.patient_id,
            doctor_id: input.doctor_id,
            medicine_name: input.medicine_name,
            dosage: input.dosage,
            symptoms: input.symptoms,
            disease: input.disease,
            times_per_day,
            days_to_take,
            start_date,
            // storage keeps microseconds
            created_at: Utc::now().trunc_subsecs(6),
        };
        if prescription.end_date().is_none() {
            return Err(ScheduleError::Validation(
                "days_to_take runs past the supported calendar range".into(),
            ));
        }

        self.prescriptions.insert_prescription(&prescription)?;

        tracing::info!(
            prescription_id = %prescription.id,
            patient_id = prescription.patient_id,
            doctor_id = prescription.doctor_id,
            doses = prescription.total_doses(),
            "Prescription created"
        );
        Ok(prescription)
    }

    pub fn get_prescription(&self, prescription_id: &Uuid) -> Result<Prescription, ScheduleError> {
        self.prescriptions
            .get_prescription(prescription_id)?
            .ok_or_else(|| ScheduleError::not_found("prescription", prescription_id))
    }

    pub fn list_prescriptions(&self, patient_id: i64) -> Result<Vec<Prescription>, ScheduleError> {
        Ok(self.prescriptions.list_prescriptions_for_patient(patient_id)?)
    }

    // ── Schedule ────────────────────────────────────────────

    /// Generate the patient's doses inside `window` and group them by day.
    ///
    /// A patient without prescriptions gets an empty schedule.
    pub fn get_patient_schedule(
        &self,
        patient_id: i64,
        window: ScheduleWindow,
    ) -> Result<PatientSchedule, ScheduleError> {
        if window.is_inverted() {
            return Err(ScheduleError::Validation(
                "Schedule window 'from' is after 'to'".into(),
            ));
        }

        let doses = generate_patient_schedule(
            self.prescriptions.as_ref(),
            self.adherence.as_ref(),
            patient_id,
            &window,
        )?;

        Ok(summarize(patient_id, group_by_date(doses)))
    }

    // ── Adherence ───────────────────────────────────────────

    /// Mark one dose taken or not taken.
    ///
    /// The dose must belong to an existing prescription and fall inside its
    /// day/slot grid. A stale `client_version` returns the current state
    /// with `accepted: false` instead of an error.
    pub fn set_dose_status(
        &self,
        raw_dose_id: &str,
        is_taken: bool,
        client_version: Option<i64>,
    ) -> Result<SetStatusOutcome, ScheduleError> {
        let dose_id = DoseId::parse(raw_dose_id)?;

        let prescription = self
            .prescriptions
            .get_prescription(&dose_id.prescription_id())?
            .ok_or_else(|| ScheduleError::not_found("prescription", dose_id.prescription_id()))?;

        if dose_id.day_index() >= prescription.days_to_take
            || dose_id.slot_index() >= prescription.times_per_day
        {
            return Err(ScheduleError::not_found("dose", dose_id));
        }

        let outcome = self.adherence.set_status(&dose_id, is_taken, client_version)?;

        if outcome.stale {
            tracing::warn!(
                %dose_id,
                client_version,
                current_version = outcome.current_version,
                "Rejected stale dose status update"
            );
        } else {
            tracing::debug!(%dose_id, is_taken, version = outcome.current_version, "Dose status updated");
        }
        Ok(outcome)
    }
}

fn validate_counts(input: &NewPrescription) -> Result<(u32, u32), ScheduleError> {
    let bounded = |field: &str, value: i64, max: u32| -> Result<u32, ScheduleError> {
        if value < 1 {
            return Err(ScheduleError::Validation(format!(
                "{field} must be a positive integer, got {value}"
            )));
        }
        if value > i64::from(max) {
            return Err(ScheduleError::Validation(format!(
                "{field} must be at most {max}, got {value}"
            )));
        }
        Ok(value as u32)
    };

    Ok((
        bounded("times_per_day", input.times_per_day, MAX_TIMES_PER_DAY)?,
        bounded("days_to_take", input.days_to_take, MAX_DAYS_TO_TAKE)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::schedule::identify;
    use chrono::NaiveDate;

    fn test_service() -> (tempfile::TempDir, ScheduleService) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("service.db")).unwrap();
        (dir, ScheduleService::with_sqlite(SqliteStore::new(db)))
    }

    fn new_rx(patient_id: i64, times_per_day: i64, days_to_take: i64) -> NewPrescription {
        NewPrescription {
            patient_id,
            doctor_id: 10,
            medicine_name: "Amoxicillin".into(),
            dosage: "500mg".into(),
            symptoms: Some("Fever".into()),
            disease: Some("Sinusitis".into()),
            times_per_day,
            days_to_take,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
        }
    }

    fn jan(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn create_prescription_persists() {
        let (_dir, service) = test_service();
        let rx = service.create_prescription(new_rx(1, 3, 2)).unwrap();
        assert_eq!(service.get_prescription(&rx.id).unwrap(), rx);
        assert_eq!(service.list_prescriptions(1).unwrap(), vec![rx]);
    }

    #[test]
    fn start_date_defaults_to_today() {
        let (_dir, service) = test_service();
        let mut input = new_rx(1, 1, 1);
        input.start_date = None;
        let rx = service.create_prescription(input).unwrap();
        assert_eq!(rx.start_date, Local::now().date_naive());
    }

    #[test]
    fn zero_times_per_day_is_rejected_and_never_scheduled() {
        let (_dir, service) = test_service();
        let err = service.create_prescription(new_rx(1, 0, 5)).unwrap_err();
        assert!(matches!(err, ScheduleError::Validation(_)));

        let schedule = service
            .get_patient_schedule(1, ScheduleWindow::default())
            .unwrap();
        assert!(schedule.days.is_empty());
        assert!(service.list_prescriptions(1).unwrap().is_empty());
    }

    #[test]
    fn negative_and_oversized_counts_are_rejected() {
        let (_dir, service) = test_service();
        for (times, days) in [(-2, 3), (2, -1), (i64::from(u32::MAX) + 1, 1), (1, i64::from(u32::MAX))] {
            let err = service.create_prescription(new_rx(1, times, days)).unwrap_err();
            assert!(matches!(err, ScheduleError::Validation(_)), "{times}x{days}");
        }
    }

    #[test]
    fn counts_above_ceiling_are_rejected_and_schedule_stays_servable() {
        let (_dir, service) = test_service();
        let max_times = i64::from(MAX_TIMES_PER_DAY);
        let max_days = i64::from(MAX_DAYS_TO_TAKE);
        for (times, days) in [(i64::from(u32::MAX), 1), (max_times + 1, 1), (1, max_days + 1)] {
            let err = service.create_prescription(new_rx(1, times, days)).unwrap_err();
            assert!(matches!(err, ScheduleError::Validation(_)), "{times}x{days}");
        }
        assert!(service.list_prescriptions(1).unwrap().is_empty());

        service.create_prescription(new_rx(1, max_times, 1)).unwrap();
        service.create_prescription(new_rx(1, 1, max_days)).unwrap();
        let schedule = service.get_patient_schedule(1, ScheduleWindow::default()).unwrap();
        assert_eq!(schedule.total_doses, (max_times + max_days) as usize);
    }

    #[test]
    fn created_prescription_matches_stored_copy() {
        let (_dir, service) = test_service();
        let created = service.create_prescription(new_rx(2, 1, 1)).unwrap();
        assert_eq!(created.created_at.timestamp_subsec_nanos() % 1_000, 0);
        assert_eq!(service.list_prescriptions(2).unwrap(), vec![created]);
    }

    #[test]
    fn schedule_for_three_a_day_over_two_days() {
        let (_dir, service) = test_service();
        service.create_prescription(new_rx(1, 3, 2)).unwrap();

        let schedule = service
            .get_patient_schedule(1, ScheduleWindow::default())
            .unwrap();
        assert_eq!(schedule.total_doses, 6);
        assert_eq!(schedule.taken_doses, 0);
        let dates: Vec<_> = schedule.days.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![jan(1), jan(2)]);
        assert!(schedule.days.iter().all(|d| d.doses.len() == 3));
    }

    #[test]
    fn toggling_one_dose_marks_exactly_that_dose() {
        let (_dir, service) = test_service();
        let rx = service.create_prescription(new_rx(1, 3, 2)).unwrap();
        let target = identify(rx.id, 0, 1);

        let outcome = service
            .set_dose_status(&target.to_string(), true, None)
            .unwrap();
        assert!(outcome.accepted);

        let schedule = service
            .get_patient_schedule(1, ScheduleWindow::default())
            .unwrap();
        let taken: Vec<_> = schedule
            .days
            .iter()
            .flat_map(|d| d.doses.iter())
            .filter(|d| d.is_taken)
            .map(|d| d.dose_id)
            .collect();
        assert_eq!(taken, vec![target]);
        assert_eq!(schedule.taken_doses, 1);
        assert_eq!(schedule.days[0].taken_count, 1);
    }

    #[test]
    fn status_survives_regeneration_and_ids_are_stable() {
        let (_dir, service) = test_service();
        let rx = service.create_prescription(new_rx(4, 2, 3)).unwrap();
        let before = service.get_patient_schedule(4, ScheduleWindow::default()).unwrap();
        service
            .set_dose_status(&identify(rx.id, 2, 1).to_string(), true, None)
            .unwrap();
        let after = service.get_patient_schedule(4, ScheduleWindow::default()).unwrap();

        let ids = |s: &PatientSchedule| -> Vec<DoseId> {
            s.days.iter().flat_map(|d| d.doses.iter().map(|x| x.dose_id)).collect()
        };
        assert_eq!(ids(&before), ids(&after));
        assert_eq!(after.taken_doses, 1);
    }

    #[test]
    fn set_status_is_idempotent() {
        let (_dir, service) = test_service();
        let rx = service.create_prescription(new_rx(1, 1, 1)).unwrap();
        let id = identify(rx.id, 0, 0).to_string();

        let first = service.set_dose_status(&id, true, None).unwrap();
        let second = service.set_dose_status(&id, true, None).unwrap();
        assert!(first.current_taken && second.current_taken);
        assert!(second.current_version > first.current_version);
    }

    #[test]
    fn stale_client_version_is_rejected_without_mutation() {
        let (_dir, service) = test_service();
        let rx = service.create_prescription(new_rx(1, 2, 1)).unwrap();
        let id = identify(rx.id, 0, 0).to_string();

        service.set_dose_status(&id, true, None).unwrap();
        let stored = service.set_dose_status(&id, true, Some(1)).unwrap();
        assert_eq!(stored.current_version, 2);

        let outcome = service.set_dose_status(&id, false, Some(1)).unwrap();
        assert!(!outcome.accepted);
        assert!(outcome.stale);
        assert!(outcome.current_taken);
        assert_eq!(outcome.current_version, 2);

        let schedule = service.get_patient_schedule(1, ScheduleWindow::default()).unwrap();
        let dose = &schedule.days[0].doses[0];
        assert!(dose.is_taken);
        assert_eq!(dose.version, 2);
    }

    #[test]
    fn set_status_errors() {
        let (_dir, service) = test_service();
        let rx = service.create_prescription(new_rx(1, 2, 2)).unwrap();

        let malformed = service.set_dose_status("nonsense", true, None).unwrap_err();
        assert!(matches!(malformed, ScheduleError::Validation(_)));

        let orphan = identify(Uuid::new_v4(), 0, 0).to_string();
        let missing_rx = service.set_dose_status(&orphan, true, None).unwrap_err();
        assert!(matches!(missing_rx, ScheduleError::NotFound { entity_type: "prescription", .. }));

        for (day, slot) in [(2, 0), (0, 2)] {
            let outside = identify(rx.id, day, slot).to_string();
            let err = service.set_dose_status(&outside, true, None).unwrap_err();
            assert!(matches!(err, ScheduleError::NotFound { entity_type: "dose", .. }));
        }
    }

    #[test]
    fn prescriptions_are_not_merged() {
        let (_dir, service) = test_service();
        service.create_prescription(new_rx(1, 2, 1)).unwrap();
        let mut second = new_rx(1, 2, 1);
        second.medicine_name = "Paracetamol".into();
        service.create_prescription(second).unwrap();

        let schedule = service.get_patient_schedule(1, ScheduleWindow::default()).unwrap();
        assert_eq!(schedule.days.len(), 1);
        assert_eq!(schedule.days[0].doses.len(), 4);
        let slots: Vec<_> = schedule.days[0].doses.iter().map(|d| d.slot.index).collect();
        assert_eq!(slots, vec![0, 0, 1, 1]);
    }

    #[test]
    fn window_limits_days() {
        let (_dir, service) = test_service();
        service.create_prescription(new_rx(1, 1, 10)).unwrap();

        let window = ScheduleWindow {
            from: Some(jan(3)),
            to: Some(jan(5)),
        };
        let schedule = service.get_patient_schedule(1, window).unwrap();
        let dates: Vec<_> = schedule.days.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![jan(3), jan(4), jan(5)]);
        assert_eq!(schedule.total_doses, 3);
    }

    #[test]
    fn inverted_window_is_rejected() {
        let (_dir, service) = test_service();
        let window = ScheduleWindow {
            from: Some(jan(5)),
            to: Some(jan(1)),
        };
        let err = service.get_patient_schedule(1, window).unwrap_err();
        assert!(matches!(err, ScheduleError::Validation(_)));
    }

    #[test]
    fn unknown_prescription_is_not_found() {
        let (_dir, service) = test_service();
        let err = service.get_prescription(&Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, ScheduleError::NotFound { .. }));
    }
}
