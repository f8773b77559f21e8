use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::Prescription;

const SELECT_COLUMNS: &str = "SELECT id, patient_id, doctor_id, medicine_name, dosage, symptoms,
         disease, times_per_day, days_to_take, start_date, created_at
         FROM prescriptions";

/// Raw column values before parsing.
struct PrescriptionRow {
    id: String,
    patient_id: i64,
    doctor_id: i64,
    medicine_name: String,
    dosage: String,
    symptoms: Option<String>,
    disease: Option<String>,
    times_per_day: u32,
    days_to_take: u32,
    start_date: String,
    created_at: String,
}

fn prescription_row_from_rusqlite(row: &rusqlite::Row<'_>) -> rusqlite::Result<PrescriptionRow> {
    Ok(PrescriptionRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        doctor_id: row.get(2)?,
        medicine_name: row.get(3)?,
        dosage: row.get(4)?,
        symptoms: row.get(5)?,
        disease: row.get(6)?,
        times_per_day: row.get(7)?,
        days_to_take: row.get(8)?,
        start_date: row.get(9)?,
        created_at: row.get(10)?,
    })
}

fn prescription_from_row(row: PrescriptionRow) -> Result<Prescription, DatabaseError> {
    let corrupt = |reason: String| DatabaseError::CorruptRow {
        table: "prescriptions",
        reason,
    };

    let id = Uuid::parse_str(&row.id).map_err(|e| corrupt(format!("id {}: {e}", row.id)))?;
    let start_date = NaiveDate::parse_from_str(&row.start_date, "%Y-%m-%d")
        .map_err(|e| corrupt(format!("start_date {}: {e}", row.start_date)))?;
    let created_at = DateTime::parse_from_rfc3339(&row.created_at)
        .map_err(|e| corrupt(format!("created_at {}: {e}", row.created_at)))?
        .with_timezone(&Utc);

    Ok(Prescription {
        id,
        patient_id: row.patient_id,
        doctor_id: row.doctor_id,
        medicine_name: row.medicine_name,
        dosage: row.dosage,
        symptoms: row.symptoms,
        disease: row.disease,
        times_per_day: row.times_per_day,
        days_to_take: row.days_to_take,
        start_date,
        created_at,
    })
}

pub fn insert_prescription(conn: &Connection, rx: &Prescription) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO prescriptions (id, patient_id, doctor_id, medicine_name, dosage, symptoms,
         disease, times_per_day, days_to_take, start_date, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            rx.id.to_string(),
            rx.patient_id,
            rx.doctor_id,
            rx.medicine_name,
            rx.dosage,
            rx.symptoms,
            rx.disease,
            rx.times_per_day,
            rx.days_to_take,
            rx.start_date.format("%Y-%m-%d").to_string(),
            // fixed-width so lexical order matches chronological order
            rx.created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
        ],
    )?;
    Ok(())
}

pub fn get_prescription(
    conn: &Connection,
    prescription_id: &Uuid,
) -> Result<Option<Prescription>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("{SELECT_COLUMNS} WHERE id = ?1"),
            params![prescription_id.to_string()],
            prescription_row_from_rusqlite,
        )
        .optional()?;

    row.map(prescription_from_row).transpose()
}

pub fn get_prescriptions_for_patient(
    conn: &Connection,
    patient_id: i64,
) -> Result<Vec<Prescription>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_COLUMNS} WHERE patient_id = ?1
         ORDER BY start_date ASC, created_at ASC, rowid ASC"
    ))?;

    let rows = stmt.query_map(params![patient_id], prescription_row_from_rusqlite)?;

    let mut prescriptions = Vec::new();
    for row in rows {
        prescriptions.push(prescription_from_row(row?)?);
    }
    Ok(prescriptions)
}
