use std::collections::HashMap;

use chrono::{SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{SetStatusOutcome, StatusRecord};
use crate::schedule::identity::{identify, DoseId};
use crate::schedule::tracker::apply_update;

pub fn get_dose_status(
    conn: &Connection,
    dose_id: &DoseId,
) -> Result<Option<StatusRecord>, DatabaseError> {
    let record = conn
        .query_row(
            "SELECT is_taken, version FROM dose_status WHERE dose_id = ?1",
            params![dose_id.to_string()],
            |row| {
                Ok(StatusRecord {
                    is_taken: row.get::<_, i32>(0)? != 0,
                    version: row.get(1)?,
                })
            },
        )
        .optional()?;
    Ok(record)
}

/// All recorded statuses of one prescription, keyed by dose id.
pub fn get_prescription_statuses(
    conn: &Connection,
    prescription_id: &Uuid,
) -> Result<HashMap<DoseId, StatusRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT day_index, slot_index, is_taken, version
         FROM dose_status WHERE prescription_id = ?1",
    )?;

    let rows = stmt.query_map(params![prescription_id.to_string()], |row| {
        Ok((
            row.get::<_, u32>(0)?,
            row.get::<_, u32>(1)?,
            StatusRecord {
                is_taken: row.get::<_, i32>(2)? != 0,
                version: row.get(3)?,
            },
        ))
    })?;

    let mut statuses = HashMap::new();
    for row in rows {
        let (day_index, slot_index, record) = row?;
        statuses.insert(identify(*prescription_id, day_index, slot_index), record);
    }
    Ok(statuses)
}

/// Apply a status update for one dose.
///
/// Runs in an IMMEDIATE transaction so concurrent writers queue on SQLite's
/// write lock; the UPDATE additionally compares the version it read.
pub fn set_dose_status(
    conn: &mut Connection,
    dose_id: &DoseId,
    desired_taken: bool,
    client_version: Option<i64>,
) -> Result<SetStatusOutcome, DatabaseError> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let current = get_dose_status(&tx, dose_id)?;
    let decision = apply_update(current, desired_taken, client_version);

    if let Some(record) = decision.write {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let changed = match current {
            None => tx.execute(
                "INSERT INTO dose_status (dose_id, prescription_id, day_index, slot_index,
                 is_taken, version, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    dose_id.to_string(),
                    dose_id.prescription_id().to_string(),
                    dose_id.day_index(),
                    dose_id.slot_index(),
                    record.is_taken as i32,
                    record.version,
                    now,
                ],
            )?,
            Some(previous) => tx.execute(
                "UPDATE dose_status SET is_taken = ?1, version = ?2, updated_at = ?3
                 WHERE dose_id = ?4 AND version = ?5",
                params![
                    record.is_taken as i32,
                    record.version,
                    now,
                    dose_id.to_string(),
                    previous.version,
                ],
            )?,
        };

        if changed != 1 {
            return Err(DatabaseError::ConstraintViolation(format!(
                "dose_status {dose_id} changed during update"
            )));
        }
    }

    tx.commit()?;
    Ok(decision.outcome)
}
