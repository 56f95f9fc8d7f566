use std::collections::HashMap;

use rusqlite::{params, Connection};
use uuid::Uuid;

use super::patient::parse_uuid;
use crate::db::DatabaseError;
use crate::models::*;

/// Insert a medication and its ordered time list in one transaction.
pub fn insert_medication(conn: &Connection, med: &Medication) -> Result<(), DatabaseError> {
    let tx = conn.unchecked_transaction()?;
    insert_medication_rows(&tx, med)?;
    tx.commit()?;
    Ok(())
}

/// Row inserts for one medication, for callers that already hold a
/// transaction.
pub(super) fn insert_medication_rows(
    conn: &Connection,
    med: &Medication,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO medications (id, name, dosage, frequency, instructions, patient_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            med.id.to_string(),
            med.name,
            med.dosage,
            med.frequency,
            med.instructions,
            med.patient_id.to_string(),
        ],
    )?;

    for (position, time) in med.times.iter().enumerate() {
        conn.execute(
            "INSERT INTO medication_times (medication_id, position, time) VALUES (?1, ?2, ?3)",
            params![med.id.to_string(), position as i64, time],
        )?;
    }
    Ok(())
}

/// Every medication row, unfiltered, in insertion order, with `times`
/// reassembled in slot order.
pub fn list_medications(conn: &Connection) -> Result<Vec<Medication>, DatabaseError> {
    let mut times = load_all_times(conn)?;

    let mut stmt = conn.prepare(
        "SELECT id, name, dosage, frequency, instructions, patient_id
         FROM medications ORDER BY rowid",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, String>(5)?,
        ))
    })?;

    let mut meds = Vec::new();
    for row in rows {
        let (id, name, dosage, frequency, instructions, patient_id) = row?;
        meds.push(Medication {
            times: times.remove(&id).unwrap_or_default(),
            id: parse_uuid("medications.id", &id)?,
            name,
            dosage,
            frequency,
            instructions,
            patient_id: parse_uuid("medications.patient_id", &patient_id)?,
        });
    }
    Ok(meds)
}

pub fn delete_medication(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let removed = conn.execute(
        "DELETE FROM medications WHERE id = ?1",
        params![id.to_string()],
    )?;
    if removed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "medication".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn load_all_times(conn: &Connection) -> Result<HashMap<String, Vec<String>>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT medication_id, time FROM medication_times ORDER BY medication_id, position",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut times: HashMap<String, Vec<String>> = HashMap::new();
    for row in rows {
        let (medication_id, time) = row?;
        times.entry(medication_id).or_default().push(time);
    }
    Ok(times)
}
