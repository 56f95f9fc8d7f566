use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::*;

pub fn insert_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO patients (id, name, age, room) VALUES (?1, ?2, ?3, ?4)",
        params![
            patient.id.to_string(),
            patient.name,
            patient.age,
            patient.room,
        ],
    )?;
    Ok(())
}

/// Every patient row, unfiltered, in insertion order.
pub fn list_patients(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT id, name, age, room FROM patients ORDER BY rowid")?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, u32>(2)?,
            row.get::<_, String>(3)?,
        ))
    })?;

    let mut patients = Vec::new();
    for row in rows {
        let (id, name, age, room) = row?;
        patients.push(Patient {
            id: parse_uuid("patients.id", &id)?,
            name,
            age,
            room,
        });
    }
    Ok(patients)
}

pub fn count_patients(conn: &Connection) -> Result<u32, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;
    Ok(count)
}

/// Remove a patient. Its medications (and their times) go with it
/// through `ON DELETE CASCADE`.
pub fn delete_patient(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let removed = conn.execute("DELETE FROM patients WHERE id = ?1", params![id.to_string()])?;
    if removed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "patient".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

pub(super) fn parse_uuid(column: &str, value: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(value).map_err(|_| DatabaseError::InvalidColumn {
        column: column.into(),
        value: value.into(),
    })
}
