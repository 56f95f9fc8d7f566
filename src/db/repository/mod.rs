//! Repository layer: entity-scoped database operations.
//!
//! The HTTP surface only reads (`list_patients`, `list_medications`);
//! the write helpers exist for startup seeding and tests.

mod medication;
mod patient;

use rusqlite::Connection;

use super::DatabaseError;
use crate::models::{Medication, Patient};

pub use medication::*;
pub use patient::*;

/// Insert the given records when the patients table is empty, all in one
/// transaction. Returns whether anything was written.
pub fn seed_if_empty(
    conn: &Connection,
    patients: &[Patient],
    medications: &[Medication],
) -> Result<bool, DatabaseError> {
    if count_patients(conn)? > 0 {
        return Ok(false);
    }

    let tx = conn.unchecked_transaction()?;
    for patient in patients {
        insert_patient(&tx, patient)?;
    }
    for med in medications {
        medication::insert_medication_rows(&tx, med)?;
    }
    tx.commit()?;

    tracing::info!(
        patients = patients.len(),
        medications = medications.len(),
        "Seeded empty database"
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::models::{MedicationInput, PatientInput};
    use uuid::Uuid;

    fn make_patient(name: &str, room: &str) -> Patient {
        PatientInput::new(name, 80, room).into_patient(Uuid::new_v4())
    }

    fn make_medication(name: &str, times: &[&str], patient_id: Uuid) -> Medication {
        MedicationInput {
            name: name.into(),
            dosage: "10mg".into(),
            frequency: "Daily".into(),
            times: times.iter().map(|t| t.to_string()).collect(),
            instructions: "With water".into(),
            patient_id: Some(patient_id),
        }
        .into_medication(Uuid::new_v4(), patient_id)
    }

    #[test]
    fn empty_database_lists_nothing() {
        let conn = open_memory_database().unwrap();
        assert!(list_patients(&conn).unwrap().is_empty());
        assert!(list_medications(&conn).unwrap().is_empty());
    }

    #[test]
    fn list_patients_returns_rows_in_insertion_order() {
        let conn = open_memory_database().unwrap();
        let zed = make_patient("Zed", "300");
        let amy = make_patient("Amy", "100");
        insert_patient(&conn, &zed).unwrap();
        insert_patient(&conn, &amy).unwrap();

        let patients = list_patients(&conn).unwrap();
        assert_eq!(patients, vec![zed, amy]);
    }

    #[test]
    fn list_medications_preserves_time_order_and_duplicates() {
        let conn = open_memory_database().unwrap();
        let patient = make_patient("Maria Silva", "101");
        insert_patient(&conn, &patient).unwrap();
        let med = make_medication("Losartana", &["20:00", "08:00", "08:00"], patient.id);
        insert_medication(&conn, &med).unwrap();

        let meds = list_medications(&conn).unwrap();
        assert_eq!(meds.len(), 1);
        assert_eq!(meds[0], med);
        assert_eq!(meds[0].times, vec!["20:00", "08:00", "08:00"]);
    }

    #[test]
    fn times_are_not_mixed_between_medications() {
        let conn = open_memory_database().unwrap();
        let patient = make_patient("Maria Silva", "101");
        insert_patient(&conn, &patient).unwrap();
        let a = make_medication("A", &["08:00"], patient.id);
        let b = make_medication("B", &["12:00", "18:00"], patient.id);
        insert_medication(&conn, &a).unwrap();
        insert_medication(&conn, &b).unwrap();

        let meds = list_medications(&conn).unwrap();
        assert_eq!(meds[0].times, vec!["08:00"]);
        assert_eq!(meds[1].times, vec!["12:00", "18:00"]);
    }

    #[test]
    fn medication_requires_existing_patient() {
        let conn = open_memory_database().unwrap();
        let med = make_medication("Orphan", &["08:00"], Uuid::new_v4());
        let result = insert_medication(&conn, &med);
        assert!(matches!(result, Err(DatabaseError::Sqlite(_))));
        // Transaction rolled back: nothing half-written
        assert!(list_medications(&conn).unwrap().is_empty());
    }

    #[test]
    fn deleting_patient_cascades_to_medications_and_times() {
        let conn = open_memory_database().unwrap();
        let maria = make_patient("Maria Silva", "101");
        let joao = make_patient("João Santos", "102");
        insert_patient(&conn, &maria).unwrap();
        insert_patient(&conn, &joao).unwrap();
        insert_medication(&conn, &make_medication("A", &["08:00"], maria.id)).unwrap();
        insert_medication(&conn, &make_medication("B", &["09:00"], joao.id)).unwrap();

        delete_patient(&conn, &maria.id).unwrap();

        let meds = list_medications(&conn).unwrap();
        assert_eq!(meds.len(), 1);
        assert_eq!(meds[0].patient_id, joao.id);
        let orphan_times: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM medication_times
                 WHERE medication_id NOT IN (SELECT id FROM medications)",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(orphan_times, 0);
    }

    #[test]
    fn delete_unknown_patient_is_not_found() {
        let conn = open_memory_database().unwrap();
        let result = delete_patient(&conn, &Uuid::new_v4());
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[test]
    fn delete_medication_removes_only_that_row() {
        let conn = open_memory_database().unwrap();
        let patient = make_patient("Maria Silva", "101");
        insert_patient(&conn, &patient).unwrap();
        let a = make_medication("A", &["08:00"], patient.id);
        let b = make_medication("B", &["09:00"], patient.id);
        insert_medication(&conn, &a).unwrap();
        insert_medication(&conn, &b).unwrap();

        delete_medication(&conn, &a.id).unwrap();

        let meds = list_medications(&conn).unwrap();
        assert_eq!(meds, vec![b]);
        assert_eq!(list_patients(&conn).unwrap().len(), 1);
    }

    #[test]
    fn corrupted_id_is_reported() {
        let conn = open_memory_database().unwrap();
        conn.execute(
            "INSERT INTO patients (id, name, age, room) VALUES ('not-a-uuid', 'X', 1, '1')",
            [],
        )
        .unwrap();
        let result = list_patients(&conn);
        assert!(matches!(result, Err(DatabaseError::InvalidColumn { .. })));
    }

    #[test]
    fn seed_if_empty_only_seeds_once() {
        let conn = open_memory_database().unwrap();
        let patient = make_patient("Maria Silva", "101");
        let med = make_medication("Losartana", &["08:00", "20:00"], patient.id);

        assert!(seed_if_empty(&conn, &[patient.clone()], &[med.clone()]).unwrap());
        assert!(!seed_if_empty(&conn, &[patient], &[med]).unwrap());
        assert_eq!(count_patients(&conn).unwrap(), 1);
        assert_eq!(list_medications(&conn).unwrap().len(), 1);
    }

    #[test]
    fn failed_seed_writes_nothing_and_can_retry() {
        let conn = open_memory_database().unwrap();
        let patient = make_patient("Maria Silva", "101");
        let orphan = make_medication("Orphan", &["08:00"], Uuid::new_v4());

        let result = seed_if_empty(&conn, &[patient.clone()], &[orphan]);
        assert!(matches!(result, Err(DatabaseError::Sqlite(_))));
        assert_eq!(count_patients(&conn).unwrap(), 0);

        let med = make_medication("Losartana", &["08:00"], patient.id);
        assert!(seed_if_empty(&conn, &[patient], &[med]).unwrap());
        assert_eq!(count_patients(&conn).unwrap(), 1);
        assert_eq!(list_medications(&conn).unwrap().len(), 1);
    }
}
