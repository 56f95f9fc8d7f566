//! Client state store: patients and medications held in memory.
//!
//! Every mutation goes through a per-action method (or `dispatch` with a
//! [`StoreAction`]) and is visible to the next read. Nothing here touches
//! the database: the store is hydrated from the query service once and
//! then lives on its own.
//!
//! Referential rule: a medication always names an existing patient.
//! Upserts referencing an unknown patient are rejected and deleting a
//! patient removes its medications in the same call.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{parse_time_slot, Medication, MedicationInput, Patient, PatientInput};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Patient not found: {0}")]
    PatientNotFound(Uuid),
    #[error("Medication not found: {0}")]
    MedicationNotFound(Uuid),
    #[error("Medication must reference an existing patient, got {0}")]
    UnknownPatient(Uuid),
    #[error("No patient selected")]
    MissingPatient,
    #[error("Field is required: {0}")]
    BlankField(&'static str),
    #[error("At least one time is required")]
    EmptySchedule,
    #[error("Invalid time at slot {index}: {value:?} (expected HH:MM)")]
    InvalidTime { index: usize, value: String },
}

// ═══════════════════════════════════════════
// Actions
// ═══════════════════════════════════════════

/// One user action against the store.
#[derive(Debug, Clone)]
pub enum StoreAction {
    UpsertPatient {
        input: PatientInput,
        editing_id: Option<Uuid>,
    },
    UpsertMedication {
        input: MedicationInput,
        editing_id: Option<Uuid>,
    },
    DeletePatient(Uuid),
    DeleteMedication(Uuid),
}

/// Result of a successfully applied action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ActionOutcome {
    Upserted { id: Uuid },
    PatientDeleted { medications_removed: usize },
    MedicationDeleted,
}

// ═══════════════════════════════════════════
// Store
// ═══════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareStore {
    patients: Vec<Patient>,
    medications: Vec<Medication>,
}

impl CareStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The demo ward: two patients and one twice-daily medication.
    pub fn seeded() -> Self {
        let maria = PatientInput::new("Maria Silva", 75, "101").into_patient(Uuid::new_v4());
        let joao = PatientInput::new("João Santos", 82, "102").into_patient(Uuid::new_v4());
        let losartana = MedicationInput {
            name: "Losartana".into(),
            dosage: "50mg".into(),
            frequency: "Diário".into(),
            times: vec!["08:00".into(), "20:00".into()],
            instructions: "Tomar com água".into(),
            patient_id: Some(maria.id),
        }
        .into_medication(Uuid::new_v4(), maria.id);

        Self {
            patients: vec![maria, joao],
            medications: vec![losartana],
        }
    }

    /// Hydrate from rows returned by the query service. Medications whose
    /// patient is missing, or whose time list is empty or not strict
    /// `HH:MM`, are dropped so the store starts consistent.
    pub fn from_records(patients: Vec<Patient>, medications: Vec<Medication>) -> Self {
        let mut store = Self {
            patients,
            medications: Vec::new(),
        };
        for med in medications {
            if store.find_patient(&med.patient_id).is_none() {
                tracing::warn!(
                    medication_id = %med.id,
                    patient_id = %med.patient_id,
                    "Dropping medication with unknown patient"
                );
            } else if let Err(e) = validate_schedule(&med.times) {
                tracing::warn!(
                    medication_id = %med.id,
                    error = %e,
                    "Dropping medication with invalid schedule"
                );
            } else {
                store.medications.push(med);
            }
        }
        store
    }

    // ── Reads ───────────────────────────────────────────────

    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    pub fn medications(&self) -> &[Medication] {
        &self.medications
    }

    pub fn find_patient(&self, id: &Uuid) -> Option<&Patient> {
        self.patients.iter().find(|p| &p.id == id)
    }

    pub fn find_medication(&self, id: &Uuid) -> Option<&Medication> {
        self.medications.iter().find(|m| &m.id == id)
    }

    /// Display name of a patient, `None` for a dangling reference.
    pub fn patient_name(&self, id: &Uuid) -> Option<&str> {
        self.find_patient(id).map(|p| p.name.as_str())
    }

    pub fn medications_for_patient<'a>(
        &'a self,
        patient_id: &'a Uuid,
    ) -> impl Iterator<Item = &'a Medication> + 'a {
        self.medications
            .iter()
            .filter(move |m| &m.patient_id == patient_id)
    }

    /// Prefilled form for editing an existing patient.
    pub fn patient_draft(&self, id: &Uuid) -> Option<PatientInput> {
        self.find_patient(id).map(PatientInput::from)
    }

    /// Prefilled form for editing an existing medication. The time list
    /// is copied, so editing the draft never touches the stored record.
    pub fn medication_draft(&self, id: &Uuid) -> Option<MedicationInput> {
        self.find_medication(id).map(MedicationInput::from)
    }

    // ── Mutations ───────────────────────────────────────────

    pub fn dispatch(&mut self, action: StoreAction) -> Result<ActionOutcome, StoreError> {
        match action {
            StoreAction::UpsertPatient { input, editing_id } => self
                .upsert_patient(input, editing_id)
                .map(|id| ActionOutcome::Upserted { id }),
            StoreAction::UpsertMedication { input, editing_id } => self
                .upsert_medication(input, editing_id)
                .map(|id| ActionOutcome::Upserted { id }),
            StoreAction::DeletePatient(id) => self
                .delete_patient(&id)
                .map(|medications_removed| ActionOutcome::PatientDeleted { medications_removed }),
            StoreAction::DeleteMedication(id) => self
                .delete_medication(&id)
                .map(|()| ActionOutcome::MedicationDeleted),
        }
    }

    /// Create a patient, or replace the fields of `editing_id` in place.
    /// Returns the patient's id. Names and rooms need not be unique.
    pub fn upsert_patient(
        &mut self,
        input: PatientInput,
        editing_id: Option<Uuid>,
    ) -> Result<Uuid, StoreError> {
        validate_patient(&input)?;

        match editing_id {
            Some(id) => {
                let slot = self
                    .patients
                    .iter_mut()
                    .find(|p| p.id == id)
                    .ok_or(StoreError::PatientNotFound(id))?;
                *slot = input.into_patient(id);
                tracing::debug!(patient_id = %id, "Patient updated");
                Ok(id)
            }
            None => {
                let id = self.fresh_id();
                self.patients.push(input.into_patient(id));
                tracing::debug!(patient_id = %id, "Patient added");
                Ok(id)
            }
        }
    }

    /// Create a medication, or replace `editing_id` in place. The stored
    /// id is always `editing_id` on update.
    pub fn upsert_medication(
        &mut self,
        input: MedicationInput,
        editing_id: Option<Uuid>,
    ) -> Result<Uuid, StoreError> {
        let patient_id = validate_medication(&input)?;
        if self.find_patient(&patient_id).is_none() {
            return Err(StoreError::UnknownPatient(patient_id));
        }

        match editing_id {
            Some(id) => {
                let slot = self
                    .medications
                    .iter_mut()
                    .find(|m| m.id == id)
                    .ok_or(StoreError::MedicationNotFound(id))?;
                *slot = input.into_medication(id, patient_id);
                tracing::debug!(medication_id = %id, "Medication updated");
                Ok(id)
            }
            None => {
                let id = self.fresh_id();
                self.medications.push(input.into_medication(id, patient_id));
                tracing::debug!(medication_id = %id, "Medication added");
                Ok(id)
            }
        }
    }

    /// Remove a patient together with every medication that references
    /// it. Returns how many medications were removed.
    pub fn delete_patient(&mut self, id: &Uuid) -> Result<usize, StoreError> {
        let before = self.patients.len();
        self.patients.retain(|p| &p.id != id);
        if self.patients.len() == before {
            return Err(StoreError::PatientNotFound(*id));
        }

        let meds_before = self.medications.len();
        self.medications.retain(|m| &m.patient_id != id);
        let removed = meds_before - self.medications.len();

        tracing::debug!(patient_id = %id, medications_removed = removed, "Patient deleted");
        Ok(removed)
    }

    pub fn delete_medication(&mut self, id: &Uuid) -> Result<(), StoreError> {
        let before = self.medications.len();
        self.medications.retain(|m| &m.id != id);
        if self.medications.len() == before {
            return Err(StoreError::MedicationNotFound(*id));
        }
        tracing::debug!(medication_id = %id, "Medication deleted");
        Ok(())
    }

    /// A v4 id that no patient or medication currently uses.
    fn fresh_id(&self) -> Uuid {
        loop {
            let id = Uuid::new_v4();
            let taken = self.patients.iter().any(|p| p.id == id)
                || self.medications.iter().any(|m| m.id == id);
            if !taken {
                return id;
            }
        }
    }
}

// ═══════════════════════════════════════════
// Validation (form-level required fields)
// ═══════════════════════════════════════════

fn require(value: &str, field: &'static str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        Err(StoreError::BlankField(field))
    } else {
        Ok(())
    }
}

fn validate_patient(input: &PatientInput) -> Result<(), StoreError> {
    require(&input.name, "name")?;
    require(&input.room, "room")?;
    Ok(())
}

fn validate_medication(input: &MedicationInput) -> Result<Uuid, StoreError> {
    require(&input.name, "name")?;
    require(&input.dosage, "dosage")?;
    require(&input.frequency, "frequency")?;
    require(&input.instructions, "instructions")?;

    validate_schedule(&input.times)?;

    input.patient_id.ok_or(StoreError::MissingPatient)
}

fn validate_schedule(times: &[String]) -> Result<(), StoreError> {
    if times.is_empty() {
        return Err(StoreError::EmptySchedule);
    }
    for (index, value) in times.iter().enumerate() {
        if parse_time_slot(value).is_none() {
            return Err(StoreError::InvalidTime {
                index,
                value: value.clone(),
            });
        }
    }
    Ok(())
}
