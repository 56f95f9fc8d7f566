//! Presentation derivations over the store.
//!
//! Plain functions from `&CareStore` to serializable rows; no state of
//! their own.

use serde::Serialize;
use uuid::Uuid;

use crate::models::enums::AlarmStatus;
use crate::store::CareStore;

/// One row of the active-alarms table: a single (medication, time) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmRow {
    pub medication_id: Uuid,
    pub time: String,
    /// `"{name} - {dosage}"`.
    pub medication_label: String,
    pub patient_name: Option<String>,
    pub status: AlarmStatus,
}

/// Flattened medications × times, medication order first, then slot order.
/// Every row reports [`AlarmStatus::Active`].
pub fn alarms_view(store: &CareStore) -> Vec<AlarmRow> {
    store
        .medications()
        .iter()
        .flat_map(|med| {
            let label = med.label();
            let patient_name = store.patient_name(&med.patient_id).map(str::to_owned);
            med.times.iter().map(move |time| AlarmRow {
                medication_id: med.id,
                time: time.clone(),
                medication_label: label.clone(),
                patient_name: patient_name.clone(),
                status: AlarmStatus::Active,
            })
        })
        .collect()
}

/// Medication summary shown on a patient card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardMedication {
    pub medication_id: Uuid,
    pub label: String,
    /// Times joined with `", "`.
    pub schedule: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientCard {
    pub patient_id: Uuid,
    pub name: String,
    pub age: u32,
    pub room: String,
    pub medications: Vec<CardMedication>,
}

pub fn patient_cards(store: &CareStore) -> Vec<PatientCard> {
    store
        .patients()
        .iter()
        .map(|patient| PatientCard {
            patient_id: patient.id,
            name: patient.name.clone(),
            age: patient.age,
            room: patient.room.clone(),
            medications: store
                .medications_for_patient(&patient.id)
                .map(|med| CardMedication {
                    medication_id: med.id,
                    label: med.label(),
                    schedule: med.times.join(", "),
                })
                .collect(),
        })
        .collect()
}
