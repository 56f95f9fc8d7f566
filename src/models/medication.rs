use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Format of a scheduled time-of-day slot (24-hour, zero-padded).
pub const TIME_SLOT_FORMAT: &str = "%H:%M";

/// A medication scheduled for one patient.
///
/// `frequency` is a display label ("Diário", "12/12h") and is never
/// interpreted; `times` alone drives the alarms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: Uuid,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub times: Vec<String>,
    pub instructions: String,
    pub patient_id: Uuid,
}

impl Medication {
    /// `"{name} - {dosage}"`, the label used on cards and alarm rows.
    pub fn label(&self) -> String {
        format!("{} - {}", self.name, self.dosage)
    }

    pub fn is_scheduled_at(&self, slot: &str) -> bool {
        self.times.iter().any(|t| t == slot)
    }
}

/// In-progress medication form (the "draft").
///
/// A fresh draft carries one empty time slot so the form always shows
/// at least one time input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationInput {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub times: Vec<String>,
    pub instructions: String,
    pub patient_id: Option<Uuid>,
}

impl Default for MedicationInput {
    fn default() -> Self {
        Self {
            name: String::new(),
            dosage: String::new(),
            frequency: String::new(),
            times: vec![String::new()],
            instructions: String::new(),
            patient_id: None,
        }
    }
}

impl MedicationInput {
    /// Append an empty time slot.
    pub fn add_time_slot(&mut self) {
        self.times.push(String::new());
    }

    /// Remove the slot at `index`, returning its value.
    ///
    /// Any index may be removed here, including 0; the form only offers
    /// removal where [`can_remove_time_slot`](Self::can_remove_time_slot)
    /// says so.
    pub fn remove_time_slot(&mut self, index: usize) -> Option<String> {
        if index < self.times.len() {
            Some(self.times.remove(index))
        } else {
            None
        }
    }

    /// Overwrite the slot at `index`, returning the previous value.
    /// Out-of-range indexes leave the draft untouched.
    pub fn set_time_slot(&mut self, index: usize, value: impl Into<String>) -> Option<String> {
        self.times
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, value.into()))
    }

    /// Whether the form shows a remove button for this slot.
    pub fn can_remove_time_slot(&self, index: usize) -> bool {
        index > 0 && index < self.times.len()
    }

    pub fn into_medication(self, id: Uuid, patient_id: Uuid) -> Medication {
        Medication {
            id,
            name: self.name,
            dosage: self.dosage,
            frequency: self.frequency,
            times: self.times,
            instructions: self.instructions,
            patient_id,
        }
    }
}

impl From<&Medication> for MedicationInput {
    fn from(med: &Medication) -> Self {
        Self {
            name: med.name.clone(),
            dosage: med.dosage.clone(),
            frequency: med.frequency.clone(),
            times: med.times.clone(),
            instructions: med.instructions.clone(),
            patient_id: Some(med.patient_id),
        }
    }
}

/// Parse a `HH:MM` slot. Rejects anything that is not exactly five
/// characters so `"8:00"` and `"08:00:00"` never reach the schedule.
pub fn parse_time_slot(slot: &str) -> Option<NaiveTime> {
    if slot.len() != 5 {
        return None;
    }
    NaiveTime::parse_from_str(slot, TIME_SLOT_FORMAT).ok()
}
