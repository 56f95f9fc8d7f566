use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A resident under care. `room` is a free-form label ("101", "B-2").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    pub age: u32,
    pub room: String,
}

/// Patient form contents: every field except the id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientInput {
    pub name: String,
    pub age: u32,
    pub room: String,
}

impl PatientInput {
    pub fn new(name: impl Into<String>, age: u32, room: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age,
            room: room.into(),
        }
    }

    pub fn into_patient(self, id: Uuid) -> Patient {
        Patient {
            id,
            name: self.name,
            age: self.age,
            room: self.room,
        }
    }
}

impl From<&Patient> for PatientInput {
    fn from(patient: &Patient) -> Self {
        Self {
            name: patient.name.clone(),
            age: patient.age,
            room: patient.room.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_input_is_blank_form() {
        let input = PatientInput::default();
        assert!(input.name.is_empty());
        assert_eq!(input.age, 0);
        assert!(input.room.is_empty());
    }

    #[test]
    fn input_from_patient_drops_id() {
        let patient = PatientInput::new("Maria Silva", 75, "101").into_patient(Uuid::new_v4());
        let input = PatientInput::from(&patient);
        assert_eq!(input, PatientInput::new("Maria Silva", 75, "101"));
    }

    #[test]
    fn serializes_camel_case() {
        let patient = PatientInput::new("X", 30, "9").into_patient(Uuid::nil());
        let json = serde_json::to_value(&patient).unwrap();
        assert_eq!(json["name"], "X");
        assert_eq!(json["age"], 30);
        assert_eq!(json["room"], "9");
        assert_eq!(json["id"], Uuid::nil().to_string());
    }
}
