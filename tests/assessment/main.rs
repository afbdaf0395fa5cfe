mod validator;

use apds::observation::{BloodPressure, ClinicalObservation, Gender};
use serde_json::{Value, json};

pub fn baseline_input() -> Value {
    json!({
        "chiefComplaint": "atypical chest pain",
        "patientAge": 35,
        "assignedGender": "Female",
        "heartRate": 80,
        "bloodPressure": "120/80",
        "temperature": 98.6,
        "oxygenSaturation": 98
    })
}

pub fn observation(complaint: &str, gender: Gender) -> ClinicalObservation {
    ClinicalObservation {
        chief_complaint: complaint.to_string(),
        patient_age: 52.0,
        assigned_gender: gender,
        heart_rate: 88.0,
        blood_pressure: BloodPressure::new(124, 78),
        temperature: 98.4,
        oxygen_saturation: 99.0,
    }
}
