use serde_json::{Map, Value};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::observation::{
    error::{FieldViolation, ValidationError, ViolationRule},
    types::{
        BLOOD_PRESSURE_PATTERN, BloodPressure, ClinicalObservation, EquityInput, EquityProfile,
        Gender, PatientSearchInput,
    },
};

pub const MAX_CHIEF_COMPLAINT_CHARS: u64 = 500;
pub const MAX_PATIENT_ID_CHARS: u64 = 128;
pub const MIN_AGE: f64 = 0.0;
pub const MAX_AGE: f64 = 150.0;
pub const MIN_HEART_RATE: f64 = 0.0;
pub const MAX_HEART_RATE: f64 = 300.0;
pub const MIN_TEMPERATURE_F: f64 = 90.0;
pub const MAX_TEMPERATURE_F: f64 = 110.0;
pub const MIN_OXYGEN_SATURATION: f64 = 0.0;
pub const MAX_OXYGEN_SATURATION: f64 = 100.0;

const OBSERVATION_FIELDS: [&str; 7] = [
    "chiefComplaint",
    "patientAge",
    "assignedGender",
    "heartRate",
    "bloodPressure",
    "temperature",
    "oxygenSaturation",
];

const PROFILE_FIELDS: [&str; 4] = ["age", "gender", "race", "zip_code"];

#[derive(Debug, Default, Validate)]
struct ObservationDraft {
    #[validate(length(max = MAX_CHIEF_COMPLAINT_CHARS))]
    chief_complaint: Option<String>,
    #[validate(range(min = MIN_AGE, max = MAX_AGE))]
    patient_age: Option<f64>,
    assigned_gender: Option<Gender>,
    #[validate(range(min = MIN_HEART_RATE, max = MAX_HEART_RATE))]
    heart_rate: Option<f64>,
    #[validate(regex(path = *BLOOD_PRESSURE_PATTERN))]
    blood_pressure: Option<String>,
    #[validate(range(min = MIN_TEMPERATURE_F, max = MAX_TEMPERATURE_F))]
    temperature: Option<f64>,
    #[validate(range(min = MIN_OXYGEN_SATURATION, max = MAX_OXYGEN_SATURATION))]
    oxygen_saturation: Option<f64>,
}

#[derive(Debug, Default, Validate)]
struct ProfileDraft {
    #[validate(range(min = MIN_AGE, max = MAX_AGE))]
    age: Option<f64>,
    gender: Option<Gender>,
    race: Option<String>,
    zip_code: Option<String>,
}

#[derive(Debug, Default, Validate)]
struct PatientSearchDraft {
    #[validate(length(max = MAX_PATIENT_ID_CHARS))]
    patient_id: Option<String>,
}

/// Validates and normalizes a raw triage form body.
///
/// Numeric fields accept JSON numbers or numeric strings. Every violated field
/// is reported; nothing short-circuits on the first failure.
pub fn validate_observation(raw: &Value) -> Result<ClinicalObservation, ValidationError> {
    let object = expect_object(raw)?;
    let mut violations = Vec::new();

    let draft = ObservationDraft {
        chief_complaint: text_field(object, "chiefComplaint", &mut violations),
        patient_age: number_field(object, "patientAge", &mut violations),
        assigned_gender: gender_field(object, "assignedGender", &mut violations),
        heart_rate: number_field(object, "heartRate", &mut violations),
        blood_pressure: text_field(object, "bloodPressure", &mut violations),
        temperature: number_field(object, "temperature", &mut violations),
        oxygen_saturation: number_field(object, "oxygenSaturation", &mut violations),
    };

    if let Err(errors) = draft.validate() {
        violations.extend(observation_violations(&errors));
    }

    let blood_pressure = match draft.blood_pressure.as_deref().map(str::parse::<BloodPressure>) {
        Some(Ok(reading)) => Some(reading),
        Some(Err(_)) => {
            if violations.iter().all(|violation| violation.field != "bloodPressure") {
                violations.push(blood_pressure_violation());
            }
            None
        }
        None => None,
    };

    match (
        draft.chief_complaint,
        draft.patient_age,
        draft.assigned_gender,
        draft.heart_rate,
        blood_pressure,
        draft.temperature,
        draft.oxygen_saturation,
    ) {
        (
            Some(chief_complaint),
            Some(patient_age),
            Some(assigned_gender),
            Some(heart_rate),
            Some(blood_pressure),
            Some(temperature),
            Some(oxygen_saturation),
        ) if violations.is_empty() => Ok(ClinicalObservation {
            chief_complaint,
            patient_age,
            assigned_gender,
            heart_rate,
            blood_pressure,
            temperature,
            oxygen_saturation,
        }),
        _ => Err(ordered(violations, &OBSERVATION_FIELDS)),
    }
}

/// Validates both equity profiles, reporting violations of either profile
/// under `profileA.` / `profileB.` prefixed field names.
pub fn validate_equity_input(raw: &Value) -> Result<EquityInput, ValidationError> {
    let object = expect_object(raw)?;
    let mut violations = Vec::new();

    let profile_a = profile_field(object, "profileA", &mut violations);
    let profile_b = profile_field(object, "profileB", &mut violations);

    match (profile_a, profile_b) {
        (Some(profile_a), Some(profile_b)) if violations.is_empty() => Ok(EquityInput {
            profile_a,
            profile_b,
        }),
        _ => Err(ValidationError::new(violations)),
    }
}

pub fn validate_patient_search(raw: &Value) -> Result<PatientSearchInput, ValidationError> {
    let object = expect_object(raw)?;
    let mut violations = Vec::new();

    let patient_id = match text_field(object, "patientId", &mut violations) {
        Some(id) if id.trim().is_empty() => {
            violations.push(FieldViolation::required("patientId"));
            None
        }
        other => other.map(|id| id.trim().to_string()),
    };
    let draft = PatientSearchDraft { patient_id };

    if draft.validate().is_err() {
        violations.push(FieldViolation::bad_length(
            "patientId",
            1,
            MAX_PATIENT_ID_CHARS as usize,
        ));
    }

    match draft.patient_id {
        Some(patient_id) if violations.is_empty() => Ok(PatientSearchInput { patient_id }),
        _ => Err(ValidationError::new(violations)),
    }
}

fn profile_field(
    object: &Map<String, Value>,
    name: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<EquityProfile> {
    let profile = match object.get(name) {
        None | Some(Value::Null) => {
            violations.push(FieldViolation::required(name));
            return None;
        }
        Some(Value::Object(profile)) => profile,
        Some(_) => {
            violations.push(FieldViolation::wrong_type(name, "object"));
            return None;
        }
    };

    match validate_profile(profile) {
        Ok(profile) => Some(profile),
        Err(profile_violations) => {
            violations.extend(
                profile_violations
                    .into_iter()
                    .map(|violation| violation.nested_under(name)),
            );
            None
        }
    }
}

fn validate_profile(object: &Map<String, Value>) -> Result<EquityProfile, Vec<FieldViolation>> {
    let mut violations = Vec::new();

    let draft = ProfileDraft {
        age: number_field(object, "age", &mut violations),
        gender: gender_field(object, "gender", &mut violations),
        race: text_field(object, "race", &mut violations),
        zip_code: text_field(object, "zip_code", &mut violations),
    };

    if draft.validate().is_err() {
        violations.push(FieldViolation::out_of_bounds("age", MIN_AGE, MAX_AGE));
    }

    match (draft.age, draft.gender, draft.race, draft.zip_code) {
        (Some(age), Some(gender), Some(race), Some(zip_code)) if violations.is_empty() => {
            Ok(EquityProfile {
                age,
                gender,
                race,
                zip_code,
            })
        }
        _ => Err(ordered(violations, &PROFILE_FIELDS).violations),
    }
}

fn observation_violations(errors: &ValidationErrors) -> Vec<FieldViolation> {
    errors
        .errors()
        .iter()
        .filter(|(_, kind)| matches!(kind, ValidationErrorsKind::Field(_)))
        .filter_map(|(field, _)| {
            let field: &str = field.as_ref();
            let violation = match field {
                "chief_complaint" => FieldViolation::bad_length(
                    "chiefComplaint",
                    1,
                    MAX_CHIEF_COMPLAINT_CHARS as usize,
                ),
                "patient_age" => FieldViolation::out_of_bounds("patientAge", MIN_AGE, MAX_AGE),
                "heart_rate" => {
                    FieldViolation::out_of_bounds("heartRate", MIN_HEART_RATE, MAX_HEART_RATE)
                }
                "blood_pressure" => blood_pressure_violation(),
                "temperature" => FieldViolation::out_of_bounds(
                    "temperature",
                    MIN_TEMPERATURE_F,
                    MAX_TEMPERATURE_F,
                ),
                "oxygen_saturation" => FieldViolation::out_of_bounds(
                    "oxygenSaturation",
                    MIN_OXYGEN_SATURATION,
                    MAX_OXYGEN_SATURATION,
                ),
                _ => return None,
            };
            Some(violation)
        })
        .collect()
}

fn blood_pressure_violation() -> FieldViolation {
    FieldViolation::new(
        "bloodPressure",
        ViolationRule::Pattern {
            pattern: BLOOD_PRESSURE_PATTERN.as_str().to_string(),
        },
        "bloodPressure format must be systolic/diastolic (e.g. 120/80)",
    )
}

fn expect_object(raw: &Value) -> Result<&Map<String, Value>, ValidationError> {
    raw.as_object().ok_or_else(|| {
        ValidationError::new(vec![FieldViolation::wrong_type("body", "JSON object")])
    })
}

fn number_field(
    object: &Map<String, Value>,
    field: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<f64> {
    let coerced = match object.get(field) {
        None | Some(Value::Null) => Err(FieldViolation::required(field)),
        Some(Value::Number(number)) => number
            .as_f64()
            .ok_or_else(|| FieldViolation::wrong_type(field, "number")),
        Some(Value::String(text)) if text.trim().is_empty() => Err(FieldViolation::required(field)),
        Some(Value::String(text)) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| FieldViolation::wrong_type(field, "number")),
        Some(_) => Err(FieldViolation::wrong_type(field, "number")),
    };
    keep(coerced, violations)
}

fn text_field(
    object: &Map<String, Value>,
    field: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<String> {
    let coerced = match object.get(field) {
        None | Some(Value::Null) => Err(FieldViolation::required(field)),
        Some(Value::String(text)) if text.is_empty() => Err(FieldViolation::required(field)),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(_) => Err(FieldViolation::wrong_type(field, "string")),
    };
    keep(coerced, violations)
}

fn gender_field(
    object: &Map<String, Value>,
    field: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<Gender> {
    let allowed = Gender::ALL.map(|gender| gender.as_str());
    let coerced = match object.get(field) {
        None | Some(Value::Null) => Err(FieldViolation::required(field)),
        Some(Value::String(text)) if text.is_empty() => Err(FieldViolation::required(field)),
        Some(Value::String(text)) => text
            .parse::<Gender>()
            .map_err(|_| FieldViolation::not_allowed(field, &allowed)),
        Some(_) => Err(FieldViolation::not_allowed(field, &allowed)),
    };
    keep(coerced, violations)
}

fn keep<T>(coerced: Result<T, FieldViolation>, violations: &mut Vec<FieldViolation>) -> Option<T> {
    match coerced {
        Ok(value) => Some(value),
        Err(violation) => {
            violations.push(violation);
            None
        }
    }
}

fn ordered(mut violations: Vec<FieldViolation>, order: &[&str]) -> ValidationError {
    violations.sort_by_key(|violation| {
        order
            .iter()
            .position(|field| *field == violation.field)
            .unwrap_or(order.len())
    });
    ValidationError::new(violations)
}
