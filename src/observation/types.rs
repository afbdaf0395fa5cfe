use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

pub(crate) static BLOOD_PRESSURE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,3})/([0-9]{1,3})$").expect("blood pressure pattern must compile")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Female,
    Male,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Female, Gender::Male, Gender::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
            Gender::Other => "Other",
        }
    }

    /// Noun used when narrating a presentation ("a 35-year-old woman").
    pub fn noun(&self) -> &'static str {
        match self {
            Gender::Female => "woman",
            Gender::Male => "man",
            Gender::Other => "patient",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|gender| gender.as_str() == value)
            .ok_or_else(|| format!("unknown gender '{value}'"))
    }
}

/// A `systolic/diastolic` reading. Serialized in its textual form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BloodPressure {
    pub systolic: u16,
    pub diastolic: u16,
}

impl BloodPressure {
    pub fn new(systolic: u16, diastolic: u16) -> Self {
        Self {
            systolic,
            diastolic,
        }
    }

    /// Systolic minus diastolic. Negative when the reading is inverted, which is
    /// accepted as entered.
    pub fn pulse_pressure(&self) -> i32 {
        i32::from(self.systolic) - i32::from(self.diastolic)
    }
}

impl FromStr for BloodPressure {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let captures = BLOOD_PRESSURE_PATTERN
            .captures(value)
            .ok_or_else(|| format!("'{value}' is not in systolic/diastolic form"))?;
        let systolic = captures[1]
            .parse::<u16>()
            .map_err(|err| format!("invalid systolic value: {err}"))?;
        let diastolic = captures[2]
            .parse::<u16>()
            .map_err(|err| format!("invalid diastolic value: {err}"))?;
        Ok(Self::new(systolic, diastolic))
    }
}

impl TryFrom<String> for BloodPressure {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BloodPressure> for String {
    fn from(value: BloodPressure) -> Self {
        value.to_string()
    }
}

impl fmt::Display for BloodPressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.systolic, self.diastolic)
    }
}

/// A validated triage record. Only produced by
/// [`validate_observation`](crate::observation::validate_observation) or by
/// deserializing a body that already passed validation upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalObservation {
    pub chief_complaint: String,
    pub patient_age: f64,
    pub assigned_gender: Gender,
    pub heart_rate: f64,
    pub blood_pressure: BloodPressure,
    pub temperature: f64,
    pub oxygen_saturation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityProfile {
    pub age: f64,
    pub gender: Gender,
    pub race: String,
    pub zip_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityInput {
    #[serde(rename = "profileA")]
    pub profile_a: EquityProfile,
    #[serde(rename = "profileB")]
    pub profile_b: EquityProfile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientSearchInput {
    #[serde(rename = "patientId")]
    pub patient_id: String,
}
