pub mod error;
pub mod types;
pub mod validator;

pub use error::{FieldViolation, ValidationError, ViolationRule};
pub use types::{
    BloodPressure, ClinicalObservation, EquityInput, EquityProfile, Gender, PatientSearchInput,
};
pub use validator::{validate_equity_input, validate_observation, validate_patient_search};
