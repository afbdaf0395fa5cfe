use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SynthesisErrorKind {
    ContractViolation,
}

/// Raised when the synthesizer is handed input that upstream validation or the
/// score source should have made impossible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisError {
    pub kind: SynthesisErrorKind,
    pub message: String,
}

impl SynthesisError {
    pub fn new(kind: SynthesisErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for SynthesisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SynthesisError {}

pub fn contract_violation(message: impl Into<String>) -> SynthesisError {
    SynthesisError::new(SynthesisErrorKind::ContractViolation, message)
}

/// Scores are opaque inputs but must be finite and inside [0, 1].
pub fn ensure_score(name: &str, score: f64) -> Result<f64, SynthesisError> {
    if score.is_finite() && (0.0..=1.0).contains(&score) {
        Ok(score)
    } else {
        Err(contract_violation(format!(
            "{name} must be a finite value in [0, 1], got {score}"
        )))
    }
}
