use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::Instant;

use crate::{
    backend::{error::BackendError, ports::AssessmentBackend},
    observation::{
        BloodPressure, ClinicalObservation, EquityInput, EquityProfile, Gender,
        PatientSearchInput,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeReport {
    pub name: String,
    pub status: ProbeStatus,
    pub duration_ms: u64,
    pub result: Option<Value>,
    pub error: Option<String>,
}

pub fn sample_observation() -> ClinicalObservation {
    ClinicalObservation {
        chief_complaint: "atypical chest pain".to_string(),
        patient_age: 35.0,
        assigned_gender: Gender::Female,
        heart_rate: 80.0,
        blood_pressure: BloodPressure::new(120, 80),
        temperature: 98.6,
        oxygen_saturation: 98.0,
    }
}

pub fn sample_equity_input() -> EquityInput {
    let profile = |race: &str| EquityProfile {
        age: 35.0,
        gender: Gender::Female,
        race: race.to_string(),
        zip_code: "90210".to_string(),
    };
    EquityInput {
        profile_a: profile("Caucasian"),
        profile_b: profile("African American"),
    }
}

/// Exercises every endpoint once, in order, with canned inputs. A failing
/// probe does not stop the ones after it.
pub async fn run_all(backend: &dyn AssessmentBackend) -> Vec<ProbeReport> {
    let mut reports = Vec::with_capacity(3);

    let started = Instant::now();
    let outcome = backend.triage_score(sample_observation()).await;
    reports.push(report("POST /triage-score", started, outcome));

    let started = Instant::now();
    let outcome = backend
        .patient_summary(PatientSearchInput {
            patient_id: "synthetic-id-123".to_string(),
        })
        .await;
    reports.push(report("POST /patient-summary", started, outcome));

    let started = Instant::now();
    let outcome = backend.explore_equity(sample_equity_input()).await;
    reports.push(report("POST /explore-equity", started, outcome));

    for probe in &reports {
        tracing::info!(
            target: "diagnostics",
            backend = backend.name(),
            probe = %probe.name,
            status = ?probe.status,
            duration_ms = probe.duration_ms,
            "probe_finished"
        );
    }

    reports
}

fn report<T: Serialize>(
    name: &str,
    started: Instant,
    outcome: Result<T, BackendError>,
) -> ProbeReport {
    let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    match outcome {
        Ok(body) => match serde_json::to_value(&body) {
            Ok(result) => ProbeReport {
                name: name.to_string(),
                status: ProbeStatus::Success,
                duration_ms,
                result: Some(result),
                error: None,
            },
            Err(err) => ProbeReport {
                name: name.to_string(),
                status: ProbeStatus::Error,
                duration_ms,
                result: None,
                error: Some(format!("failed to encode response: {err}")),
            },
        },
        Err(err) => ProbeReport {
            name: name.to_string(),
            status: ProbeStatus::Error,
            duration_ms,
            result: None,
            error: Some(err.to_string()),
        },
    }
}
