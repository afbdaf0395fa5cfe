use async_trait::async_trait;

use crate::{
    backend::{
        error::BackendError,
        types::{EquityResponse, TriageResponse},
    },
    observation::{ClinicalObservation, EquityInput, PatientSearchInput},
    records::PatientSummary,
};

/// Whatever answers the three form submissions. Inputs are already validated.
#[async_trait]
pub trait AssessmentBackend: Send + Sync {
    fn name(&self) -> &'static str;

    async fn triage_score(
        &self,
        input: ClinicalObservation,
    ) -> Result<TriageResponse, BackendError>;

    async fn patient_summary(
        &self,
        input: PatientSearchInput,
    ) -> Result<PatientSummary, BackendError>;

    async fn explore_equity(&self, input: EquityInput) -> Result<EquityResponse, BackendError>;
}
