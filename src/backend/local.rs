use std::{sync::Arc, time::Duration};

use async_trait::async_trait;

use crate::{
    backend::{
        error::{BackendError, internal_error},
        ports::AssessmentBackend,
        types::{EquityResponse, LatencyConfig, TriageResponse},
    },
    guidance::{compare_profiles, synthesize},
    observation::{ClinicalObservation, EquityInput, PatientSearchInput},
    records::{PatientSummary, summarize_patient},
    scoring::{ScoreRange, ScoreSource},
};

/// Answers in-process after a fixed simulated delay. Requests are not
/// cancellable once the delay has started.
pub struct LocalBackend {
    latency: LatencyConfig,
    scores: Arc<dyn ScoreSource>,
}

impl LocalBackend {
    pub fn new(latency: LatencyConfig, scores: Arc<dyn ScoreSource>) -> Self {
        Self { latency, scores }
    }

    async fn simulate_latency(&self, millis: u64) {
        if millis > 0 {
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }
    }
}

#[async_trait]
impl AssessmentBackend for LocalBackend {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn triage_score(
        &self,
        input: ClinicalObservation,
    ) -> Result<TriageResponse, BackendError> {
        self.simulate_latency(self.latency.triage_ms).await;

        let score = self.scores.draw(ScoreRange::TRIAGE);
        let assessment = synthesize(&input, score)
            .map_err(|err| internal_error(err.to_string()).with_endpoint("/triage-score"))?;
        Ok(TriageResponse::new(input, assessment))
    }

    async fn patient_summary(
        &self,
        input: PatientSearchInput,
    ) -> Result<PatientSummary, BackendError> {
        self.simulate_latency(self.latency.patient_summary_ms).await;
        Ok(summarize_patient(&input))
    }

    async fn explore_equity(&self, input: EquityInput) -> Result<EquityResponse, BackendError> {
        self.simulate_latency(self.latency.equity_ms).await;

        let score_a = self.scores.draw(ScoreRange::EQUITY_PROFILE_A);
        let score_b = self.scores.draw(ScoreRange::EQUITY_PROFILE_B);
        let comparison = compare_profiles(&input, score_a, score_b)
            .map_err(|err| internal_error(err.to_string()).with_endpoint("/explore-equity"))?;
        Ok(EquityResponse::new(input, comparison))
    }
}
