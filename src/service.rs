use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    backend::{
        AssessmentBackend, BackendError, EquityResponse, TriageResponse,
        diagnostics::{self, ProbeReport},
    },
    observation::{
        ValidationError, validate_equity_input, validate_observation, validate_patient_search,
    },
    records::PatientSummary,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Form {
    Triage,
    PatientSearch,
    Equity,
    Diagnostics,
}

impl Form {
    const COUNT: usize = 4;

    fn slot(&self) -> usize {
        match self {
            Form::Triage => 0,
            Form::PatientSearch => 1,
            Form::Equity => 2,
            Form::Diagnostics => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Form::Triage => "triage",
            Form::PatientSearch => "patient_search",
            Form::Equity => "equity",
            Form::Diagnostics => "diagnostics",
        }
    }
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("a {0} submission is already pending")]
    Busy(Form),
}

/// Held for the lifetime of one submission; releases the form on drop.
struct SubmissionPermit<'a> {
    pending: &'a AtomicBool,
}

impl Drop for SubmissionPermit<'_> {
    fn drop(&mut self) {
        self.pending.store(false, Ordering::Release);
    }
}

/// Validates form input and forwards it to the backend, allowing at most one
/// outstanding submission per form.
pub struct AssessmentService {
    backend: Arc<dyn AssessmentBackend>,
    pending: [AtomicBool; Form::COUNT],
}

impl AssessmentService {
    pub fn new(backend: Arc<dyn AssessmentBackend>) -> Self {
        Self {
            backend,
            pending: std::array::from_fn(|_| AtomicBool::new(false)),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn is_pending(&self, form: Form) -> bool {
        self.pending[form.slot()].load(Ordering::Acquire)
    }

    pub async fn submit_triage(&self, raw: &Value) -> Result<TriageResponse, ServiceError> {
        let observation = validate_observation(raw).inspect_err(|err| rejected(Form::Triage, err))?;
        let _permit = self.begin(Form::Triage)?;
        let submission_id = Uuid::now_v7();
        tracing::info!(target: "service", %submission_id, form = %Form::Triage, "submission_started");

        let response = self
            .backend
            .triage_score(observation)
            .await
            .inspect_err(|err| failed(Form::Triage, submission_id, err))?;

        tracing::info!(
            target: "service",
            %submission_id,
            score = response.assessment.score,
            band = %response.assessment.band,
            guidance_points = response.assessment.guidance.len(),
            "triage_assessed"
        );
        Ok(response)
    }

    pub async fn submit_patient_search(&self, raw: &Value) -> Result<PatientSummary, ServiceError> {
        let input = validate_patient_search(raw)
            .inspect_err(|err| rejected(Form::PatientSearch, err))?;
        let _permit = self.begin(Form::PatientSearch)?;
        let submission_id = Uuid::now_v7();
        tracing::info!(target: "service", %submission_id, form = %Form::PatientSearch, "submission_started");

        let summary = self
            .backend
            .patient_summary(input)
            .await
            .inspect_err(|err| failed(Form::PatientSearch, submission_id, err))?;

        tracing::info!(target: "service", %submission_id, sections = summary.sections.len(), "patient_summarized");
        Ok(summary)
    }

    pub async fn submit_equity(&self, raw: &Value) -> Result<EquityResponse, ServiceError> {
        let input = validate_equity_input(raw).inspect_err(|err| rejected(Form::Equity, err))?;
        let _permit = self.begin(Form::Equity)?;
        let submission_id = Uuid::now_v7();
        tracing::info!(target: "service", %submission_id, form = %Form::Equity, "submission_started");

        let response = self
            .backend
            .explore_equity(input)
            .await
            .inspect_err(|err| failed(Form::Equity, submission_id, err))?;

        tracing::info!(
            target: "service",
            %submission_id,
            score_a = response.comparison.score_a,
            score_b = response.comparison.score_b,
            "equity_compared"
        );
        Ok(response)
    }

    pub async fn run_diagnostics(&self) -> Result<Vec<ProbeReport>, ServiceError> {
        let _permit = self.begin(Form::Diagnostics)?;
        Ok(diagnostics::run_all(self.backend.as_ref()).await)
    }

    fn begin(&self, form: Form) -> Result<SubmissionPermit<'_>, ServiceError> {
        let pending = &self.pending[form.slot()];
        if pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!(target: "service", form = %form, "submission_rejected_busy");
            return Err(ServiceError::Busy(form));
        }
        Ok(SubmissionPermit { pending })
    }
}

fn rejected(form: Form, err: &ValidationError) {
    tracing::info!(
        target: "service",
        form = %form,
        fields = ?err.fields(),
        "submission_rejected_invalid"
    );
}

fn failed(form: Form, submission_id: Uuid, err: &BackendError) {
    tracing::warn!(
        target: "service",
        %submission_id,
        form = %form,
        kind = ?err.kind,
        error = %err,
        "submission_failed"
    );
}
