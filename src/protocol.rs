use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{observation::FieldViolation, service::ServiceError};

#[derive(Debug, Clone, PartialEq)]
pub enum ClientRequest {
    TriageScore(Value),
    PatientSummary(Value),
    ExploreEquity(Value),
    Diagnostics,
    Exit,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireRequest {
    TriageScore { input: Value },
    PatientSummary { input: Value },
    ExploreEquity { input: Value },
    Diagnostics,
    Exit,
}

pub fn parse_client_request(line: &str) -> Result<ClientRequest, serde_json::Error> {
    let wire: WireRequest = serde_json::from_str(line)?;
    let request = match wire {
        WireRequest::TriageScore { input } => ClientRequest::TriageScore(input),
        WireRequest::PatientSummary { input } => ClientRequest::PatientSummary(input),
        WireRequest::ExploreEquity { input } => ClientRequest::ExploreEquity(input),
        WireRequest::Diagnostics => ClientRequest::Diagnostics,
        WireRequest::Exit => ClientRequest::Exit,
    };
    Ok(request)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    TriageScore,
    PatientSummary,
    ExploreEquity,
    Diagnostics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Validation,
    Busy,
    Backend,
    Protocol,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerResponse {
    Ok {
        kind: ResponseKind,
        body: Value,
    },
    Error {
        kind: FailureKind,
        message: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        violations: Vec<FieldViolation>,
    },
}

impl ServerResponse {
    pub fn ok<T: Serialize>(kind: ResponseKind, body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(body) => ServerResponse::Ok { kind, body },
            Err(err) => Self::protocol_error(format!("failed to encode response: {err}")),
        }
    }

    pub fn protocol_error(message: impl Into<String>) -> Self {
        ServerResponse::Error {
            kind: FailureKind::Protocol,
            message: message.into(),
            violations: Vec::new(),
        }
    }

    pub fn from_service_error(err: ServiceError) -> Self {
        let message = err.to_string();
        match err {
            ServiceError::Validation(validation) => ServerResponse::Error {
                kind: FailureKind::Validation,
                message,
                violations: validation.violations,
            },
            ServiceError::Backend(_) => ServerResponse::Error {
                kind: FailureKind::Backend,
                message,
                violations: Vec::new(),
            },
            ServiceError::Busy(_) => ServerResponse::Error {
                kind: FailureKind::Busy,
                message,
                violations: Vec::new(),
            },
        }
    }
}
