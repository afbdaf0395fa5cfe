pub mod credentials;
pub mod diagnostics;
pub mod error;
pub mod http;
pub mod local;
pub mod ports;
pub mod types;

use std::sync::Arc;

use crate::scoring::{ScoreSource, UniformScoreSource};

pub use error::{BackendError, BackendErrorKind};
pub use http::HttpBackend;
pub use local::LocalBackend;
pub use ports::AssessmentBackend;
pub use types::{
    BackendConfig, CredentialRef, EquityResponse, HttpBackendConfig, LatencyConfig,
    LocalBackendConfig, ResolvedCredential, TriageResponse,
};

pub fn build_backend(config: &BackendConfig) -> Result<Arc<dyn AssessmentBackend>, BackendError> {
    match config {
        BackendConfig::Local(local) => {
            let scores: Arc<dyn ScoreSource> = match local.seed {
                Some(seed) => Arc::new(UniformScoreSource::seeded(seed)),
                None => Arc::new(UniformScoreSource::from_entropy()),
            };
            Ok(Arc::new(LocalBackend::new(local.latency.clone(), scores)))
        }
        BackendConfig::Http(http) => Ok(Arc::new(HttpBackend::new(http)?)),
    }
}
