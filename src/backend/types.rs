use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    guidance::{BarChart, DisparityAssessment, EquityComparison, GaugeChart, RiskBand},
    observation::{ClinicalObservation, EquityInput},
};

fn default_triage_ms() -> u64 {
    1_000
}

fn default_patient_summary_ms() -> u64 {
    800
}

fn default_equity_ms() -> u64 {
    1_200
}

fn default_timeout_ms() -> u64 {
    30_000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackendConfig {
    Local(LocalBackendConfig),
    Http(HttpBackendConfig),
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::Local(LocalBackendConfig::default())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LocalBackendConfig {
    #[serde(default)]
    pub latency: LatencyConfig,
    /// Fixes the score sequence for reproducible runs.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Fixed simulated round-trip per endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencyConfig {
    #[serde(default = "default_triage_ms")]
    pub triage_ms: u64,
    #[serde(default = "default_patient_summary_ms")]
    pub patient_summary_ms: u64,
    #[serde(default = "default_equity_ms")]
    pub equity_ms: u64,
}

impl LatencyConfig {
    pub fn none() -> Self {
        Self {
            triage_ms: 0,
            patient_summary_ms: 0,
            equity_ms: 0,
        }
    }
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            triage_ms: default_triage_ms(),
            patient_summary_ms: default_patient_summary_ms(),
            equity_ms: default_equity_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpBackendConfig {
    pub base_url: String,
    #[serde(default)]
    pub credential: CredentialRef,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialRef {
    #[default]
    None,
    /// Username in config, password in the named environment variable.
    Env {
        username: String,
        password_var: String,
    },
    /// `user:password` in the named environment variable.
    BasicEnv { var: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCredential {
    pub username: String,
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RemoteTriageResponse")]
pub struct TriageResponse {
    pub triage_input: ClinicalObservation,
    #[serde(flatten)]
    pub assessment: DisparityAssessment,
    pub expert_guidance: String,
    #[serde(rename = "echartsOption", default)]
    pub echarts_option: Value,
}

impl TriageResponse {
    pub fn new(triage_input: ClinicalObservation, assessment: DisparityAssessment) -> Self {
        Self {
            triage_input,
            expert_guidance: assessment.guidance_text(),
            echarts_option: assessment.chart.to_echarts_option(),
            assessment,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RemoteEquityResponse")]
pub struct EquityResponse {
    pub equity_input: EquityInput,
    #[serde(flatten)]
    pub comparison: EquityComparison,
    #[serde(rename = "echartsOption", default)]
    pub echarts_option: Value,
}

impl EquityResponse {
    pub fn new(equity_input: EquityInput, comparison: EquityComparison) -> Self {
        Self {
            equity_input,
            echarts_option: comparison.chart.to_echarts_option(),
            comparison,
        }
    }
}

/// Triage body as a scoring service may send it. Only `score` and `summary`
/// are required of the assessment; the rest is rebuilt from the score.
#[derive(Deserialize)]
struct RemoteTriageResponse {
    triage_input: ClinicalObservation,
    score: f64,
    summary: String,
    band: Option<RiskBand>,
    guidance: Option<Vec<String>>,
    chart: Option<GaugeChart>,
    expert_guidance: Option<String>,
    #[serde(rename = "echartsOption", default)]
    echarts_option: Value,
}

impl From<RemoteTriageResponse> for TriageResponse {
    fn from(remote: RemoteTriageResponse) -> Self {
        let guidance = match (remote.guidance, &remote.expert_guidance) {
            (Some(guidance), _) => guidance,
            (None, Some(text)) if !text.trim().is_empty() => vec![text.clone()],
            (None, _) => Vec::new(),
        };
        let assessment = DisparityAssessment {
            score: remote.score,
            band: remote
                .band
                .unwrap_or_else(|| RiskBand::classify(remote.score)),
            summary: remote.summary,
            guidance,
            chart: remote
                .chart
                .unwrap_or_else(|| GaugeChart::disparity(remote.score)),
        };
        let expert_guidance = remote
            .expert_guidance
            .unwrap_or_else(|| assessment.guidance_text());
        let echarts_option = if remote.echarts_option.is_null() {
            assessment.chart.to_echarts_option()
        } else {
            remote.echarts_option
        };

        Self {
            triage_input: remote.triage_input,
            assessment,
            expert_guidance,
            echarts_option,
        }
    }
}

/// Equity body as a scoring service may send it. Scores missing from the body
/// are read back from the bar chart option.
#[derive(Deserialize)]
struct RemoteEquityResponse {
    equity_input: EquityInput,
    summary: String,
    score_a: Option<f64>,
    score_b: Option<f64>,
    chart: Option<BarChart>,
    #[serde(rename = "echartsOption", default)]
    echarts_option: Value,
}

impl TryFrom<RemoteEquityResponse> for EquityResponse {
    type Error = String;

    fn try_from(remote: RemoteEquityResponse) -> Result<Self, Self::Error> {
        let score_a = remote
            .score_a
            .or_else(|| charted_score(&remote.echarts_option, "Profile A"))
            .ok_or_else(|| "equity response has no score for Profile A".to_string())?;
        let score_b = remote
            .score_b
            .or_else(|| charted_score(&remote.echarts_option, "Profile B"))
            .ok_or_else(|| "equity response has no score for Profile B".to_string())?;

        let comparison = EquityComparison {
            score_a,
            score_b,
            summary: remote.summary,
            chart: remote
                .chart
                .unwrap_or_else(|| BarChart::profile_comparison(score_a, score_b)),
        };
        let echarts_option = if remote.echarts_option.is_null() {
            comparison.chart.to_echarts_option()
        } else {
            remote.echarts_option
        };

        Ok(Self {
            equity_input: remote.equity_input,
            comparison,
            echarts_option,
        })
    }
}

fn charted_score(option: &Value, category: &str) -> Option<f64> {
    let position = option["yAxis"]["data"]
        .as_array()?
        .iter()
        .position(|name| name.as_str() == Some(category))?;
    option["series"][0]["data"][position]["value"].as_f64()
}
