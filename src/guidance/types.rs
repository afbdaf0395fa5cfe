use serde::{Deserialize, Serialize};

use crate::guidance::{
    band::RiskBand,
    chart::{BarChart, GaugeChart},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisparityAssessment {
    pub score: f64,
    pub band: RiskBand,
    pub summary: String,
    /// Opening point first, closing score point last.
    pub guidance: Vec<String>,
    pub chart: GaugeChart,
}

impl DisparityAssessment {
    /// Guidance rendered as a single paragraph.
    pub fn guidance_text(&self) -> String {
        self.guidance.join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityComparison {
    pub score_a: f64,
    pub score_b: f64,
    pub summary: String,
    pub chart: BarChart,
}
