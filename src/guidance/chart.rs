use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::guidance::{
    band::{HIGH_THRESHOLD, MODERATE_THRESHOLD},
    format::round_to,
};

const GAUGE_DATA_NAME: &str = "Disparity Risk";
const BAR_SERIES_NAME: &str = "Disparity Risk Score";
const PROFILE_A_COLOR: &str = "hsl(var(--primary))";
const PROFILE_B_COLOR: &str = "hsl(var(--destructive))";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorBand {
    /// Upper edge of the band on the gauge axis.
    pub threshold: f64,
    pub color: String,
}

/// Half-circle gauge with a single pointer at the score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeChart {
    pub min: f64,
    pub max: f64,
    pub start_angle: i32,
    pub end_angle: i32,
    pub split_number: u32,
    pub bands: Vec<ColorBand>,
    pub name: String,
    pub value: f64,
}

impl GaugeChart {
    pub fn disparity(score: f64) -> Self {
        Self {
            min: 0.0,
            max: 1.0,
            start_angle: 180,
            end_angle: 0,
            split_number: 5,
            bands: vec![
                ColorBand {
                    threshold: MODERATE_THRESHOLD,
                    color: "#67e8f9".to_string(),
                },
                ColorBand {
                    threshold: HIGH_THRESHOLD,
                    color: "#facc15".to_string(),
                },
                ColorBand {
                    threshold: 1.0,
                    color: "#f87171".to_string(),
                },
            ],
            name: GAUGE_DATA_NAME.to_string(),
            value: score,
        }
    }

    pub fn to_echarts_option(&self) -> Value {
        let colors: Vec<Value> = self
            .bands
            .iter()
            .map(|band| json!([band.threshold, band.color]))
            .collect();

        json!({
            "series": [{
                "type": "gauge",
                "startAngle": self.start_angle,
                "endAngle": self.end_angle,
                "min": self.min,
                "max": self.max,
                "splitNumber": self.split_number,
                "axisLine": {"lineStyle": {"width": 10, "color": colors}},
                "pointer": {
                    "icon": "path://M12.8,0.7l12,40.1H0.7L12.8,0.7z",
                    "length": "12%",
                    "width": 20,
                    "offsetCenter": [0, "-60%"],
                    "itemStyle": {"color": "auto"}
                },
                "axisTick": {"length": 12, "lineStyle": {"color": "auto", "width": 2}},
                "splitLine": {"length": 20, "lineStyle": {"color": "auto", "width": 5}},
                "axisLabel": {"show": false},
                "title": {"offsetCenter": [0, "-20%"], "fontSize": 20, "color": "#fff"},
                "detail": {
                    "fontSize": 30,
                    "offsetCenter": [0, "0%"],
                    "valueAnimation": true,
                    "color": "auto"
                },
                "data": [{"value": self.value, "name": self.name}]
            }]
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarEntry {
    pub category: String,
    pub value: f64,
    pub color: String,
}

/// Horizontal bars, one per profile, listed bottom-up in category-axis order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    pub series_name: String,
    pub entries: Vec<BarEntry>,
}

impl BarChart {
    /// Profile B is listed first so that profile A renders on top.
    pub fn profile_comparison(score_a: f64, score_b: f64) -> Self {
        Self {
            series_name: BAR_SERIES_NAME.to_string(),
            entries: vec![
                BarEntry {
                    category: "Profile B".to_string(),
                    value: round_to(score_b, 2),
                    color: PROFILE_B_COLOR.to_string(),
                },
                BarEntry {
                    category: "Profile A".to_string(),
                    value: round_to(score_a, 2),
                    color: PROFILE_A_COLOR.to_string(),
                },
            ],
        }
    }

    pub fn categories(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|entry| entry.category.as_str())
            .collect()
    }

    pub fn to_echarts_option(&self) -> Value {
        let data: Vec<Value> = self
            .entries
            .iter()
            .map(|entry| json!({"value": entry.value, "itemStyle": {"color": entry.color}}))
            .collect();

        json!({
            "tooltip": {
                "trigger": "axis",
                "axisPointer": {"type": "shadow"},
                "backgroundColor": "hsl(var(--card))",
                "borderColor": "hsl(var(--border))",
                "textStyle": {"color": "hsl(var(--card-foreground))"}
            },
            "grid": {"left": "3%", "right": "4%", "bottom": "3%", "containLabel": true},
            "xAxis": {
                "type": "value",
                "boundaryGap": [0, 0.01],
                "axisLabel": {"color": "hsl(var(--muted-foreground))"}
            },
            "yAxis": {
                "type": "category",
                "data": self.categories(),
                "axisLabel": {"color": "hsl(var(--muted-foreground))"}
            },
            "series": [{
                "name": self.series_name,
                "type": "bar",
                "data": data,
                "label": {
                    "show": true,
                    "position": "right",
                    "formatter": "{c}",
                    "color": "hsl(var(--foreground))"
                }
            }],
            "backgroundColor": "transparent"
        })
    }
}
