//! Maternal history rapid synthesis (MHRS-E) for a patient lookup.
//!
//! No record store exists; every lookup yields the same synthetic history,
//! labelled with the requested id.

use serde::{Deserialize, Serialize};

use crate::observation::PatientSearchInput;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarySection {
    pub heading: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientSummary {
    pub patient_id: String,
    /// Empty when a remote service returns only the rendered summary.
    #[serde(default)]
    pub sections: Vec<SummarySection>,
    /// `sections` rendered as an HTML fragment, with the patient id escaped.
    pub summary: String,
}

pub fn summarize_patient(input: &PatientSearchInput) -> PatientSummary {
    let sections = synthetic_history();
    let summary = render_html(&input.patient_id, &sections);
    PatientSummary {
        patient_id: input.patient_id.clone(),
        sections,
        summary,
    }
}

fn synthetic_history() -> Vec<SummarySection> {
    vec![
        section(
            "Key Risk Factors",
            &[
                "History of preeclampsia (2018)",
                "Gestational Diabetes Mellitus (GDM) in previous pregnancy",
                "Advanced Maternal Age (35)",
            ],
        ),
        section(
            "Past Complications",
            &[
                "Preterm labor at 34 weeks (2018)",
                "Postpartum hemorrhage requiring transfusion",
            ],
        ),
        section("Allergies", &["Penicillin (causes rash)"]),
    ]
}

fn section(heading: &str, items: &[&str]) -> SummarySection {
    SummarySection {
        heading: heading.to_string(),
        items: items.iter().map(|item| item.to_string()).collect(),
    }
}

fn render_html(patient_id: &str, sections: &[SummarySection]) -> String {
    let mut html = format!(
        "<h3>MHRS-E Summary for Patient ID: {}</h3>\n\
         <p>This is a synthetically generated summary for demonstration purposes.</p>\n",
        escape_html(patient_id)
    );
    for section in sections {
        html.push_str(&format!("<h4>{}:</h4>\n", escape_html(&section.heading)));
        if let [single] = section.items.as_slice() {
            html.push_str(&format!("<p>{}</p>\n", escape_html(single)));
            continue;
        }
        html.push_str("<ul>\n");
        for item in &section.items {
            html.push_str(&format!("<li>{}</li>\n", escape_html(item)));
        }
        html.push_str("</ul>\n");
    }
    html
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
