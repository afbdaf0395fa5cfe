//! Rule-based guidance for a validated triage observation.
//!
//! Everything here is deterministic in `(observation, score)`. The score is
//! drawn by the caller so the narrative can be exercised without a random
//! source.

use crate::{
    guidance::{
        band::RiskBand,
        chart::GaugeChart,
        error::{SynthesisError, ensure_score},
        format::fixed,
        types::DisparityAssessment,
    },
    observation::{ClinicalObservation, Gender},
};

pub const WIDENED_PULSE_PRESSURE: i32 = 60;
pub const ELEVATED_SYSTOLIC: u16 = 160;
pub const EMERGENCY_SYSTOLIC: u16 = 180;
pub const EMERGENCY_DIASTOLIC: u16 = 120;
pub const FEVER_F: f64 = 100.4;
pub const LOW_GRADE_FEVER_F: f64 = 99.5;
pub const HYPOXIA_SATURATION: f64 = 94.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressureFinding {
    WidenedPulsePressure,
    Elevated,
}

impl PressureFinding {
    pub fn classify(observation: &ClinicalObservation) -> Option<Self> {
        let reading = observation.blood_pressure;
        if reading.pulse_pressure() > WIDENED_PULSE_PRESSURE {
            Some(PressureFinding::WidenedPulsePressure)
        } else if reading.systolic >= ELEVATED_SYSTOLIC {
            Some(PressureFinding::Elevated)
        } else {
            None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PressureFinding::WidenedPulsePressure => "markedly widened pulse pressure",
            PressureFinding::Elevated => "elevated blood pressure",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeverFinding {
    Fever,
    LowGrade,
}

impl FeverFinding {
    pub fn classify(temperature: f64) -> Option<Self> {
        if temperature >= FEVER_F {
            Some(FeverFinding::Fever)
        } else if temperature > LOW_GRADE_FEVER_F {
            Some(FeverFinding::LowGrade)
        } else {
            None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FeverFinding::Fever => "fever",
            FeverFinding::LowGrade => "low-grade fever",
        }
    }
}

pub fn synthesize(
    observation: &ClinicalObservation,
    score: f64,
) -> Result<DisparityAssessment, SynthesisError> {
    let score = ensure_score("score", score)?;
    let band = RiskBand::classify(score);

    let mut guidance = vec![opening_point(observation)];
    guidance.extend(conditional_points(observation));
    guidance.push(closing_point(score, band));

    tracing::debug!(
        target: "guidance",
        score = score,
        band = %band,
        points = guidance.len(),
        "guidance_synthesized"
    );

    Ok(DisparityAssessment {
        score,
        band,
        summary: summary_sentence(observation, score),
        guidance,
        chart: GaugeChart::disparity(score),
    })
}

fn opening_point(observation: &ClinicalObservation) -> String {
    let qualifiers: Vec<&str> = [
        FeverFinding::classify(observation.temperature).map(|finding| finding.label()),
        PressureFinding::classify(observation).map(|finding| finding.label()),
    ]
    .into_iter()
    .flatten()
    .collect();

    let mut point = format!(
        "A {}-year-old {} presenting with \"{}\"",
        observation.patient_age,
        observation.assigned_gender.noun(),
        observation.chief_complaint
    );
    if !qualifiers.is_empty() {
        point.push_str(&format!(" with {}", qualifiers.join(" and ")));
    }
    point.push_str(
        " should be triaged on objective findings first; confirm that the assigned acuity \
         matches the vital signs rather than the initial impression.",
    );
    point
}

fn conditional_points(observation: &ClinicalObservation) -> Vec<String> {
    let reading = observation.blood_pressure;
    let mut points = Vec::new();

    if observation.assigned_gender == Gender::Female
        && observation
            .chief_complaint
            .to_lowercase()
            .contains("atypical")
    {
        points.push(
            "Cardiac symptoms in women are frequently under-recognized when they present \
             atypically; obtain an early ECG and troponin before attributing the complaint \
             to anxiety or a non-cardiac cause."
                .to_string(),
        );
    }

    if observation.temperature >= FEVER_F {
        points.push(format!(
            "With a temperature of {}\u{b0}F, keep myocarditis and endocarditis on the \
             differential alongside sepsis instead of anchoring on a presumed infectious source.",
            observation.temperature
        ));
    }

    if reading.systolic >= EMERGENCY_SYSTOLIC || reading.diastolic >= EMERGENCY_DIASTOLIC {
        points.push(format!(
            "A systolic pressure of {} mmHg meets hypertensive emergency thresholds; assess for \
             end-organ damage and do not let the chief complaint lower the triage priority.",
            reading.systolic
        ));
    } else if reading.systolic >= ELEVATED_SYSTOLIC {
        points.push(format!(
            "An elevated SBP of {} mmHg warrants a repeat measurement and evaluation for \
             hypertensive urgency before disposition.",
            reading.systolic
        ));
    }

    if observation.oxygen_saturation <= HYPOXIA_SATURATION {
        points.push(format!(
            "An oxygen saturation of {}% is below expected; consider pulmonary embolism even \
             when the presentation has been attributed to a lower-acuity cause.",
            observation.oxygen_saturation
        ));
    }

    points
}

fn closing_point(score: f64, band: RiskBand) -> String {
    format!(
        "The calculated disparity risk score is {} ({} risk); avoid premature closure and \
         reassess the working diagnosis as new findings arrive.",
        fixed(score, 2),
        band
    )
}

fn summary_sentence(observation: &ClinicalObservation, score: f64) -> String {
    format!(
        "Based on the provided vitals, the patient ({}, {}) presenting with \"{}\" has a \
         calculated disparity risk score of {}.",
        observation.patient_age,
        observation.assigned_gender,
        observation.chief_complaint,
        fixed(score, 2)
    )
}
