use crate::{
    guidance::{
        chart::BarChart,
        error::{SynthesisError, ensure_score},
        format::fixed,
        types::EquityComparison,
    },
    observation::EquityInput,
};

/// Builds the side-by-side comparison for two independently scored profiles.
pub fn compare_profiles(
    input: &EquityInput,
    score_a: f64,
    score_b: f64,
) -> Result<EquityComparison, SynthesisError> {
    let score_a = ensure_score("profile A score", score_a)?;
    let score_b = ensure_score("profile B score", score_b)?;

    let summary = format!(
        "Profile A ({}) shows a calculated disparity risk of {}, while Profile B ({}) shows a \
         risk of {}. This highlights potential systemic disparities in triage risk based on \
         demographic factors.",
        input.profile_a.race,
        fixed(score_a, 2),
        input.profile_b.race,
        fixed(score_b, 2)
    );

    Ok(EquityComparison {
        score_a,
        score_b,
        summary,
        chart: BarChart::profile_comparison(score_a, score_b),
    })
}
