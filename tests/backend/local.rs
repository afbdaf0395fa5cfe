use std::time::Duration;

use apds::{
    backend::{BackendErrorKind, LatencyConfig},
    observation::{PatientSearchInput, validate_equity_input, validate_observation},
};
use tokio::time::Instant;

use super::{equity_input, local_backend, scripted_backend, triage_input};

#[tokio::test(start_paused = true)]
async fn given_default_latency_when_triage_scored_then_response_arrives_after_one_second() {
    let backend = local_backend(LatencyConfig::default(), 0.5);
    let observation = validate_observation(&triage_input()).expect("input should validate");

    let started = Instant::now();
    let response = backend
        .triage_score(observation.clone())
        .await
        .expect("local triage should succeed");

    assert!(started.elapsed() >= Duration::from_millis(1_000));
    assert_eq!(response.triage_input, observation);
    assert_eq!(response.assessment.score, 0.5);
    assert_eq!(response.expert_guidance, response.assessment.guidance.join(" "));
    assert_eq!(response.echarts_option["series"][0]["type"], "gauge");
}

#[tokio::test(start_paused = true)]
async fn given_default_latency_when_each_endpoint_called_then_delays_match_endpoint() {
    let backend = local_backend(LatencyConfig::default(), 0.3);

    let started = Instant::now();
    backend
        .patient_summary(PatientSearchInput {
            patient_id: "synthetic-id-123".to_string(),
        })
        .await
        .expect("summary should succeed");
    let summary_elapsed = started.elapsed();
    assert!(summary_elapsed >= Duration::from_millis(800));
    assert!(summary_elapsed < Duration::from_millis(1_000));

    let input = validate_equity_input(&equity_input()).expect("input should validate");
    let started = Instant::now();
    backend
        .explore_equity(input)
        .await
        .expect("equity should succeed");
    assert!(started.elapsed() >= Duration::from_millis(1_200));
}

#[tokio::test]
async fn given_scripted_scores_when_equity_explored_then_a_then_b_scores_are_used() {
    let backend = scripted_backend(&[0.15, 0.55]);
    let input = validate_equity_input(&equity_input()).expect("input should validate");

    let response = backend
        .explore_equity(input)
        .await
        .expect("equity should succeed");

    assert_eq!(response.comparison.score_a, 0.15);
    assert_eq!(response.comparison.score_b, 0.55);
    assert_eq!(response.echarts_option["yAxis"]["data"][0], "Profile B");
    assert_eq!(response.equity_input.profile_b.race, "African American");
}

#[tokio::test]
async fn given_score_source_out_of_contract_when_triage_scored_then_internal_error() {
    let backend = local_backend(LatencyConfig::none(), 2.0);
    let observation = validate_observation(&triage_input()).expect("input should validate");

    let err = backend
        .triage_score(observation)
        .await
        .expect_err("score 2.0 should violate the synthesizer contract");

    assert_eq!(err.kind, BackendErrorKind::Internal);
    assert_eq!(err.endpoint.as_deref(), Some("/triage-score"));
}
