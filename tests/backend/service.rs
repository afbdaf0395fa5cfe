use apds::{
    backend::LatencyConfig,
    observation::ViolationRule,
    service::{AssessmentService, Form, ServiceError},
};
use serde_json::json;

use super::{equity_input, local_backend, scripted_backend, triage_input};

#[tokio::test(start_paused = true)]
async fn given_pending_triage_when_submitted_again_then_second_is_rejected_busy() {
    let service = AssessmentService::new(local_backend(LatencyConfig::default(), 0.5));
    let input = triage_input();

    let (first, second) = tokio::join!(service.submit_triage(&input), service.submit_triage(&input));

    let first = first.expect("first submission should complete");
    assert_eq!(first.assessment.score, 0.5);
    assert!(matches!(second, Err(ServiceError::Busy(Form::Triage))));
    assert!(!service.is_pending(Form::Triage));
}

#[tokio::test(start_paused = true)]
async fn given_pending_triage_when_equity_submitted_then_forms_do_not_block_each_other() {
    let service = AssessmentService::new(local_backend(LatencyConfig::default(), 0.3));
    let triage = triage_input();
    let equity = equity_input();

    let (triage, equity) = tokio::join!(service.submit_triage(&triage), service.submit_equity(&equity));

    assert!(triage.is_ok());
    assert!(equity.is_ok());
}

#[tokio::test]
async fn given_invalid_input_when_submitted_then_form_is_not_left_pending() {
    let service = AssessmentService::new(local_backend(LatencyConfig::none(), 0.5));
    let mut input = triage_input();
    input["patientAge"] = json!(200);

    let err = service
        .submit_triage(&input)
        .await
        .expect_err("age 200 should be rejected");

    let ServiceError::Validation(validation) = err else {
        panic!("expected a validation error, got {err:?}");
    };
    assert_eq!(validation.fields(), vec!["patientAge"]);
    assert!(matches!(
        validation.violations[0].rule,
        ViolationRule::Bounds { .. }
    ));
    assert!(!service.is_pending(Form::Triage));
}

#[tokio::test]
async fn given_backend_failure_when_submitted_then_error_is_surfaced_and_form_released() {
    let service = AssessmentService::new(scripted_backend(&[2.0, 0.4]));

    let err = service
        .submit_triage(&triage_input())
        .await
        .expect_err("out of range score should fail");
    assert!(matches!(err, ServiceError::Backend(_)));
    assert!(!service.is_pending(Form::Triage));

    let retried = service
        .submit_triage(&triage_input())
        .await
        .expect("retry should succeed");
    assert_eq!(retried.assessment.score, 0.4);
}

#[tokio::test]
async fn given_valid_patient_id_when_searched_then_summary_is_returned() {
    let service = AssessmentService::new(local_backend(LatencyConfig::none(), 0.5));

    let summary = service
        .submit_patient_search(&json!({"patientId": "  MRN-0042  "}))
        .await
        .expect("search should succeed");

    assert_eq!(summary.patient_id, "MRN-0042");
    assert_eq!(summary.sections.len(), 3);
    assert!(summary.summary.contains("MRN-0042"));
}

#[tokio::test]
async fn given_blank_patient_id_when_searched_then_required_violation() {
    let service = AssessmentService::new(local_backend(LatencyConfig::none(), 0.5));

    let err = service
        .submit_patient_search(&json!({"patientId": "   "}))
        .await
        .expect_err("blank id should be rejected");

    let ServiceError::Validation(validation) = err else {
        panic!("expected a validation error, got {err:?}");
    };
    assert_eq!(validation.violations[0].rule, ViolationRule::Required);
    assert!(!service.is_pending(Form::PatientSearch));
}

#[tokio::test]
async fn given_equity_profiles_when_submitted_then_comparison_uses_both_scores() {
    let service = AssessmentService::new(scripted_backend(&[0.25, 0.55]));

    let response = service
        .submit_equity(&equity_input())
        .await
        .expect("equity should succeed");

    assert_eq!(response.comparison.score_a, 0.25);
    assert_eq!(response.comparison.score_b, 0.55);
    assert_eq!(response.equity_input.profile_b.race, "African American");
}

#[tokio::test]
async fn given_local_backend_when_diagnostics_run_then_every_probe_succeeds() {
    let service = AssessmentService::new(local_backend(LatencyConfig::none(), 0.5));

    let reports = service.run_diagnostics().await.expect("diagnostics should run");

    assert_eq!(reports.len(), 3);
    assert_eq!(service.backend_name(), "local");
    assert!(!service.is_pending(Form::Diagnostics));
}
