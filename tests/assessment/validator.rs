use apds::observation::{
    BloodPressure, Gender, ViolationRule, validate_equity_input, validate_observation,
};
use serde_json::json;

use super::baseline_input;

#[test]
fn given_form_defaults_when_validated_then_typed_observation_is_returned() {
    let observation = validate_observation(&baseline_input()).expect("defaults should validate");

    assert_eq!(observation.chief_complaint, "atypical chest pain");
    assert_eq!(observation.patient_age, 35.0);
    assert_eq!(observation.assigned_gender, Gender::Female);
    assert_eq!(observation.blood_pressure, BloodPressure::new(120, 80));
    assert_eq!(observation.temperature, 98.6);
    assert_eq!(observation.oxygen_saturation, 98.0);
}

#[test]
fn given_negative_age_when_validated_then_only_age_violation_is_reported() {
    let mut input = baseline_input();
    input["patientAge"] = json!(-1);

    let err = validate_observation(&input).expect_err("negative age should fail");

    assert_eq!(err.fields(), vec!["patientAge"]);
    assert_eq!(
        err.violations[0].rule,
        ViolationRule::Bounds {
            min: 0.0,
            max: 150.0
        }
    );
}

#[test]
fn given_many_bad_fields_when_validated_then_all_violations_are_reported_in_field_order() {
    let input = json!({
        "chiefComplaint": "fall",
        "patientAge": 151,
        "assignedGender": "Unknown",
        "heartRate": 72,
        "bloodPressure": "120-80",
        "temperature": 80
    });

    let err = validate_observation(&input).expect_err("input should fail");

    assert_eq!(
        err.fields(),
        vec![
            "patientAge",
            "assignedGender",
            "bloodPressure",
            "temperature",
            "oxygenSaturation"
        ]
    );
    assert!(matches!(
        err.violation_for("assignedGender").map(|v| &v.rule),
        Some(ViolationRule::Enumeration { .. })
    ));
    assert!(matches!(
        err.violation_for("bloodPressure").map(|v| &v.rule),
        Some(ViolationRule::Pattern { .. })
    ));
    assert_eq!(
        err.violation_for("oxygenSaturation").map(|v| &v.rule),
        Some(&ViolationRule::Required)
    );
}

#[test]
fn given_range_edges_when_validated_then_bounds_are_inclusive() {
    let mut input = baseline_input();
    input["patientAge"] = json!(150);
    input["heartRate"] = json!(0);
    input["temperature"] = json!(110);
    input["oxygenSaturation"] = json!(100);
    assert!(validate_observation(&input).is_ok());

    input["patientAge"] = json!(0);
    input["heartRate"] = json!(300);
    input["temperature"] = json!(90);
    input["oxygenSaturation"] = json!(0);
    assert!(validate_observation(&input).is_ok());

    input["heartRate"] = json!(300.5);
    let err = validate_observation(&input).expect_err("heart rate above 300 should fail");
    assert_eq!(err.fields(), vec!["heartRate"]);
}

#[test]
fn given_complaint_length_when_validated_then_limit_is_five_hundred_characters() {
    let mut input = baseline_input();
    input["chiefComplaint"] = json!("é".repeat(500));
    assert!(validate_observation(&input).is_ok());

    input["chiefComplaint"] = json!("a".repeat(501));
    let err = validate_observation(&input).expect_err("501 characters should fail");
    assert_eq!(
        err.violations[0].rule,
        ViolationRule::Length { min: 1, max: 500 }
    );

    input["chiefComplaint"] = json!("");
    let err = validate_observation(&input).expect_err("empty complaint should fail");
    assert_eq!(err.violations[0].rule, ViolationRule::Required);
}

#[test]
fn given_wrongly_typed_values_when_validated_then_type_violations_are_reported() {
    let mut input = baseline_input();
    input["heartRate"] = json!("fast");
    input["patientAge"] = json!(true);
    input["chiefComplaint"] = json!(42);

    let err = validate_observation(&input).expect_err("input should fail");

    assert_eq!(err.fields(), vec!["chiefComplaint", "patientAge", "heartRate"]);
    for violation in &err.violations {
        assert!(matches!(violation.rule, ViolationRule::Type { .. }));
    }
}

#[test]
fn given_blood_pressure_with_four_digits_when_validated_then_pattern_violation() {
    let mut input = baseline_input();
    input["bloodPressure"] = json!("1200/80");

    let err = validate_observation(&input).expect_err("four digit systolic should fail");
    assert_eq!(err.fields(), vec!["bloodPressure"]);
}

#[test]
fn given_blood_pressure_in_non_ascii_digits_when_validated_then_pattern_violation() {
    let mut input = baseline_input();
    input["bloodPressure"] = json!("\u{0661}\u{0662}\u{0660}/\u{0668}\u{0660}");

    let err = validate_observation(&input).expect_err("arabic-indic digits should fail");

    assert_eq!(err.fields(), vec!["bloodPressure"]);
    assert!(matches!(
        err.violations[0].rule,
        ViolationRule::Pattern { .. }
    ));
    assert!(err.to_string().contains("bloodPressure format"));
}

#[test]
fn given_inverted_blood_pressure_when_validated_then_it_is_accepted_as_entered() {
    let mut input = baseline_input();
    input["bloodPressure"] = json!("70/90");

    let observation = validate_observation(&input).expect("inverted reading is not rejected");
    assert_eq!(observation.blood_pressure.pulse_pressure(), -20);
}

#[test]
fn given_equity_defaults_when_validated_then_both_profiles_are_typed() {
    let input = validate_equity_input(&json!({
        "profileA": {"age": 35, "gender": "Female", "race": "Caucasian", "zip_code": "90210"},
        "profileB": {"age": "35", "gender": "Female", "race": "African American", "zip_code": "90210"}
    }))
    .expect("equity defaults should validate");

    assert_eq!(input.profile_a.race, "Caucasian");
    assert_eq!(input.profile_b.age, 35.0);
}

#[test]
fn given_bad_fields_in_both_profiles_when_validated_then_violations_are_prefixed() {
    let err = validate_equity_input(&json!({
        "profileA": {"age": 151, "gender": "Female", "race": "Caucasian", "zip_code": "90210"},
        "profileB": {"age": 40, "gender": "Male", "race": "", "zip_code": ""}
    }))
    .expect_err("profiles should fail");

    assert_eq!(
        err.fields(),
        vec!["profileA.age", "profileB.race", "profileB.zip_code"]
    );
}

#[test]
fn given_missing_profile_when_validated_then_profile_is_required() {
    let err = validate_equity_input(&json!({
        "profileA": {"age": 35, "gender": "Other", "race": "Asian", "zip_code": "10001"}
    }))
    .expect_err("missing profile should fail");

    assert_eq!(err.fields(), vec!["profileB"]);
    assert_eq!(err.violations[0].rule, ViolationRule::Required);
}
