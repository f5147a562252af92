//! Protocol definition file loading

mod common;

use common::*;
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;
use trialscreen_eval::{CriteriaType, EvalError};
use trialscreen_protocol::{
    ScreeningEngine, TrialError, TrialProtocol, builtin_catalog, load_protocols_from_file,
};

fn write_json(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

const SINGLE: &str = r#"{
    "trial_id": "TRIAL-HTN-LOCAL",
    "trial_name": "Local Hypertension Registry",
    "phase": "Phase IV",
    "target_enrollment": 2,
    "criteria": [
        {
            "criterion_id": "adult",
            "name": "Adult",
            "description": "Patient must be 18 or older",
            "criterion_type": "inclusion",
            "predicate": { "kind": "age_range", "min_age": 18, "max_age": 120 }
        },
        {
            "criterion_id": "htn",
            "name": "Patient has hypertension",
            "description": "Patient must have hypertension",
            "criterion_type": "inclusion",
            "predicate": { "kind": "condition", "condition": "hypertension", "required": true }
        },
        {
            "criterion_id": "no_ckd",
            "name": "No kidney disease",
            "description": "Patient must not have kidney disease",
            "criterion_type": "exclusion",
            "predicate": {
                "kind": "not",
                "predicate": { "kind": "condition", "condition": "kidney disease", "required": true }
            }
        }
    ]
}"#;

#[test]
fn test_load_single_definition() {
    let file = write_json(SINGLE);
    let protocols = load_protocols_from_file(file.path()).unwrap();

    assert_eq!(protocols.len(), 1);
    let trial = &protocols[0];
    assert_eq!(trial.trial_id(), "TRIAL-HTN-LOCAL");
    assert_eq!(trial.phase(), "Phase IV");
    assert_eq!(trial.description(), "");
    assert_eq!(trial.evaluator().len(), 3);
    assert_eq!(
        trial.evaluator().get("no_ckd").unwrap().criterion_type,
        CriteriaType::Exclusion
    );
}

#[test]
fn test_loaded_definition_screens_like_builtin() {
    let file = write_json(SINGLE);
    let mut engine = ScreeningEngine::new().with_reference_date(as_of());
    for trial in load_protocols_from_file(file.path()).unwrap() {
        engine.register_trial(trial).unwrap();
    }
    for patient in sample_patients() {
        engine.load_patient(patient);
    }

    let outcome = engine.screen_patients_for_trial("TRIAL-HTN-LOCAL").unwrap();
    let eligible: Vec<&str> = outcome
        .eligible_patients
        .iter()
        .map(|p| p.patient_id.as_str())
        .collect();
    assert_eq!(eligible, vec!["PT-001"]);
    assert!(
        outcome.ineligible_patients[1]
            .reasons
            .contains(&"Excluded: No kidney disease".to_string())
    );
}

#[test]
fn test_load_array_of_definitions() {
    let builtin = builtin_catalog().unwrap();
    let definitions: Vec<_> = builtin.iter().map(TrialProtocol::to_definition).collect();
    let file = write_json(&serde_json::to_string_pretty(&definitions).unwrap());

    let protocols = load_protocols_from_file(file.path()).unwrap();
    let ids: Vec<&str> = protocols.iter().map(|t| t.trial_id()).collect();
    assert_eq!(
        ids,
        vec!["TRIAL-DM-2024-001", "TRIAL-CV-2024-002", "TRIAL-RESP-2024-003"]
    );
    assert_eq!(&protocols[0], builtin.get("TRIAL-DM-2024-001").unwrap());
}

#[test]
fn test_duplicate_criterion_in_file_rejected() {
    let file = write_json(
        r#"{
            "trial_id": "TRIAL-DUP",
            "trial_name": "Duplicate",
            "target_enrollment": 5,
            "criteria": [
                {"criterion_id": "a", "name": "A", "description": "", "criterion_type": "inclusion",
                 "predicate": {"kind": "allergy", "allergen": "latex"}},
                {"criterion_id": "a", "name": "A again", "description": "", "criterion_type": "inclusion",
                 "predicate": {"kind": "allergy", "allergen": "iodine"}}
            ]
        }"#,
    );

    match load_protocols_from_file(file.path()).unwrap_err() {
        TrialError::Criteria { trial_id, source } => {
            assert_eq!(trial_id, "TRIAL-DUP");
            assert_eq!(source, EvalError::duplicate_criterion("a"));
        }
        other => panic!("Expected Criteria error, got: {:?}", other),
    }
}

#[test]
fn test_inverted_range_in_file_rejected() {
    let file = write_json(
        r#"{
            "trial_id": "TRIAL-RANGE",
            "trial_name": "Bad range",
            "target_enrollment": 5,
            "criteria": [
                {"criterion_id": "lab", "name": "Lab", "description": "", "criterion_type": "inclusion",
                 "predicate": {"kind": "lab_range", "lab_test": "HbA1c", "min_value": 9.0, "max_value": 6.0}}
            ]
        }"#,
    );

    let err = load_protocols_from_file(file.path()).unwrap_err();
    assert!(matches!(
        err,
        TrialError::Criteria {
            source: EvalError::InvalidRange { .. },
            ..
        }
    ));
}

#[test]
fn test_malformed_definition() {
    let file = write_json(r#"{"trial_name": "No id", "target_enrollment": 1}"#);
    assert!(matches!(
        load_protocols_from_file(file.path()),
        Err(TrialError::InvalidDefinition { .. })
    ));

    let file = write_json("not json");
    assert!(matches!(
        load_protocols_from_file(file.path()),
        Err(TrialError::InvalidDefinition { .. })
    ));
}

#[test]
fn test_missing_definition_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        load_protocols_from_file(dir.path().join("absent.json")),
        Err(TrialError::Io { .. })
    ));
}

#[test]
fn test_engine_loads_patients_from_file() {
    let patients = serde_json::to_string(&sample_patients()).unwrap();
    let file = write_json(&patients);

    let mut engine = ScreeningEngine::with_catalog(builtin_catalog().unwrap());
    assert_eq!(engine.load_patients_from_file(file.path()).unwrap(), 4);
    assert_eq!(engine.patient("PT-004").unwrap().name, "Sarah Williams");
}
