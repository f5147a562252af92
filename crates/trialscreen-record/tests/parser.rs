//! Tests for EHR parsing and file loading

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use std::fs;
use trialscreen_record::{
    EhrParser, RecordError, VitalValue, load_ehr_from_file, load_patients_from_dir,
    load_patients_from_file,
};

fn sample() -> serde_json::Value {
    json!({
        "patient_id": "PT-001",
        "name": "John Smith",
        "date_of_birth": "1968-03-15",
        "gender": "Male",
        "medical_history": ["Type 2 Diabetes", "Hypertension"],
        "current_medications": ["Metformin", "Lisinopril"],
        "allergies": [],
        "lab_results": { "HbA1c": 8.2, "creatinine": 1.1, "systolic_bp": 155 },
        "vital_signs": { "blood_pressure": "155/92", "heart_rate": 72 },
        "comorbidities": ["Metabolic Syndrome"]
    })
}

#[test]
fn test_parse_complete_record() {
    let patient = EhrParser::parse_value(sample()).unwrap();

    assert_eq!(patient.patient_id, "PT-001");
    assert_eq!(patient.date_of_birth.to_string(), "1968-03-15");
    assert_eq!(patient.medical_history, vec!["Type 2 Diabetes", "Hypertension"]);
    assert_eq!(patient.lab_value("systolic_bp"), Some(155.0));
    assert_eq!(
        patient.vital_sign("blood_pressure"),
        Some(&VitalValue::Text("155/92".to_string()))
    );
    assert_eq!(patient.vital_sign("heart_rate"), Some(&VitalValue::Number(72.0)));
    assert_eq!(patient.comorbidities, vec!["Metabolic Syndrome"]);
}

#[test]
fn test_lab_results_keep_source_order() {
    let patient = EhrParser::parse_value(sample()).unwrap();
    let keys: Vec<&str> = patient.lab_results.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["HbA1c", "creatinine", "systolic_bp"]);
}

#[test]
fn test_comorbidities_are_optional() {
    let mut data = sample();
    data.as_object_mut().unwrap().remove("comorbidities");
    let patient = EhrParser::parse_value(data).unwrap();
    assert!(patient.comorbidities.is_empty());
}

#[test]
fn test_missing_fields_are_all_reported() {
    let mut data = sample();
    let object = data.as_object_mut().unwrap();
    object.remove("vital_signs");
    object.remove("gender");

    match EhrParser::parse_value(data) {
        Err(RecordError::MissingFields { fields }) => {
            assert_eq!(fields, vec!["gender".to_string(), "vital_signs".to_string()]);
        }
        other => panic!("Expected MissingFields, got: {:?}", other),
    }
}

#[rstest]
#[case("15/03/1968")]
#[case("1968-13-01")]
#[case("1968-02-30")]
#[case("")]
fn test_invalid_date_rejected(#[case] dob: &str) {
    let mut data = sample();
    data["date_of_birth"] = json!(dob);
    assert!(matches!(
        EhrParser::parse_value(data),
        Err(RecordError::InvalidDate { .. })
    ));
}

#[test]
fn test_wrong_field_type_names_field() {
    let mut data = sample();
    data["allergies"] = json!("Penicillin");
    match EhrParser::parse_value(data) {
        Err(RecordError::InvalidField { field, .. }) => assert_eq!(field, "allergies"),
        other => panic!("Expected InvalidField, got: {:?}", other),
    }
}

#[test]
fn test_invalid_json() {
    assert!(matches!(
        EhrParser::parse_json("{ not json"),
        Err(RecordError::InvalidJson { .. })
    ));
}

#[test]
fn test_non_object_rejected() {
    assert!(matches!(
        EhrParser::parse_json("[1, 2]").unwrap_err(),
        RecordError::NotAnObject { .. }
    ));
}

#[test]
fn test_parse_many_accepts_object_or_array() {
    let single = sample().to_string();
    assert_eq!(EhrParser::parse_many(&single).unwrap().len(), 1);

    let mut second = sample();
    second["patient_id"] = json!("PT-002");
    let array = json!([sample(), second]).to_string();
    let patients = EhrParser::parse_many(&array).unwrap();
    assert_eq!(patients.len(), 2);
    assert_eq!(patients[1].patient_id, "PT-002");
}

#[test]
fn test_load_from_file_and_dir() {
    let dir = tempfile::tempdir().unwrap();

    let mut other = sample();
    other["patient_id"] = json!("PT-002");
    fs::write(dir.path().join("b.json"), json!([other]).to_string()).unwrap();
    fs::write(dir.path().join("a.json"), sample().to_string()).unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let one = load_ehr_from_file(dir.path().join("a.json")).unwrap();
    assert_eq!(one.patient_id, "PT-001");

    let many = load_patients_from_file(dir.path().join("b.json")).unwrap();
    assert_eq!(many[0].patient_id, "PT-002");

    let all = load_patients_from_dir(dir.path()).unwrap();
    let ids: Vec<&str> = all.iter().map(|p| p.patient_id.as_str()).collect();
    assert_eq!(ids, vec!["PT-001", "PT-002"]);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        load_ehr_from_file(dir.path().join("absent.json")),
        Err(RecordError::Io { .. })
    ));
}
