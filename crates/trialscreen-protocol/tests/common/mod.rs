//! Common test utilities for screening tests
//!
//! Sample patients mirror the demonstration population: a type 2 diabetic
//! with hypertension, a young asthmatic, an older diabetic with kidney
//! disease and a metformin allergy, and an asthmatic on a biologic.

#![allow(dead_code)]

use chrono::NaiveDate;
use trialscreen_record::{PatientRecord, VitalValue};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Reference date used for every age computation in these tests
pub fn as_of() -> NaiveDate {
    date(2024, 6, 1)
}

pub fn john_smith() -> PatientRecord {
    PatientRecord::new("PT-001", "John Smith", date(1968, 3, 15), "Male")
        .with_history(["Type 2 Diabetes", "Hypertension", "Hyperlipidemia"])
        .with_medications(["Metformin", "Lisinopril", "Atorvastatin"])
        .with_lab("HbA1c", 8.2)
        .with_lab("creatinine", 1.1)
        .with_lab("systolic_bp", 155.0)
        .with_lab("diastolic_bp", 92.0)
        .with_vital("blood_pressure", VitalValue::Text("155/92".into()))
        .with_vital("heart_rate", VitalValue::Number(72.0))
        .with_comorbidities(["Metabolic Syndrome"])
}

pub fn mary_johnson() -> PatientRecord {
    PatientRecord::new("PT-002", "Mary Johnson", date(1992, 7, 22), "Female")
        .with_history(["Asthma"])
        .with_medications(["Albuterol", "Fluticasone"])
        .with_allergies(["Penicillin"])
        .with_lab("FEV1", 78.0)
        .with_lab("systolic_bp", 118.0)
        .with_lab("diastolic_bp", 75.0)
}

pub fn robert_davis() -> PatientRecord {
    PatientRecord::new("PT-003", "Robert Davis", date(1955, 11, 10), "Male")
        .with_history([
            "Type 2 Diabetes",
            "Chronic Kidney Disease Stage 3",
            "Hypertension",
        ])
        .with_medications(["Insulin Glargine", "Amlodipine", "Allopurinol"])
        .with_allergies(["Metformin"])
        .with_lab("HbA1c", 7.8)
        .with_lab("creatinine", 2.5)
        .with_lab("eGFR", 28.0)
        .with_lab("systolic_bp", 162.0)
        .with_lab("diastolic_bp", 88.0)
        .with_comorbidities(["Chronic Kidney Disease"])
}

pub fn sarah_williams() -> PatientRecord {
    PatientRecord::new("PT-004", "Sarah Williams", date(1988, 5, 18), "Female")
        .with_history(["Moderate Asthma"])
        .with_medications(["Fluticasone-Salmeterol", "Omalizumab"])
        .with_lab("FEV1", 72.0)
        .with_lab("IgE", 250.0)
        .with_lab("systolic_bp", 122.0)
        .with_lab("diastolic_bp", 78.0)
}

pub fn sample_patients() -> Vec<PatientRecord> {
    vec![john_smith(), mary_johnson(), robert_davis(), sarah_williams()]
}
