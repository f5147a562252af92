//! EHR parsing from JSON
//!
//! Validation happens here so that records handed to the evaluation engine are
//! always complete: every required field is present, every field has the right
//! shape and the date of birth is a real calendar date.

use crate::error::{RecordError, RecordResult};
use crate::patient::{PatientRecord, VitalValue};
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Fields every incoming record must carry. `comorbidities` is optional.
const REQUIRED_FIELDS: [&str; 9] = [
    "patient_id",
    "name",
    "date_of_birth",
    "gender",
    "medical_history",
    "current_medications",
    "allergies",
    "lab_results",
    "vital_signs",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses electronic health records into `PatientRecord`s
pub struct EhrParser;

impl EhrParser {
    /// Parse a single record from a JSON string
    pub fn parse_json(json: &str) -> RecordResult<PatientRecord> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| RecordError::invalid_json(e.to_string()))?;
        Self::parse_value(value)
    }

    /// Parse a single record from an already decoded JSON value
    pub fn parse_value(value: Value) -> RecordResult<PatientRecord> {
        let object = match value {
            Value::Object(map) => map,
            other => {
                return Err(RecordError::NotAnObject {
                    found: json_kind(&other).to_string(),
                });
            }
        };

        let mut missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|field| !object.contains_key(**field))
            .map(|field| field.to_string())
            .collect();
        if !missing.is_empty() {
            missing.sort();
            return Err(RecordError::MissingFields { fields: missing });
        }

        let dob_text: String = field(&object, "date_of_birth")?;
        let date_of_birth = parse_date(&dob_text)?;

        Ok(PatientRecord {
            patient_id: field(&object, "patient_id")?,
            name: field(&object, "name")?,
            date_of_birth,
            gender: field(&object, "gender")?,
            medical_history: field(&object, "medical_history")?,
            current_medications: field(&object, "current_medications")?,
            allergies: field(&object, "allergies")?,
            lab_results: field::<IndexMap<String, f64>>(&object, "lab_results")?,
            vital_signs: field::<IndexMap<String, VitalValue>>(&object, "vital_signs")?,
            comorbidities: optional_field(&object, "comorbidities")?.unwrap_or_default(),
        })
    }

    /// Parse either a single record object or an array of records
    pub fn parse_many(json: &str) -> RecordResult<Vec<PatientRecord>> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| RecordError::invalid_json(e.to_string()))?;
        match value {
            Value::Array(items) => items.into_iter().map(Self::parse_value).collect(),
            other => Ok(vec![Self::parse_value(other)?]),
        }
    }
}

/// Load one record from a JSON file
pub fn load_ehr_from_file(path: impl AsRef<Path>) -> RecordResult<PatientRecord> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| RecordError::io(path, e))?;
    EhrParser::parse_json(&content)
}

/// Load every record from a JSON file holding an object or an array of objects
pub fn load_patients_from_file(path: impl AsRef<Path>) -> RecordResult<Vec<PatientRecord>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| RecordError::io(path, e))?;
    let patients = EhrParser::parse_many(&content)?;
    log::debug!("Loaded {} patient(s) from {}", patients.len(), path.display());
    Ok(patients)
}

/// Load all `*.json` files in a directory, in file name order
pub fn load_patients_from_dir(dir: impl AsRef<Path>) -> RecordResult<Vec<PatientRecord>> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|e| RecordError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| RecordError::io(dir, e))?;
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("json") {
            files.push(path);
        }
    }
    files.sort();

    let mut patients = Vec::new();
    for file in files {
        patients.extend(load_patients_from_file(&file)?);
    }
    Ok(patients)
}

fn parse_date(text: &str) -> RecordResult<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| RecordError::InvalidDate {
        value: text.to_string(),
    })
}

fn field<T: DeserializeOwned>(object: &Map<String, Value>, name: &str) -> RecordResult<T> {
    let value = object
        .get(name)
        .cloned()
        .ok_or_else(|| RecordError::MissingFields {
            fields: vec![name.to_string()],
        })?;
    serde_json::from_value(value).map_err(|e| RecordError::invalid_field(name, e.to_string()))
}

fn optional_field<T: DeserializeOwned>(
    object: &Map<String, Value>,
    name: &str,
) -> RecordResult<Option<T>> {
    match object.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| RecordError::invalid_field(name, e.to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
