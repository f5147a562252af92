//! Normalized patient record and its derived queries

use chrono::{Datelike, Local, NaiveDate};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single vital sign reading
///
/// Vitals arrive either as plain numbers (`heart_rate: 72`) or as composite
/// text (`blood_pressure: "155/92"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VitalValue {
    Number(f64),
    Text(String),
}

impl VitalValue {
    /// Numeric reading, if this vital is numeric
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    /// Text reading, if this vital is textual
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }
}

impl fmt::Display for VitalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A patient's electronic health record
///
/// Records are built once by the parsing layer and never mutated by the
/// evaluation engine. Collections keep the order in which the source listed them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub patient_id: String,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub medical_history: Vec<String>,
    pub current_medications: Vec<String>,
    pub allergies: Vec<String>,
    /// Test name to numeric result; tests not performed are absent
    pub lab_results: IndexMap<String, f64>,
    pub vital_signs: IndexMap<String, VitalValue>,
    #[serde(default)]
    pub comorbidities: Vec<String>,
}

impl PatientRecord {
    /// Create a record with identity and demographics; clinical collections start empty
    pub fn new(
        patient_id: impl Into<String>,
        name: impl Into<String>,
        date_of_birth: NaiveDate,
        gender: impl Into<String>,
    ) -> Self {
        Self {
            patient_id: patient_id.into(),
            name: name.into(),
            date_of_birth,
            gender: gender.into(),
            medical_history: Vec::new(),
            current_medications: Vec::new(),
            allergies: Vec::new(),
            lab_results: IndexMap::new(),
            vital_signs: IndexMap::new(),
            comorbidities: Vec::new(),
        }
    }

    pub fn with_history<I, S>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.medical_history.extend(conditions.into_iter().map(Into::into));
        self
    }

    pub fn with_medications<I, S>(mut self, medications: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.current_medications
            .extend(medications.into_iter().map(Into::into));
        self
    }

    pub fn with_allergies<I, S>(mut self, allergies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allergies.extend(allergies.into_iter().map(Into::into));
        self
    }

    pub fn with_comorbidities<I, S>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.comorbidities.extend(conditions.into_iter().map(Into::into));
        self
    }

    pub fn with_lab(mut self, test: impl Into<String>, value: f64) -> Self {
        self.lab_results.insert(test.into(), value);
        self
    }

    pub fn with_vital(mut self, name: impl Into<String>, value: VitalValue) -> Self {
        self.vital_signs.insert(name.into(), value);
        self
    }

    /// Age in whole years on the given date
    ///
    /// A birthday not yet reached in the `as_of` year does not count.
    pub fn age_on(&self, as_of: NaiveDate) -> i32 {
        let dob = self.date_of_birth;
        let before_birthday = (as_of.month(), as_of.day()) < (dob.month(), dob.day());
        as_of.year() - dob.year() - i32::from(before_birthday)
    }

    /// Age in whole years as of the local current date
    pub fn age(&self) -> i32 {
        self.age_on(Local::now().date_naive())
    }

    /// Whether `condition` appears (case-insensitive substring) in the
    /// medical history or comorbidities
    pub fn has_condition(&self, condition: &str) -> bool {
        let needle = condition.to_lowercase();
        self.medical_history
            .iter()
            .chain(self.comorbidities.iter())
            .any(|entry| contains_ignore_case(entry, &needle))
    }

    /// Whether the patient is currently taking a medication matching `medication`
    pub fn is_on_medication(&self, medication: &str) -> bool {
        let needle = medication.to_lowercase();
        self.current_medications
            .iter()
            .any(|entry| contains_ignore_case(entry, &needle))
    }

    /// Whether any recorded allergy mentions `allergen`
    pub fn has_allergy(&self, allergen: &str) -> bool {
        let needle = allergen.to_lowercase();
        self.allergies
            .iter()
            .any(|entry| contains_ignore_case(entry, &needle))
    }

    /// Lab result by exact test name
    pub fn lab_value(&self, test: &str) -> Option<f64> {
        self.lab_results.get(test).copied()
    }

    /// Vital sign by exact name
    pub fn vital_sign(&self, name: &str) -> Option<&VitalValue> {
        self.vital_signs.get(name)
    }
}

// `needle` must already be lowercased.
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn patient() -> PatientRecord {
        PatientRecord::new("PT-001", "John Smith", date(1968, 3, 15), "Male")
            .with_history(["Type 2 Diabetes", "Hypertension"])
            .with_medications(["Metformin 500mg", "Lisinopril"])
            .with_allergies(["Penicillin allergy"])
            .with_comorbidities(["Metabolic Syndrome"])
            .with_lab("HbA1c", 8.2)
            .with_vital("heart_rate", VitalValue::Number(72.0))
            .with_vital("blood_pressure", VitalValue::Text("155/92".into()))
    }

    #[test]
    fn test_age_before_and_after_birthday() {
        let p = patient();
        assert_eq!(p.age_on(date(2024, 3, 14)), 55);
        assert_eq!(p.age_on(date(2024, 3, 15)), 56);
        assert_eq!(p.age_on(date(2024, 12, 31)), 56);
    }

    #[test]
    fn test_age_leap_day_birth() {
        let p = PatientRecord::new("PT-X", "Leap", date(2000, 2, 29), "Female");
        assert_eq!(p.age_on(date(2023, 2, 28)), 22);
        assert_eq!(p.age_on(date(2023, 3, 1)), 23);
    }

    #[test]
    fn test_condition_matches_history_and_comorbidities() {
        let p = patient();
        assert!(p.has_condition("type 2 diabetes"));
        assert!(p.has_condition("HYPERTENSION"));
        assert!(p.has_condition("metabolic"));
        assert!(!p.has_condition("asthma"));
    }

    #[test]
    fn test_medication_substring() {
        let p = patient();
        assert!(p.is_on_medication("metformin"));
        assert!(!p.is_on_medication("insulin"));
    }

    #[test]
    fn test_allergy_substring() {
        let p = patient();
        assert!(p.has_allergy("Penicillin"));
        assert!(!p.has_allergy("sulfa"));
    }

    #[test]
    fn test_lab_lookup_is_exact() {
        let p = patient();
        assert_eq!(p.lab_value("HbA1c"), Some(8.2));
        assert_eq!(p.lab_value("hba1c"), None);
    }

    #[test]
    fn test_vital_values() {
        let p = patient();
        assert_eq!(p.vital_sign("heart_rate").and_then(VitalValue::as_number), Some(72.0));
        assert_eq!(
            p.vital_sign("blood_pressure").and_then(VitalValue::as_text),
            Some("155/92")
        );
        assert!(p.vital_sign("temperature").is_none());
    }
}
