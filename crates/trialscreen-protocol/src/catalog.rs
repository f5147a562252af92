//! Trial catalog
//!
//! The catalog is configuration data: built once, then only read. The
//! built-in sample trials live in a lazily initialized static.

use crate::error::{TrialError, TrialResult};
use crate::protocol::{ProtocolDefinition, TrialProtocol};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::fs;
use std::path::Path;
use trialscreen_eval::CriteriaType;

/// Insertion-ordered registry of trial protocols keyed by `trial_id`
#[derive(Debug, Clone, Default)]
pub struct TrialCatalog {
    trials: IndexMap<String, TrialProtocol>,
}

impl TrialCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding the sample trials shipped with the engine
    pub fn builtin() -> TrialResult<Self> {
        builtin_catalog()
    }

    /// Add a protocol; fails if its id is already registered
    pub fn register(&mut self, trial: TrialProtocol) -> TrialResult<()> {
        let trial_id = trial.trial_id().to_string();
        if self.trials.contains_key(&trial_id) {
            return Err(TrialError::DuplicateTrial { trial_id });
        }
        log::debug!(
            "registered trial {} with {} criteria",
            trial_id,
            trial.evaluator().len()
        );
        self.trials.insert(trial_id, trial);
        Ok(())
    }

    /// Add every protocol, stopping at the first duplicate
    pub fn register_all(
        &mut self,
        trials: impl IntoIterator<Item = TrialProtocol>,
    ) -> TrialResult<()> {
        trials.into_iter().try_for_each(|t| self.register(t))
    }

    /// Look up a protocol by id
    pub fn get(&self, trial_id: &str) -> TrialResult<&TrialProtocol> {
        self.trials
            .get(trial_id)
            .ok_or_else(|| TrialError::trial_not_found(trial_id))
    }

    pub fn contains(&self, trial_id: &str) -> bool {
        self.trials.contains_key(trial_id)
    }

    /// Protocols in registration order
    pub fn iter(&self) -> impl Iterator<Item = &TrialProtocol> {
        self.trials.values()
    }

    pub fn len(&self) -> usize {
        self.trials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }
}

/// Read a JSON file holding one protocol definition or an array of them
pub fn load_protocols_from_file(path: impl AsRef<Path>) -> TrialResult<Vec<TrialProtocol>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| TrialError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let value: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| TrialError::InvalidDefinition {
            message: format!("{}: {}", path.display(), e),
        })?;
    let definitions: Vec<ProtocolDefinition> = if value.is_array() {
        serde_json::from_value(value)
    } else {
        serde_json::from_value(value).map(|d| vec![d])
    }
    .map_err(|e| TrialError::InvalidDefinition {
        message: format!("{}: {}", path.display(), e),
    })?;

    let protocols = definitions
        .into_iter()
        .map(TrialProtocol::try_from)
        .collect::<TrialResult<Vec<_>>>()?;
    log::info!("Loaded {} protocol(s) from {}", protocols.len(), path.display());
    Ok(protocols)
}

static BUILTIN_CATALOG: Lazy<TrialResult<TrialCatalog>> = Lazy::new(|| {
    let mut catalog = TrialCatalog::new();
    catalog.register(diabetes_management_trial()?)?;
    catalog.register(cardiovascular_trial()?)?;
    catalog.register(respiratory_trial()?)?;
    Ok(catalog)
});

/// The sample trials shipped with the engine
pub fn builtin_catalog() -> TrialResult<TrialCatalog> {
    match &*BUILTIN_CATALOG {
        Ok(catalog) => Ok(catalog.clone()),
        Err(e) => Err(TrialError::Builtin {
            message: e.to_string(),
        }),
    }
}

/// Phase III glycemic control study in adults with type 2 diabetes
pub fn diabetes_management_trial() -> TrialResult<TrialProtocol> {
    TrialProtocol::builder("TRIAL-DM-2024-001", "Advanced Diabetes Management Study")
        .description(
            "A phase III randomized controlled trial evaluating new glycemic control approaches",
        )
        .phase("Phase III")
        .target_enrollment(250)
        .disease_area("Endocrinology")
        .primary_objective("Evaluate HbA1c reduction with new treatment protocol")
        .criteria(|c| {
            c.add_age_criterion(18, 75, Some("age_inclusion"), None)?;
            c.add_condition_criterion("Type 2 Diabetes", true, Some("diabetes_inclusion"), None)?;
            c.add_lab_criterion("HbA1c", Some(6.5), Some(11.0), Some("hba1c_range"))?;
            c.add_lab_criterion("creatinine", Some(0.5), Some(2.0), Some("kidney_function"))?;
            c.add_condition_criterion(
                "Type 1 Diabetes",
                false,
                Some("type1_exclusion"),
                Some(CriteriaType::Exclusion),
            )?;
            c.add_condition_criterion(
                "Severe renal impairment",
                false,
                Some("renal_exclusion"),
                Some(CriteriaType::Exclusion),
            )?;
            c.add_allergy_exclusion("metformin", None)
        })
        .build()
}

/// Phase III antihypertensive outcomes study
pub fn cardiovascular_trial() -> TrialResult<TrialProtocol> {
    TrialProtocol::builder(
        "TRIAL-CV-2024-002",
        "Hypertension and Cardiovascular Outcomes Study",
    )
    .description("A phase III trial assessing new antihypertensive agent efficacy and safety")
    .phase("Phase III")
    .target_enrollment(500)
    .disease_area("Cardiology")
    .primary_objective(
        "Demonstrate non-inferiority vs standard treatment in blood pressure control",
    )
    .criteria(|c| {
        c.add_age_criterion(40, 80, Some("age_inclusion"), None)?;
        c.add_condition_criterion("hypertension", true, Some("hypertension_inclusion"), None)?;
        c.add_lab_criterion("systolic_bp", Some(140.0), Some(200.0), Some("systolic_bp"))?;
        c.add_condition_criterion(
            "acute coronary syndrome",
            false,
            Some("acs_exclusion"),
            Some(CriteriaType::Exclusion),
        )?;
        c.add_medication_criterion(
            "ACE inhibitor",
            false,
            Some("ace_exclusion"),
            Some(CriteriaType::Exclusion),
        )?;
        c.add_allergy_exclusion("lisinopril", None)
    })
    .build()
}

/// Phase II/III biologic therapy study in moderate-to-severe asthma
pub fn respiratory_trial() -> TrialResult<TrialProtocol> {
    TrialProtocol::builder("TRIAL-RESP-2024-003", "Asthma Control Enhancement Study")
        .description(
            "A phase II/III trial evaluating biologic therapy in moderate-to-severe asthma",
        )
        .phase("Phase II/III")
        .target_enrollment(150)
        .disease_area("Pulmonology")
        .primary_objective("Assess asthma exacerbation reduction rate")
        .criteria(|c| {
            c.add_age_criterion(12, 70, Some("age_inclusion"), None)?;
            c.add_condition_criterion("asthma", true, Some("asthma_inclusion"), None)?;
            c.add_medication_criterion(
                "inhaled corticosteroid",
                true,
                Some("ics_requirement"),
                None,
            )?;
            c.add_condition_criterion(
                "COPD",
                false,
                Some("copd_exclusion"),
                Some(CriteriaType::Exclusion),
            )?;
            c.add_condition_criterion(
                "severe immunosuppression",
                false,
                Some("immunosupp_exclusion"),
                Some(CriteriaType::Exclusion),
            )?;
            c.add_allergy_exclusion("omalizumab", None)
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_order() {
        let catalog = builtin_catalog().unwrap();
        let ids: Vec<&str> = catalog.iter().map(TrialProtocol::trial_id).collect();
        assert_eq!(
            ids,
            vec!["TRIAL-DM-2024-001", "TRIAL-CV-2024-002", "TRIAL-RESP-2024-003"]
        );
    }

    #[test]
    fn test_builtin_criteria_counts() {
        let catalog = builtin_catalog().unwrap();
        assert_eq!(catalog.get("TRIAL-DM-2024-001").unwrap().evaluator().len(), 7);
        assert_eq!(catalog.get("TRIAL-CV-2024-002").unwrap().evaluator().len(), 6);
        assert_eq!(catalog.get("TRIAL-RESP-2024-003").unwrap().evaluator().len(), 6);
    }

    #[test]
    fn test_unknown_trial() {
        let catalog = builtin_catalog().unwrap();
        let err = catalog.get("TRIAL-NONE").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut catalog = TrialCatalog::new();
        catalog.register(respiratory_trial().unwrap()).unwrap();
        assert!(matches!(
            catalog.register(respiratory_trial().unwrap()),
            Err(TrialError::DuplicateTrial { .. })
        ));
        assert_eq!(catalog.len(), 1);
    }
}
