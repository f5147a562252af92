//! Match command implementation

use super::output::{self, OutputFormat};
use super::session::{GlobalOptions, load_patient_paths};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use tabled::Tabled;
use trialscreen_protocol::PatientTrialMatches;
use trialscreen_record::PatientRecord;

/// Configuration for match command
pub struct MatchConfig {
    pub patient_file: PathBuf,
    /// Required when the file holds more than one record
    pub patient_id: Option<String>,
}

#[derive(Tabled)]
struct MatchRow {
    #[tabled(rename = "Trial ID")]
    trial_id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Eligible")]
    eligible: String,
    #[tabled(rename = "Score")]
    score: String,
}

/// Screen one patient against every trial in the catalog
pub fn match_trials(options: &GlobalOptions, config: MatchConfig) -> Result<()> {
    let patients = load_patient_paths(std::slice::from_ref(&config.patient_file), options.verbose)?;
    let patient = select_patient(patients, config.patient_id.as_deref())?;
    let patient_id = patient.patient_id.clone();

    let mut engine = options.engine()?;
    engine.load_patient(patient);
    let matches = engine
        .screen_patient_for_all_trials(&patient_id)
        .with_context(|| format!("Failed to match patient {}", patient_id))?;

    if options.verbose {
        eprintln!(
            "Patient {} is eligible for {} of {} trial(s)",
            patient_id,
            matches.eligible_trials.len(),
            matches.trial_matches.len()
        );
    }

    let content = render_matches(&matches, options.format)?;
    options.emit(&content)
}

/// Pick the requested record, or the only one
fn select_patient(patients: Vec<PatientRecord>, patient_id: Option<&str>) -> Result<PatientRecord> {
    match patient_id {
        Some(id) => patients
            .into_iter()
            .find(|p| p.patient_id == id)
            .with_context(|| format!("Patient {} not found in file", id)),
        None => {
            let count = patients.len();
            let mut iter = patients.into_iter();
            match (iter.next(), count) {
                (Some(patient), 1) => Ok(patient),
                _ => anyhow::bail!(
                    "File holds {} patient records; choose one with --patient",
                    count
                ),
            }
        }
    }
}

pub(crate) fn render_matches(
    matches: &PatientTrialMatches,
    format: OutputFormat,
) -> Result<String> {
    output::render(matches, format, matches_table)
}

pub(crate) fn matches_table(matches: &PatientTrialMatches) -> String {
    let rows = matches.trial_matches.iter().map(|m| MatchRow {
        trial_id: m.trial_id.clone(),
        name: m.trial_name.clone(),
        eligible: output::verdict(m.is_eligible),
        score: output::percent(m.eligibility_score),
    });

    let eligible = if matches.eligible_trials.is_empty() {
        "none".dimmed().to_string()
    } else {
        matches
            .eligible_trials
            .iter()
            .map(|m| m.trial_id.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "{}\n{}\n\nEligible trials: {}",
        output::heading(&format!("{} ({})", matches.patient_name, matches.patient_id)),
        output::table(rows),
        eligible
    )
}
