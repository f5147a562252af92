//! Screen command implementation

use super::output::{self, OutputFormat};
use super::session::GlobalOptions;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use tabled::Tabled;
use trialscreen_eval::{EvaluationResult, PatientEligibilityReport};
use trialscreen_protocol::FilterOutcome;

/// Configuration for screen command
pub struct ScreenConfig {
    /// Patient files or directories
    pub patients: Vec<PathBuf>,
    pub trial_id: String,
    /// Include the per-criterion breakdown for every patient
    pub details: bool,
}

#[derive(Tabled)]
struct PatientRow {
    #[tabled(rename = "Patient ID")]
    patient_id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Eligible")]
    eligible: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Passed")]
    passed: String,
}

#[derive(Tabled)]
struct ReasonRow {
    #[tabled(rename = "Patient ID")]
    patient_id: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

/// Screen every given patient for one trial
pub fn screen(options: &GlobalOptions, config: ScreenConfig) -> Result<()> {
    let engine = options.engine_with_patients(&config.patients)?;
    let outcome = engine
        .screen_patients_for_trial(&config.trial_id)
        .with_context(|| format!("Failed to screen patients for {}", config.trial_id))?;

    if options.verbose {
        eprintln!(
            "{} of {} patient(s) eligible for {}",
            outcome.summary.eligible_count, outcome.total_patients_screened, outcome.trial_id
        );
    }

    let content = render_outcome(&outcome, config.details, options.format)?;
    options.emit(&content)
}

pub(crate) fn render_outcome(
    outcome: &FilterOutcome,
    details: bool,
    format: OutputFormat,
) -> Result<String> {
    output::render(outcome, format, |outcome| {
        let mut sections = vec![outcome_table(outcome)];
        if details {
            sections.extend(outcome.eligibility_reports.iter().map(report_breakdown));
        }
        sections.join("\n\n")
    })
}

/// Summary table for a batch screening
pub(crate) fn outcome_table(outcome: &FilterOutcome) -> String {
    let rows = outcome.eligibility_reports.iter().map(|r| PatientRow {
        patient_id: r.patient_id.clone(),
        name: r.patient_name.clone(),
        eligible: output::verdict(r.is_eligible),
        score: output::percent(r.eligibility_score),
        passed: format!("{}/{}", r.passed_criteria, r.total_criteria),
    });

    let mut text = format!(
        "{}\n{}\n\nScreened: {}  Eligible: {}  Rate: {}",
        output::heading(&format!("{} - {}", outcome.trial_id, outcome.trial_name)),
        output::table(rows),
        outcome.total_patients_screened,
        outcome.summary.eligible_count,
        output::percent(outcome.summary.eligibility_rate),
    );

    let reasons: Vec<ReasonRow> = outcome
        .ineligible_patients
        .iter()
        .flat_map(|p| {
            p.reasons.iter().map(|reason| ReasonRow {
                patient_id: p.patient_id.clone(),
                reason: reason.clone(),
            })
        })
        .collect();
    if !reasons.is_empty() {
        text.push_str("\n\n");
        text.push_str(&output::table(reasons));
    }
    text
}

/// Per-criterion breakdown for one patient
pub(crate) fn report_breakdown(report: &PatientEligibilityReport) -> String {
    let mut lines = vec![
        format!(
            "{} ({})  {}  {}  {}/{}",
            report.patient_name.bold(),
            report.patient_id,
            output::verdict(report.is_eligible),
            output::percent(report.eligibility_score),
            report.passed_criteria,
            report.total_criteria,
        ),
        "  Inclusion criteria:".to_string(),
    ];
    lines.extend(report.inclusion_results.iter().map(criterion_line));
    lines.push("  Exclusion criteria:".to_string());
    lines.extend(report.exclusion_results.iter().map(criterion_line));
    lines.join("\n")
}

fn criterion_line(result: &EvaluationResult) -> String {
    format!(
        "    {} {}",
        output::status_mark(result.passed),
        result.criterion_name
    )
}
