//! Report command implementation

use super::output::{self, OutputFormat};
use super::session::GlobalOptions;
use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;
use tabled::Tabled;
use trialscreen_protocol::{RecruitmentReport, RecruitmentStatus};

/// Configuration for report command
pub struct ReportConfig {
    pub patients: Vec<PathBuf>,
}

#[derive(Tabled)]
struct RecruitmentRow {
    #[tabled(rename = "Trial")]
    trial: String,
    #[tabled(rename = "Phase")]
    phase: String,
    #[tabled(rename = "Target")]
    target: u32,
    #[tabled(rename = "Eligible")]
    eligible: usize,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Status")]
    status: String,
}

/// Recruitment status of every trial over the given patients
pub fn report(options: &GlobalOptions, config: ReportConfig) -> Result<()> {
    let engine = options.engine_with_patients(&config.patients)?;
    let report = engine.generate_recruitment_report();
    let content = render_report(&report, options.format)?;
    options.emit(&content)
}

pub(crate) fn render_report(report: &RecruitmentReport, format: OutputFormat) -> Result<String> {
    output::render(report, format, report_table)
}

pub(crate) fn report_table(report: &RecruitmentReport) -> String {
    let rows = report.trial_summaries.iter().map(|s| RecruitmentRow {
        trial: format!("{}\n{}", s.trial_id, s.trial_name),
        phase: s.phase.clone(),
        target: s.target_enrollment,
        eligible: s.eligible_candidates,
        rate: output::percent(s.eligible_rate),
        status: colored_status(s.recruitment_status),
    });

    format!(
        "{}\n{}\n\nPatients screened: {}  Trials: {}",
        output::heading("Recruitment Report"),
        output::table(rows),
        report.total_patients_screened,
        report.total_trials
    )
}

fn colored_status(status: RecruitmentStatus) -> String {
    let label = status.as_str();
    match status {
        RecruitmentStatus::GoalMet => label.green().to_string(),
        RecruitmentStatus::ActivelyRecruiting => label.cyan().to_string(),
        RecruitmentStatus::ExpansionNeeded => label.yellow().to_string(),
        RecruitmentStatus::InsufficientCandidates => label.red().to_string(),
    }
}
