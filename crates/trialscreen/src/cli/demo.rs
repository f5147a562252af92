//! Demo command implementation
//!
//! Runs the bundled sample patients through each screening operation.

use super::output::{self, OutputFormat};
use super::session::GlobalOptions;
use super::{matching, report, screen};
use anyhow::{Context, Result};
use serde::Serialize;
use trialscreen_protocol::{
    FilterOutcome, PatientTrialMatches, RecruitmentReport, ScreeningEngine, TrialScreening,
};

const DEMO_PATIENT: &str = "PT-001";
const DEMO_TRIAL: &str = "TRIAL-DM-2024-001";
const DEMO_BATCH_TRIAL: &str = "TRIAL-RESP-2024-003";
const DEMO_MATCH_PATIENT: &str = "PT-002";

/// Everything the demo computes
#[derive(Debug, Serialize)]
pub struct DemoRun {
    pub patient_screening: TrialScreening,
    pub trial_screening: FilterOutcome,
    pub patient_matches: PatientTrialMatches,
    pub recruitment_report: RecruitmentReport,
}

/// Run the demonstration over the bundled sample patients
pub fn demo(options: &GlobalOptions) -> Result<()> {
    let mut engine = options.engine()?;
    let patients = crate::sample_patients().context("Bundled sample patients are invalid")?;
    if options.verbose {
        eprintln!("Loaded {} sample patient(s)", patients.len());
    }
    for patient in patients {
        engine.load_patient(patient);
    }

    let run = run_demo(&engine)?;
    let content = render_demo(&run, options.format)?;
    options.emit(&content)
}

/// Screen one patient, one trial, one patient against all trials, then report
pub fn run_demo(engine: &ScreeningEngine) -> Result<DemoRun> {
    Ok(DemoRun {
        patient_screening: engine.screen_patient_for_trial(DEMO_PATIENT, DEMO_TRIAL)?,
        trial_screening: engine.screen_patients_for_trial(DEMO_BATCH_TRIAL)?,
        patient_matches: engine.screen_patient_for_all_trials(DEMO_MATCH_PATIENT)?,
        recruitment_report: engine.generate_recruitment_report(),
    })
}

fn render_demo(run: &DemoRun, format: OutputFormat) -> Result<String> {
    output::render(run, format, |run| {
        [
            format!(
                "{}\n{}\n{}",
                output::heading("Step 1: Patient Screening for Individual Trials"),
                run.patient_screening.trial_name,
                screen::report_breakdown(&run.patient_screening.report)
            ),
            format!(
                "{}\n{}",
                output::heading("Step 2: Trial-Wide Screening"),
                screen::outcome_table(&run.trial_screening)
            ),
            format!(
                "{}\n{}",
                output::heading("Step 3: Patient-Trial Matching"),
                matching::matches_table(&run.patient_matches)
            ),
            format!(
                "{}\n{}",
                output::heading("Step 4: Recruitment Report"),
                report::report_table(&run.recruitment_report)
            ),
        ]
        .join("\n\n\n")
    })
}
