//! Trials command implementation

use super::output::{self, OutputFormat};
use super::session::GlobalOptions;
use anyhow::Result;
use serde::Serialize;
use tabled::Tabled;
use trialscreen_protocol::{ProtocolDefinition, TrialCatalog, TrialProtocol};

/// Configuration for trials command
pub struct TrialsConfig {
    /// Print every criterion instead of one line per trial
    pub criteria: bool,
}

/// One catalog entry
#[derive(Debug, Serialize)]
struct TrialListing {
    trial_id: String,
    trial_name: String,
    phase: String,
    disease_area: String,
    target_enrollment: u32,
    criteria_count: usize,
}

impl From<&TrialProtocol> for TrialListing {
    fn from(trial: &TrialProtocol) -> Self {
        Self {
            trial_id: trial.trial_id().to_string(),
            trial_name: trial.trial_name().to_string(),
            phase: trial.phase().to_string(),
            disease_area: trial.disease_area().to_string(),
            target_enrollment: trial.target_enrollment(),
            criteria_count: trial.evaluator().len(),
        }
    }
}

#[derive(Tabled)]
struct TrialRow {
    #[tabled(rename = "Trial ID")]
    trial_id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Phase")]
    phase: String,
    #[tabled(rename = "Area")]
    area: String,
    #[tabled(rename = "Target")]
    target: u32,
    #[tabled(rename = "Criteria")]
    criteria: usize,
}

#[derive(Tabled)]
struct CriterionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    criterion_type: String,
    #[tabled(rename = "Criterion")]
    name: String,
    #[tabled(rename = "Check")]
    kind: &'static str,
}

/// List the trial catalog
pub fn trials(options: &GlobalOptions, config: TrialsConfig) -> Result<()> {
    let catalog = options.load_catalog()?;
    let content = render_catalog(&catalog, config.criteria, options.format)?;
    options.emit(&content)
}

fn render_catalog(catalog: &TrialCatalog, criteria: bool, format: OutputFormat) -> Result<String> {
    if criteria {
        let definitions: Vec<ProtocolDefinition> =
            catalog.iter().map(TrialProtocol::to_definition).collect();
        return output::render(&definitions, format, |_| criteria_tables(catalog));
    }

    let listings: Vec<TrialListing> = catalog.iter().map(TrialListing::from).collect();
    output::render(&listings, format, |listings| {
        output::table(listings.iter().map(|l| TrialRow {
            trial_id: l.trial_id.clone(),
            name: l.trial_name.clone(),
            phase: l.phase.clone(),
            area: l.disease_area.clone(),
            target: l.target_enrollment,
            criteria: l.criteria_count,
        }))
    })
}

fn criteria_tables(catalog: &TrialCatalog) -> String {
    catalog
        .iter()
        .map(|trial| {
            let rows = trial.evaluator().criteria().iter().map(|c| CriterionRow {
                id: c.criterion_id.clone(),
                criterion_type: c.criterion_type.to_string(),
                name: c.name.clone(),
                kind: c.predicate.kind(),
            });
            format!(
                "{}\n{}",
                output::heading(&format!("{} - {}", trial.trial_id(), trial.trial_name())),
                output::table(rows)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
