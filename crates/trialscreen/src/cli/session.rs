//! Shared command setup: catalog assembly and patient loading

use super::output::{self, OutputFormat};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::env;
use std::path::{Path, PathBuf};
use trialscreen_protocol::{ScreeningEngine, TrialCatalog, load_protocols_from_file};
use trialscreen_record::{PatientRecord, load_patients_from_dir, load_patients_from_file};

/// Environment variable listing extra protocol definition files
pub const TRIALS_ENV: &str = "TRIALSCREEN_TRIALS";

/// Options shared by every subcommand
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub verbose: bool,
    pub format: OutputFormat,
    pub output_file: Option<PathBuf>,
    /// Reference date for ages; today when unset
    pub as_of: Option<NaiveDate>,
    /// Extra protocol definition files merged into the builtin catalog
    pub trial_files: Vec<PathBuf>,
}

impl GlobalOptions {
    /// Write rendered content to the configured destination
    pub fn emit(&self, content: &str) -> Result<()> {
        output::write_output(content, self.output_file.as_deref())
    }

    /// Definition files from `--trials`, or from the environment when none were given
    pub fn resolved_trial_files(&self) -> Vec<PathBuf> {
        if !self.trial_files.is_empty() {
            return self.trial_files.clone();
        }
        env::var_os(TRIALS_ENV)
            .map(|paths| {
                env::split_paths(&paths)
                    .filter(|p| !p.as_os_str().is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Builtin catalog plus every configured definition file
    pub fn load_catalog(&self) -> Result<TrialCatalog> {
        let mut catalog = TrialCatalog::builtin().context("Failed to build builtin trials")?;

        for path in self.resolved_trial_files() {
            let protocols = load_protocols_from_file(&path)
                .with_context(|| format!("Failed to load trial definitions: {}", path.display()))?;
            if self.verbose {
                eprintln!("Loaded {} trial(s) from {}", protocols.len(), path.display());
            }
            catalog
                .register_all(protocols)
                .with_context(|| format!("Failed to register trials from {}", path.display()))?;
        }

        if self.verbose {
            eprintln!("Catalog holds {} trial(s)", catalog.len());
        }
        Ok(catalog)
    }

    /// Engine over the configured catalog and reference date, with no patients
    pub fn engine(&self) -> Result<ScreeningEngine> {
        let engine = ScreeningEngine::with_catalog(self.load_catalog()?);
        Ok(match self.as_of {
            Some(date) => engine.with_reference_date(date),
            None => engine,
        })
    }

    /// Engine loaded with the patients found at `paths`
    pub fn engine_with_patients(&self, paths: &[PathBuf]) -> Result<ScreeningEngine> {
        let mut engine = self.engine()?;
        for patient in load_patient_paths(paths, self.verbose)? {
            engine.load_patient(patient);
        }
        if engine.patients().is_empty() {
            eprintln!("{}", output::format_warning("No patient records found"));
        }
        if self.verbose {
            eprintln!(
                "Screening {} patient(s) as of {}",
                engine.patients().len(),
                engine.reference_date()
            );
        }
        Ok(engine)
    }
}

/// Load patients from files and directories, in argument order
pub fn load_patient_paths(paths: &[PathBuf], verbose: bool) -> Result<Vec<PatientRecord>> {
    if paths.is_empty() {
        anyhow::bail!("No patient files specified");
    }

    let mut patients = Vec::new();
    for path in paths {
        let loaded = load_patient_path(path)?;
        if verbose {
            eprintln!("Loaded {} patient(s) from {}", loaded.len(), path.display());
        }
        patients.extend(loaded);
    }
    Ok(patients)
}

fn load_patient_path(path: &Path) -> Result<Vec<PatientRecord>> {
    if path.is_dir() {
        load_patients_from_dir(path)
            .with_context(|| format!("Failed to load patients from directory: {}", path.display()))
    } else {
        load_patients_from_file(path)
            .with_context(|| format!("Failed to load patient file: {}", path.display()))
    }
}

/// Parse a `YYYY-MM-DD` reference date
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{}': {} (expected YYYY-MM-DD)", value, e))
}
