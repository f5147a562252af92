//! Clinical trial screening command-line interface

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use trialscreen::cli::output::{self, ColorMode, OutputFormat};
use trialscreen::cli::session::{self, GlobalOptions};
use trialscreen::cli::{demo, matching, report, screen, trials};

/// Clinical trial screening tool
#[derive(Parser)]
#[command(name = "trialscreen")]
#[command(author, version, about = "Clinical trial eligibility screening", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Pretty, global = true)]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Color output
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    color: ColorMode,

    /// Reference date for patient ages, YYYY-MM-DD (default: today)
    #[arg(long, value_parser = session::parse_date, global = true)]
    as_of: Option<NaiveDate>,

    /// Extra trial definition files (default: $TRIALSCREEN_TRIALS)
    #[arg(short = 't', long = "trials", global = true)]
    trial_files: Vec<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the trial catalog
    Trials {
        /// Show every criterion of every trial
        #[arg(short, long)]
        criteria: bool,
    },

    /// Screen patients for one trial
    Screen {
        /// Patient files or directories (JSON)
        #[arg(required = true)]
        patients: Vec<PathBuf>,

        /// Trial to screen for
        #[arg(short = 'T', long = "trial")]
        trial_id: String,

        /// Show the criterion breakdown for each patient
        #[arg(short, long)]
        details: bool,
    },

    /// Match one patient against every trial
    Match {
        /// Patient file (JSON)
        patient_file: PathBuf,

        /// Patient to match when the file holds several records
        #[arg(short, long = "patient")]
        patient_id: Option<String>,
    },

    /// Recruitment report for every trial
    Report {
        /// Patient files or directories (JSON)
        #[arg(required = true)]
        patients: Vec<PathBuf>,
    },

    /// Run the bundled sample patients through every operation
    Demo,
}

fn main() {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    // Set up color output
    output::setup_colors(cli.color);

    let options = GlobalOptions {
        verbose: cli.verbose,
        format: cli.format,
        output_file: cli.output,
        as_of: cli.as_of,
        trial_files: cli.trial_files,
    };

    let result = match cli.command {
        Commands::Trials { criteria } => {
            trials::trials(&options, trials::TrialsConfig { criteria })
        }

        Commands::Screen {
            patients,
            trial_id,
            details,
        } => {
            let config = screen::ScreenConfig {
                patients,
                trial_id,
                details,
            };
            screen::screen(&options, config)
        }

        Commands::Match {
            patient_file,
            patient_id,
        } => {
            let config = matching::MatchConfig {
                patient_file,
                patient_id,
            };
            matching::match_trials(&options, config)
        }

        Commands::Report { patients } => {
            report::report(&options, report::ReportConfig { patients })
        }

        Commands::Demo => demo::demo(&options),
    };

    if let Err(e) = result {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}
