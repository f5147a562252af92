//! Output formatting utilities

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use std::fs::File;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use tabled::{Table, Tabled, settings::Style};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON
    Json,
    /// Indented JSON
    #[default]
    Pretty,
    /// Human-readable tables
    Table,
}

/// Color mode for terminal output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Set up color output based on user preference
pub fn setup_colors(mode: ColorMode) {
    let enabled = match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal(),
    };
    colored::control::set_override(enabled);
}

/// Format an error for display, including its cause chain
pub fn format_error(error: &anyhow::Error) -> String {
    format!("{} {:#}", "Error:".red().bold(), error)
}

/// Format a warning for display
pub fn format_warning(warning: &str) -> String {
    format!("{} {}", "Warning:".yellow().bold(), warning)
}

/// Format a success message for display
pub fn format_success(message: &str) -> String {
    format!("{} {}", "Success:".green().bold(), message)
}

/// Pass/fail marker
pub fn status_mark(passed: bool) -> String {
    if passed {
        "✓".green().bold().to_string()
    } else {
        "✗".red().bold().to_string()
    }
}

/// Eligibility verdict as a colored word
pub fn verdict(eligible: bool) -> String {
    if eligible {
        "ELIGIBLE".green().bold().to_string()
    } else {
        "NOT ELIGIBLE".red().bold().to_string()
    }
}

/// Percentage with one decimal place
pub fn percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Section heading used by the table renderings
pub fn heading(title: &str) -> String {
    format!("{}\n{}", title.bold(), "-".repeat(title.chars().count()))
}

/// Render rows as a table in the house style
pub fn table<T: Tabled>(rows: impl IntoIterator<Item = T>) -> String {
    Table::new(rows).with(Style::modern()).to_string()
}

/// Write output to a file or stdout
pub fn write_output(content: &str, output_file: Option<&Path>) -> Result<()> {
    if let Some(path) = output_file {
        let mut file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        file.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write to output file: {}", path.display()))?;
        eprintln!(
            "{}",
            format_success(&format!("Output written to {}", path.display()))
        );
    } else {
        println!("{}", content);
    }
    Ok(())
}

/// Serialize a value as JSON
pub fn format_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    if pretty {
        serde_json::to_string_pretty(value).context("Failed to serialize JSON")
    } else {
        serde_json::to_string(value).context("Failed to serialize JSON")
    }
}

/// Render a result in the requested format
///
/// `render_table` is only called for [`OutputFormat::Table`].
pub fn render<T, F>(value: &T, format: OutputFormat, render_table: F) -> Result<String>
where
    T: Serialize + ?Sized,
    F: FnOnce(&T) -> String,
{
    match format {
        OutputFormat::Json => format_json(value, false),
        OutputFormat::Pretty => format_json(value, true),
        OutputFormat::Table => Ok(render_table(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "Trial")]
        trial: &'static str,
        #[tabled(rename = "Eligible")]
        eligible: usize,
    }

    #[test]
    fn test_render_json_formats() {
        let value = json!({"trial_id": "TRIAL-X", "eligible": 2});
        let compact = render(&value, OutputFormat::Json, |_| unreachable!()).unwrap();
        assert_eq!(compact, r#"{"eligible":2,"trial_id":"TRIAL-X"}"#);

        let pretty = render(&value, OutputFormat::Pretty, |_| unreachable!()).unwrap();
        assert!(pretty.contains("\n  \"trial_id\": \"TRIAL-X\""));
    }

    #[test]
    fn test_render_table_uses_callback() {
        let value = json!([]);
        let out = render(&value, OutputFormat::Table, |_| {
            table([Row {
                trial: "TRIAL-X",
                eligible: 2,
            }])
        })
        .unwrap();
        assert!(out.contains("Trial"));
        assert!(out.contains("TRIAL-X"));
    }

    #[derive(Tabled)]
    struct VerdictRow {
        #[tabled(rename = "Patient ID")]
        patient_id: &'static str,
        #[tabled(rename = "Eligible")]
        eligible: &'static str,
    }

    fn strip_ansi(line: &str) -> String {
        let mut out = String::new();
        let mut chars = line.chars();
        while let Some(c) = chars.next() {
            if c == '\u{1b}' {
                chars.by_ref().find(|c| c.is_ascii_alphabetic());
            } else {
                out.push(c);
            }
        }
        out
    }

    // Same escapes `verdict` emits with color on, written out so the global
    // color override is left alone.
    #[test]
    fn test_colored_cells_keep_columns_aligned() {
        let out = table([
            VerdictRow {
                patient_id: "PT-001",
                eligible: "\u{1b}[1;32mELIGIBLE\u{1b}[0m",
            },
            VerdictRow {
                patient_id: "PT-002",
                eligible: "\u{1b}[1;31mNOT ELIGIBLE\u{1b}[0m",
            },
        ]);
        assert!(out.contains('\u{1b}'));

        let widths: Vec<usize> = out
            .lines()
            .map(|line| strip_ansi(line).chars().count())
            .collect();
        assert_eq!(widths.len(), 7);
        assert!(widths.iter().all(|w| *w == widths[0]), "{:?}", widths);
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(50.0), "50.0%");
        assert_eq!(percent(100.0 / 3.0), "33.3%");
    }

    #[test]
    fn test_plain_markers_without_color() {
        colored::control::set_override(false);
        assert_eq!(status_mark(true), "✓");
        assert_eq!(verdict(false), "NOT ELIGIBLE");
        assert_eq!(heading("Trials"), "Trials\n------");
    }
}
