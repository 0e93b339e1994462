//! Metrics report command.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use klartext_core::entry::LogEntry;
use klartext_core::report::{generate_json_report, generate_text_report, DEFAULT_TITLE};
use klartext_core::stats::compute_aggregate_stats;

use crate::logger::load_all_logs;
use crate::prelude::*;
use crate::prelude::{eprintln, println};

#[derive(Debug, clap::Parser)]
#[command(name = "report")]
#[command(about = "Metrics reports over the run log")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Generate a report from the logged runs
    #[clap(name = "generate")]
    Generate(GenerateOptions),
}

#[derive(Debug, clap::Args, Clone)]
pub struct GenerateOptions {
    /// Read runs from this log file instead of the global one
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Write the report to a file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Include per-model and per-language breakdowns
    #[arg(short, long)]
    breakdown: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Suppress printing the report to stdout
    #[arg(short, long)]
    quiet: bool,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    match app.command {
        Commands::Generate(options) => generate(options, global),
    }
}

fn generate(options: GenerateOptions, global: crate::Global) -> Result<()> {
    let path = options.log_file.as_ref().unwrap_or(&global.log_file);
    let entries = load_all_logs(path)?;

    if global.verbose {
        println!("Log file: {}", path.display());
        println!("Entries: {}", entries.len());
        println!();
    }

    let rendered = render(
        &entries,
        options.json,
        options.breakdown,
        DEFAULT_TITLE,
        Utc::now(),
    )?;

    if let Some(output) = &options.output {
        write_report(output, &rendered)?;
        if !options.quiet {
            eprintln!("Report saved to {}", output.display());
        }
    }

    if !options.quiet {
        std::println!("{rendered}");
    }

    Ok(())
}

/// Render the report in either format from loaded entries.
pub fn render(
    entries: &[LogEntry],
    json: bool,
    breakdown: bool,
    title: &str,
    generated_at: DateTime<Utc>,
) -> Result<String> {
    let stats = compute_aggregate_stats(entries);
    if json {
        let report = generate_json_report(&stats, entries, generated_at);
        Ok(serde_json::to_string_pretty(&report)?)
    } else {
        Ok(generate_text_report(
            &stats,
            entries,
            breakdown,
            title,
            generated_at,
        ))
    }
}

/// Write a rendered report, creating parent directories as needed.
pub fn write_report(path: &Path, rendered: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .wrap_err_with(|| f!("failed to create {}", parent.display()))?;
        }
    }
    std::fs::write(path, rendered).wrap_err_with(|| f!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use klartext_core::entry::{build_log_entry, RunInfo};

    fn sample_entries() -> Vec<LogEntry> {
        let ts = Utc.with_ymd_and_hms(2026, 8, 26, 12, 0, 0).unwrap();
        let run = RunInfo {
            model: "llama-3.1-8b-instant",
            template: "system_prompt_de",
            language: "de",
        };
        vec![build_log_entry(
            ts,
            "Der komplizierte Ausgangstext.",
            "Der Text ist kurz.",
            &run,
            false,
        )]
    }

    #[test]
    fn test_render_text_report() {
        let rendered = render(
            &sample_entries(),
            false,
            true,
            DEFAULT_TITLE,
            Utc.with_ymd_and_hms(2026, 8, 26, 14, 0, 0).unwrap(),
        )
        .unwrap();
        assert!(rendered.contains("METRICS OVERVIEW"));
        assert!(rendered.contains("Total entries: 1"));
        assert!(rendered.contains("BREAKDOWN BY MODEL"));
    }

    #[test]
    fn test_render_json_report() {
        let rendered = render(
            &sample_entries(),
            true,
            false,
            DEFAULT_TITLE,
            Utc.with_ymd_and_hms(2026, 8, 26, 14, 0, 0).unwrap(),
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["total_entries"], 1);
        assert!(value["breakdown"]["by_language"]["de"].is_object());
    }

    #[test]
    fn test_write_report_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports/nested/report.txt");
        write_report(&path, "contents").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "contents");
    }
}
