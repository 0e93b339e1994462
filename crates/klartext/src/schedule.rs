//! Scheduled report generation.
//!
//! Regenerates the metrics report on a fixed interval, writes a timestamped
//! copy per run, and appends every run to a growing overview file so the
//! history of reports stays greppable in one place.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::logger::load_all_logs;
use crate::prelude::*;
use crate::prelude::{eprintln, println};
use crate::report;

#[derive(Debug, clap::Parser)]
#[command(name = "schedule")]
#[command(about = "Scheduled report generation")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Generate reports on a fixed interval until interrupted
    #[clap(name = "run")]
    Run(RunOptions),
}

#[derive(Debug, clap::Args, Clone)]
pub struct RunOptions {
    /// Hours between report runs
    #[arg(long, default_value_t = 48.0)]
    interval_hours: f64,

    /// Directory for timestamped report files
    #[arg(long, default_value = "data/logs/reports")]
    output_dir: PathBuf,

    /// File that accumulates every generated report
    #[arg(long, default_value = "data/logs/metrics_overview.txt")]
    overview_file: PathBuf,

    /// Generate one report and exit
    #[arg(long)]
    run_once: bool,

    /// Print to stdout only, writing no files
    #[arg(long)]
    console_only: bool,

    /// Write the timestamped report files as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    match app.command {
        Commands::Run(options) => run_loop(options, global).await,
    }
}

async fn run_loop(options: RunOptions, global: crate::Global) -> Result<()> {
    let interval =
        std::time::Duration::from_secs_f64(options.interval_hours.max(0.0) * 3600.0);
    let mut iteration: u64 = 0;

    println!(
        "Generating a report every {} hours. Press Ctrl-C to stop.",
        options.interval_hours
    );

    loop {
        iteration += 1;
        if let Err(err) = run_iteration(&options, &global, iteration) {
            log::error!("report run #{iteration} failed: {err}");
            eprintln!("Report run #{iteration} failed: {err}");
        }

        if options.run_once {
            break;
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = tokio::signal::ctrl_c() => {
                println!("Stopping.");
                break;
            }
        }
    }

    Ok(())
}

fn run_iteration(options: &RunOptions, global: &crate::Global, iteration: u64) -> Result<()> {
    let now = Utc::now();
    let entries = load_all_logs(&global.log_file)?;
    let title = f!("{}-HOUR METRICS REPORT", options.interval_hours);
    let rendered = report::render(&entries, options.json, true, &title, now)?;

    if options.console_only {
        std::println!("{rendered}");
        return Ok(());
    }

    let path = options.output_dir.join(report_file_name(now, options.json));
    report::write_report(&path, &rendered)?;
    println!("Run #{iteration}: report saved to {}", path.display());

    if !options.json {
        append_overview(options, &rendered, now, iteration)?;
    }

    Ok(())
}

fn report_file_name(now: DateTime<Utc>, json: bool) -> String {
    let stamp = now.format("%Y%m%d_%H%M%S");
    let ext = if json { "json" } else { "txt" };
    f!("metrics_report_{stamp}.{ext}")
}

fn append_overview(
    options: &RunOptions,
    rendered: &str,
    now: DateTime<Utc>,
    iteration: u64,
) -> Result<()> {
    if let Some(parent) = options.overview_file.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&options.overview_file)
        .wrap_err_with(|| f!("failed to open {}", options.overview_file.display()))?;
    file.write_all(overview_block(options, rendered, now, iteration).as_bytes())?;

    Ok(())
}

fn overview_block(
    options: &RunOptions,
    rendered: &str,
    now: DateTime<Utc>,
    iteration: u64,
) -> String {
    let bar = "#".repeat(70);
    f!(
        "{bar}\n\
         # SCHEDULED METRICS REPORT (Run #{iteration})\n\
         # Generated: {}\n\
         # Interval: Every {} hours\n\
         {bar}\n\n\
         {rendered}\n\n",
        now.format("%Y-%m-%d %H:%M:%S UTC"),
        options.interval_hours
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn options() -> RunOptions {
        RunOptions {
            interval_hours: 48.0,
            output_dir: PathBuf::from("data/logs/reports"),
            overview_file: PathBuf::from("data/logs/metrics_overview.txt"),
            run_once: true,
            console_only: false,
            json: false,
        }
    }

    fn report_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 26, 14, 30, 0).unwrap()
    }

    #[test]
    fn test_report_file_name() {
        assert_eq!(
            report_file_name(report_time(), false),
            "metrics_report_20260826_143000.txt"
        );
        assert_eq!(
            report_file_name(report_time(), true),
            "metrics_report_20260826_143000.json"
        );
    }

    #[test]
    fn test_overview_block_header() {
        let block = overview_block(&options(), "REPORT BODY", report_time(), 3);
        assert!(block.starts_with(&"#".repeat(70)));
        assert!(block.contains("# SCHEDULED METRICS REPORT (Run #3)"));
        assert!(block.contains("# Generated: 2026-08-26 14:30:00 UTC"));
        assert!(block.contains("# Interval: Every 48 hours"));
        assert!(block.contains("REPORT BODY"));
        assert!(block.ends_with("\n\n"));
    }

    #[test]
    fn test_append_overview_accumulates_runs() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = options();
        opts.overview_file = dir.path().join("overview/metrics_overview.txt");

        append_overview(&opts, "first report", report_time(), 1).unwrap();
        append_overview(&opts, "second report", report_time(), 2).unwrap();

        let contents = std::fs::read_to_string(&opts.overview_file).unwrap();
        assert!(contents.contains("first report"));
        assert!(contents.contains("second report"));
        assert!(contents.contains("(Run #1)"));
        assert!(contents.contains("(Run #2)"));
    }
}
