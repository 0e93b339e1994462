//! The end-to-end simplification command.

use std::io::Read;
use std::path::PathBuf;

use colored::Colorize;
use klartext_core::entry::{build_log_entry, LogEntry, RunInfo};
use klartext_core::guardrails;

use crate::logger::RunLogger;
use crate::prelude::*;
use crate::prelude::{eprintln, println};
use crate::{llm, prompts};

#[derive(Debug, clap::Parser)]
#[command(name = "simplify")]
#[command(about = "Simplify text into easy language")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Simplify a piece of text and log the run
    #[clap(name = "text")]
    Text(TextOptions),
}

#[derive(Debug, clap::Args, Clone)]
pub struct TextOptions {
    /// Text to simplify (reads stdin when neither text nor --file is given)
    text: Option<String>,

    /// Read the input text from a file
    #[arg(short = 'f', long)]
    file: Option<PathBuf>,

    /// Target language of the simplification
    #[arg(short, long, default_value = "de")]
    language: String,

    /// Model identifier passed to the completion API
    #[arg(short, long, default_value = llm::DEFAULT_MODEL)]
    model: String,

    /// Groq API key
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Directory holding the prompt templates
    #[arg(
        long,
        env = "KLARTEXT_TEMPLATES_DIR",
        default_value = prompts::DEFAULT_TEMPLATES_DIR
    )]
    templates_dir: PathBuf,

    /// Store the raw source and output texts in the run log
    #[arg(long)]
    store_raw_text: bool,

    /// Skip writing the run to the log
    #[arg(long)]
    no_log: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    match app.command {
        Commands::Text(options) => simplify_text(options, global).await,
    }
}

async fn simplify_text(options: TextOptions, global: crate::Global) -> Result<()> {
    let source = read_input(&options)?;
    if source.trim().is_empty() {
        return Err(Error::EmptyInput.into());
    }

    let api_key = options.api_key.clone().ok_or(Error::MissingApiKey)?;
    let templates = prompts::load_templates(&options.templates_dir, &options.language)?;
    let user_prompt = prompts::render_user_prompt(&templates.user, &source);

    if global.verbose {
        println!("Model: {}", options.model);
        println!("Template: {}", templates.name);
        println!();
    }

    let output = llm::complete(&api_key, &options.model, &templates.system, &user_prompt).await?;

    let run = RunInfo {
        model: &options.model,
        template: &templates.name,
        language: &options.language,
    };

    let entry = if options.no_log {
        build_log_entry(
            chrono::Utc::now(),
            &source,
            &output,
            &run,
            options.store_raw_text,
        )
    } else {
        let logger = RunLogger::new(&global.log_file, options.store_raw_text);
        logger.log(&source, &output, &run)?
    };

    if options.json {
        std::println!("{}", serde_json::to_string_pretty(&json_output(&output, &entry))?);
    } else {
        std::println!("{output}");
        display_run_summary(&entry);
    }

    Ok(())
}

fn read_input(options: &TextOptions) -> Result<String> {
    if let Some(text) = &options.text {
        return Ok(text.clone());
    }
    if let Some(path) = &options.file {
        return std::fs::read_to_string(path)
            .wrap_err_with(|| f!("failed to read {}", path.display()));
    }
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

fn json_output(output: &str, entry: &LogEntry) -> serde_json::Value {
    serde_json::json!({
        "output_text": output,
        "entry": entry,
    })
}

/// Print the metrics and guardrail verdicts for one run to stderr.
fn display_run_summary(entry: &LogEntry) {
    eprintln!();
    eprintln!("{}", "Metrics".bold().cyan());

    let mut table = new_table();
    for key in klartext_core::metrics::MetricKey::ALL {
        let value = match entry.metrics.get(key) {
            Some(value) => f!("{value}"),
            None => "error".to_string(),
        };
        let marker = match guardrails::for_metric(key) {
            Some(rail) => match entry.metrics.get(key) {
                Some(value) if !rail.violates(value) => "ok".green().to_string(),
                _ => "!".red().bold().to_string(),
            },
            None => String::new(),
        };
        table.add_row(prettytable::row![key.as_str(), value, marker]);
    }
    table.print(&mut anstream::stderr()).ok();

    if entry.guardrails_failed.is_empty() {
        eprintln!(
            "{}",
            f!(
                "Guardrails: {}/{} passed",
                entry.guardrails_passed, entry.guardrails_total
            )
            .green()
        );
    } else {
        eprintln!(
            "{}",
            f!(
                "Guardrails: {}/{} passed ({})",
                entry.guardrails_passed,
                entry.guardrails_total,
                entry.guardrails_failed.join(", ")
            )
            .red()
            .bold()
        );
    }
}
