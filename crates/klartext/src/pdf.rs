//! PDF extraction command.

use std::path::PathBuf;

use crate::prelude::*;
use crate::prelude::{eprintln, println};

#[derive(Debug, clap::Parser)]
#[command(name = "pdf")]
#[command(about = "PDF text extraction")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Extract cleaned body text from a PDF file
    #[clap(name = "extract")]
    Extract(ExtractOptions),
}

#[derive(Debug, clap::Args, Clone)]
pub struct ExtractOptions {
    /// Path of the PDF file
    path: PathBuf,

    /// Fraction of page height treated as header/footer zone
    #[arg(long, default_value_t = klartext_pdf::DEFAULT_MARGIN_PCT)]
    margin_pct: f32,

    /// Write the extracted text to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    match app.command {
        Commands::Extract(options) => extract(options, global),
    }
}

fn extract(options: ExtractOptions, global: crate::Global) -> Result<()> {
    let bytes = std::fs::read(&options.path)
        .wrap_err_with(|| f!("failed to read {}", options.path.display()))?;

    if global.verbose {
        println!("Margin: {:.0}% of page height", options.margin_pct * 100.0);
        println!();
    }

    let text = klartext_pdf::extract_text(&bytes, options.margin_pct)?;

    let rendered = if options.json {
        serde_json::to_string_pretty(&serde_json::json!({
            "path": options.path,
            "chars": text.chars().count(),
            "text": text,
        }))?
    } else {
        text
    };

    match &options.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .wrap_err_with(|| f!("failed to write {}", path.display()))?;
            eprintln!("Saved to {}", path.display());
        }
        None => std::println!("{rendered}"),
    }

    Ok(())
}
