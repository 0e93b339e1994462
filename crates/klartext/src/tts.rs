//! Text-to-speech preprocessing command.
//!
//! Prepares simplified text for a speech engine. No synthesis backend is
//! bundled; the prepared text is meant to be piped into one.

use std::io::Read;
use std::path::PathBuf;

use klartext_core::tts::preprocess_for_tts;

use crate::prelude::*;

#[derive(Debug, clap::Parser)]
#[command(name = "tts")]
#[command(about = "Text-to-speech preprocessing")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Strip list markers and markup so text reads naturally aloud
    #[clap(name = "prepare")]
    Prepare(PrepareOptions),
}

#[derive(Debug, clap::Args, Clone)]
pub struct PrepareOptions {
    /// Text to prepare (reads stdin when neither text nor --file is given)
    text: Option<String>,

    /// Read the input text from a file
    #[arg(short = 'f', long)]
    file: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(app: App, _global: crate::Global) -> Result<()> {
    match app.command {
        Commands::Prepare(options) => prepare(options),
    }
}

fn prepare(options: PrepareOptions) -> Result<()> {
    let input = if let Some(text) = &options.text {
        text.clone()
    } else if let Some(path) = &options.file {
        std::fs::read_to_string(path).wrap_err_with(|| f!("failed to read {}", path.display()))?
    } else {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    };

    let prepared = preprocess_for_tts(&input);

    if options.json {
        std::println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "text": prepared }))?
        );
    } else {
        std::println!("{prepared}");
    }

    Ok(())
}
