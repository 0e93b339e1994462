use crate::prelude::*;
use clap::Parser;

mod error;
mod llm;
mod logger;
mod pdf;
mod prelude;
mod prompts;
mod report;
mod schedule;
mod simplify;
mod tts;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Turn complex text into easy language"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Path of the JSONL run log
    #[clap(
        long,
        env = "KLARTEXT_LOG_FILE",
        global = true,
        default_value = "data/logs/runs.jsonl"
    )]
    log_file: std::path::PathBuf,

    /// Whether to display additional information.
    #[clap(long, env = "KLARTEXT_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Simplify text into easy language
    Simplify(crate::simplify::App),

    /// PDF text extraction
    PDF(crate::pdf::App),

    /// Text-to-speech preprocessing
    TTS(crate::tts::App),

    /// Metrics reports over the run log
    Report(crate::report::App),

    /// Scheduled report generation
    Schedule(crate::schedule::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Simplify(sub_app) => crate::simplify::run(sub_app, app.global).await,
        SubCommands::PDF(sub_app) => crate::pdf::run(sub_app, app.global).await,
        SubCommands::TTS(sub_app) => crate::tts::run(sub_app, app.global).await,
        SubCommands::Report(sub_app) => crate::report::run(sub_app, app.global).await,
        SubCommands::Schedule(sub_app) => crate::schedule::run(sub_app, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
