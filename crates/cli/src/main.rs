//! barrister CLI — the main entry point.
//!
//! Commands:
//! - `ask`       — Answer a question about a document
//! - `summarize` — Summarize a document
//! - `chat`      — Interactive session with PDF report export
//! - `onboard`   — Initialize the config file

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "barrister",
    about = "barrister — retrieval-augmented legal document QA",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a question about a document
    Ask {
        /// Document file name (resolved against the configured document root)
        #[arg(short, long)]
        file: String,

        /// The question to answer
        question: String,
    },

    /// Summarize a document
    Summarize {
        /// Document file name (resolved against the configured document root)
        #[arg(short, long)]
        file: String,
    },

    /// Interactive QA session; `/report` exports the PDF transcript
    Chat {
        /// Document file name (resolved against the configured document root)
        #[arg(short, long)]
        file: String,
    },

    /// Initialize the configuration file
    Onboard,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Ask { file, question } => commands::ask::run(&file, &question).await?,
        Commands::Summarize { file } => commands::summarize::run(&file).await?,
        Commands::Chat { file } => commands::chat::run(&file).await?,
        Commands::Onboard => commands::onboard::run()?,
    }

    Ok(())
}
