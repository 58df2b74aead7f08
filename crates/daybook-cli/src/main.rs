//! CLI for ingesting pharmacy POS report renders into daily metrics.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{ingest, inspect, show};

/// daybook - turn rendered POS report documents into reconciled daily metrics
#[derive(Parser)]
#[command(name = "daybook")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a batch of rendered report text files
    Ingest(ingest::IngestArgs),

    /// Classify and extract a single document without persisting
    Inspect(inspect::InspectArgs),

    /// Print the persisted record for a branch and date
    Show(show::ShowArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Ingest(args) => ingest::run(args),
        Commands::Inspect(args) => inspect::run(args),
        Commands::Show(args) => show::run(args),
    }
}
