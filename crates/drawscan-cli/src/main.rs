//! CLI application for drawing title-block scanning and file schedules.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{config, format, scan, schedule, template, text};

/// Drawscan - Read title-block fields from PDF drawings
#[derive(Parser)]
#[command(name = "drawscan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the search regions of a template PDF
    Template(template::TemplateArgs),

    /// Scan PDFs with a template
    Scan(scan::ScanArgs),

    /// Dump the full text of a PDF
    Text(text::TextArgs),

    /// Build and act on file schedules
    Schedule(schedule::ScheduleArgs),

    /// Convert formula markup to rich text and back
    Format(format::FormatArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
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
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Template(args) => template::run(args, config_path).await,
        Commands::Scan(args) => scan::run(args, config_path).await,
        Commands::Text(args) => text::run(args, config_path).await,
        Commands::Schedule(args) => schedule::run(args, config_path).await,
        Commands::Format(args) => format::run(args, config_path).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
