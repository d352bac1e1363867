//! Schedule command - list folders, scan their PDFs, and copy or move files.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use drawscan_core::models::config::DrawscanConfig;
use drawscan_core::schedule::{FileSchedule, parse_text_to_bool, read_transfer_plan, transfer_files};
use drawscan_core::{PdfReader, TransferMode};

/// Arguments for the schedule command.
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(subcommand)]
    command: ScheduleCommand,
}

#[derive(Subcommand)]
enum ScheduleCommand {
    /// List the files in a folder
    List(ListArgs),

    /// List a folder and add template fields for each PDF
    Scan(ScanArgs),

    /// Copy or move files listed in a schedule CSV
    Transfer(TransferArgs),
}

#[derive(Args)]
struct ListArgs {
    /// Folder to list
    folder: PathBuf,

    /// Search subfolders (yes/no)
    #[arg(long, value_parser = parse_yes_no)]
    subfolders: Option<bool>,

    /// Output CSV file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct ScanArgs {
    #[command(flatten)]
    list: ListArgs,

    /// Template PDF with one annotation per field
    #[arg(short, long, required = true)]
    template: PathBuf,
}

#[derive(Args)]
struct TransferArgs {
    /// Schedule CSV with FullPath and CopyMovePath columns
    plan: PathBuf,

    /// Move instead of copy
    #[arg(long = "move")]
    move_files: bool,
}

fn parse_yes_no(text: &str) -> Result<bool, String> {
    parse_text_to_bool(text).ok_or_else(|| format!("expected yes/no, true/false or 1/0, got '{}'", text))
}

pub async fn run(args: ScheduleArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    match args.command {
        ScheduleCommand::List(list) => {
            let schedule = list_folder(&list, &config)?;
            write_schedule(&schedule, list.output.as_deref())
        }
        ScheduleCommand::Scan(scan) => scan_folder(scan, config),
        ScheduleCommand::Transfer(transfer) => run_transfer(transfer, &config),
    }
}

fn list_folder(args: &ListArgs, config: &DrawscanConfig) -> anyhow::Result<FileSchedule> {
    let subfolders = args.subfolders.unwrap_or(config.schedule.search_subfolders);

    let schedule = FileSchedule::scan_folder(&args.folder, subfolders)
        .map_err(|e| anyhow::anyhow!("{}. Could not load file list.", e))?
        .with_config(config.schedule.clone());

    eprintln!(
        "{} Found {} files in {}",
        style("ℹ").blue(),
        schedule.entries.len(),
        args.folder.display()
    );
    Ok(schedule)
}

fn scan_folder(args: ScanArgs, config: DrawscanConfig) -> anyhow::Result<()> {
    let mut schedule = list_folder(&args.list, &config)?;

    let mut reader = PdfReader::with_config(config);
    if let Err(e) = reader.set_template(&args.template) {
        eprintln!("{}", reader.print_template_messages("Template messages:"));
        anyhow::bail!("Pdf template is invalid. Could not load file data: {}", e);
    }
    let count = reader.template_messages().len();
    eprintln!(
        "{}",
        reader.print_template_messages(&format!("Read pdf template has {} notifications:", count))
    );

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!("Scanning {} PDFs", schedule.pdf_paths().len()));
    let summary = schedule.scan_pdfs(&mut reader)?;
    pb.finish_and_clear();

    write_schedule(&schedule, args.list.output.as_deref())?;

    eprintln!(
        "{} Scanned {} PDFs ({} failed)",
        style("✓").green(),
        summary.scanned,
        style(summary.failed).red()
    );
    let mut warnings = summary.warnings;
    warnings.extend(reader.warnings().iter().cloned());
    if !warnings.is_empty() {
        eprintln!(
            "{}",
            style(format!("Pdf scan complete with {} warnings:", warnings.len())).yellow()
        );
        for warning in &warnings {
            eprintln!("  - {}", warning);
        }
    }

    Ok(())
}

fn write_schedule(schedule: &FileSchedule, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            schedule.write_csv(File::create(path)?)?;
            eprintln!("{} Schedule written to {}", style("✓").green(), path.display());
        }
        None => schedule.write_csv(io::stdout().lock())?,
    }
    Ok(())
}

fn run_transfer(args: TransferArgs, config: &DrawscanConfig) -> anyhow::Result<()> {
    let plan = read_transfer_plan(File::open(&args.plan)?, &config.schedule.columns)?;
    let mode = if args.move_files {
        TransferMode::Move
    } else {
        TransferMode::Copy
    };

    let report = transfer_files(&plan, mode);

    let status = if report.messages.is_empty() {
        style("✓").green()
    } else {
        style("!").yellow()
    };
    println!("{} {}", status, report.summary());
    for message in &report.messages {
        println!("  - {}", message);
    }

    Ok(())
}
