//! Scan command - read template fields from many PDFs.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, error, warn};

use drawscan_core::PdfReader;

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Template PDF with one annotation per field
    #[arg(short, long, required = true)]
    template: PathBuf,

    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

/// One field of a scanned PDF.
#[derive(Serialize)]
struct FieldValue {
    name: String,
    value: Option<String>,
}

/// Result of scanning a single file.
#[derive(Serialize)]
struct ScanRecord {
    path: PathBuf,
    fields: Vec<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub async fn run(args: ScanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;
    let extension = config.schedule.pdf_extension.trim_start_matches('.').to_string();

    let mut reader = PdfReader::with_config(config);
    if let Err(e) = reader.set_template(&args.template) {
        eprintln!("{}", reader.print_template_messages("Template messages:"));
        anyhow::bail!("Pdf template is invalid: {}", e);
    }
    let names: Vec<String> = reader.search_boxes().iter().map(|b| b.name.clone()).collect();

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| has_extension(p, &extension))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Scanning {} files for {} fields",
        style("ℹ").blue(),
        files.len(),
        names.len()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut records = Vec::with_capacity(files.len());
    for path in files {
        match reader.scan_pdf(&path) {
            Ok(found) => {
                debug!("Scanned {}", path.display());
                records.push(ScanRecord {
                    fields: names
                        .iter()
                        .cloned()
                        .zip(found)
                        .map(|(name, value)| FieldValue { name, value })
                        .collect(),
                    path,
                    error: None,
                });
            }
            Err(e) if args.continue_on_error => {
                warn!("Failed to scan {}: {}", path.display(), e);
                records.push(ScanRecord {
                    path,
                    fields: Vec::new(),
                    error: Some(e.to_string()),
                });
            }
            Err(e) => {
                pb.abandon();
                error!("Failed to scan {}: {}", path.display(), e);
                anyhow::bail!("Scan failed for {}: {}", path.display(), e);
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&records)?,
        OutputFormat::Csv => format_csv(&names, &records)?,
        OutputFormat::Text => format_text(&records),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Results written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if !reader.warnings().is_empty() {
        let count = reader.warnings().len();
        eprintln!(
            "{}",
            style(reader.print_warnings(&format!("Pdf scan complete with {} warnings:", count))).yellow()
        );
    }

    let failed = records.iter().filter(|r| r.error.is_some()).count();
    eprintln!(
        "{} Scanned {} files in {:?} ({} failed)",
        style("✓").green(),
        records.len(),
        start.elapsed(),
        style(failed).red()
    );

    Ok(())
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

fn format_csv(names: &[String], records: &[ScanRecord]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["path".to_string()];
    header.extend(names.iter().cloned());
    header.push("error".to_string());
    wtr.write_record(&header)?;

    for record in records {
        let mut row = vec![record.path.display().to_string()];
        row.extend((0..names.len()).map(|i| {
            record
                .fields
                .get(i)
                .and_then(|f| f.value.clone())
                .unwrap_or_default()
        }));
        row.push(record.error.clone().unwrap_or_default());
        wtr.write_record(&row)?;
    }

    let data = wtr
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to write CSV: {}", e.error()))?;
    Ok(String::from_utf8(data)?)
}

fn format_text(records: &[ScanRecord]) -> String {
    let mut lines = Vec::new();

    for record in records {
        lines.push(record.path.display().to_string());
        if let Some(error) = &record.error {
            lines.push(format!("  error: {}", error));
            continue;
        }
        for field in &record.fields {
            lines.push(format!(
                "  {}: {}",
                field.name,
                field.value.as_deref().unwrap_or("-")
            ));
        }
    }

    lines.join("\n")
}
