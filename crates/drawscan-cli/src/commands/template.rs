//! Template command - show the search regions of a template PDF.

use std::path::PathBuf;

use clap::Args;
use console::style;

use drawscan_core::PdfReader;

use super::scan::OutputFormat;

/// Arguments for the template command.
#[derive(Args)]
pub struct TemplateArgs {
    /// Template PDF with one annotation per field
    #[arg(required = true)]
    template: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub async fn run(args: TemplateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let mut reader = PdfReader::with_config(config);

    if let Err(e) = reader.set_template(&args.template) {
        if !reader.template_messages().is_empty() {
            eprintln!("{}", reader.print_template_messages("Template messages:"));
        }
        anyhow::bail!("Pdf template is invalid: {}", e);
    }

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(reader.search_boxes())?);
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            wtr.write_record(["name", "left", "bottom", "right", "top"])?;
            for search_box in reader.search_boxes() {
                let r = search_box.rectangle;
                wtr.write_record([
                    search_box.name.clone(),
                    r.left.to_string(),
                    r.bottom.to_string(),
                    r.right.to_string(),
                    r.top.to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        OutputFormat::Text => {
            let count = reader.template_messages().len();
            println!(
                "{} {}",
                style("✓").green(),
                reader.print_template_messages(&format!(
                    "Read pdf template has {} notifications:",
                    count
                ))
            );
        }
    }

    Ok(())
}
