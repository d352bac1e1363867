//! Text command - dump the text of a PDF.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use drawscan_core::{LopdfDocument, PdfSource};

/// Arguments for the text command.
#[derive(Args)]
pub struct TextArgs {
    /// Input PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// List words with their bounding boxes instead of the plain text
    #[arg(long)]
    words: bool,
}

pub async fn run(args: TextArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let document = LopdfDocument::open(&args.input, config.pdf)?;
    info!("Loaded {} pages", document.page_count());

    let output = if args.words {
        let mut lines = Vec::new();
        for page in 1..=document.page_count() {
            for word in document.words(page)? {
                let b = word.bounding_box;
                lines.push(format!(
                    "{}\t{:.1},{:.1},{:.1},{:.1}\t{}",
                    page, b.left, b.bottom, b.right, b.top, word.text
                ));
            }
        }
        lines.join("\n")
    } else {
        document.extract_text()?
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Text written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}
