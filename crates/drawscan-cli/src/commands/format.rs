//! Format command - formula markup to rich text and back.

use clap::Args;

use drawscan_core::formula::{FormatOptions, RichText, format_text, revert_text};

/// Arguments for the format command.
#[derive(Args)]
pub struct FormatArgs {
    /// Text to convert
    #[arg(required = true)]
    text: String,

    /// Convert rendered text back to markup
    #[arg(long)]
    revert: bool,

    /// Leave `^` and `_` markers alone
    #[arg(long)]
    no_scripts: bool,

    /// Leave `\name` symbols alone
    #[arg(long)]
    no_symbols: bool,

    /// Print `^`/`_` markup instead of Unicode scripts
    #[arg(long)]
    markup: bool,

    /// Print the per-character script as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: FormatArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    let mut options = FormatOptions::from(&config.formula);
    if args.no_scripts {
        options.subscripts_superscripts = false;
    }
    if args.no_symbols {
        options.symbols = false;
    }

    let rich = if args.revert {
        revert_text(&RichText::from_unicode(&args.text), options)
    } else {
        format_text(&RichText::from(args.text.as_str()), options)
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rich)?);
    } else if args.markup {
        println!("{}", rich.to_markup());
    } else {
        println!("{}", rich.to_unicode());
    }

    Ok(())
}
