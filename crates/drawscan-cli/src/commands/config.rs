//! Config command - inspect and edit the JSON configuration.

use std::fs;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use drawscan_core::DrawscanConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the configuration in effect
    Show,

    /// Write a configuration file with default values
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print one value (e.g. "segmenter.line_tolerance")
    Get { key: String },

    /// Change one value; text that is not JSON is stored as a string
    Set { key: String, value: String },

    /// Print where the configuration file lives
    Path,
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("drawscan")
        .join("config.json")
}

/// The file edited by the config command: `--config`, else the user config file.
struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    fn locate(config_path: Option<&str>) -> Self {
        Self {
            path: config_path.map(PathBuf::from).unwrap_or_else(default_config_path),
        }
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }

    fn load(&self) -> anyhow::Result<DrawscanConfig> {
        if self.exists() {
            Ok(DrawscanConfig::from_file(&self.path)?)
        } else {
            Ok(DrawscanConfig::default())
        }
    }

    fn store(&self, config: &DrawscanConfig) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        config.save(&self.path)?;
        Ok(())
    }
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let file = ConfigFile::locate(config_path);

    match args.command {
        ConfigCommand::Show => {
            if !file.exists() {
                eprintln!("{} No config file found, showing defaults.", style("ℹ").blue());
            }
            println!("{}", serde_json::to_string_pretty(&file.load()?)?);
        }
        ConfigCommand::Init { force } => {
            if file.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    file.path.display()
                );
            }
            file.store(&DrawscanConfig::default())?;
            println!("{} Created configuration file at {}", style("✓").green(), file.path.display());
        }
        ConfigCommand::Get { key } => {
            let value = file.load()?.value(&key)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        ConfigCommand::Set { key, value } => {
            let mut config = file.load()?;
            let stored = config.set_value(&key, &value)?;
            file.store(&config)?;
            println!("{} Set {} = {}", style("✓").green(), key, stored);
        }
        ConfigCommand::Path => {
            println!("Configuration file: {}", file.path.display());
            if file.exists() {
                println!("Status: {}", style("exists").green());
            } else {
                println!("Status: {}", style("not created").yellow());
                println!("Run 'drawscan config init' to create it.");
            }
        }
    }

    Ok(())
}
