//! Config command - manage configuration.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use tracing::debug;

use invscan_core::models::config::InvscanConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Write a configuration file with default values
    Init {
        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },

    /// Print one value (e.g., "extraction.boundary_token")
    Get {
        /// Dotted configuration key
        key: String,
    },

    /// Change one value; JSON literals keep their type
    Set {
        /// Dotted configuration key
        key: String,
        /// New value
        value: String,
    },

    /// Show configuration file path
    Path,
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("invscan")
        .join("config.json")
}

fn resolve_path(config_path: Option<&str>) -> PathBuf {
    config_path.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load the configuration used by the processing commands.
///
/// An explicit path must exist; the default path falls back to built-in
/// defaults when absent.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<InvscanConfig> {
    if let Some(path) = config_path {
        debug!("Loading configuration from {}", path);
        return Ok(InvscanConfig::from_file(Path::new(path))?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading configuration from {}", path.display());
        Ok(InvscanConfig::from_file(&path)?)
    } else {
        Ok(InvscanConfig::default())
    }
}

fn load_or_default(path: &Path) -> anyhow::Result<InvscanConfig> {
    if path.exists() {
        Ok(InvscanConfig::from_file(path)?)
    } else {
        Ok(InvscanConfig::default())
    }
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let path = resolve_path(config_path);

    match args.command {
        ConfigCommand::Show => {
            if !path.exists() {
                eprintln!("{} No config file found, showing defaults.", style("ℹ").blue());
            }
            let config = load_or_default(&path)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            write_config(&path, &InvscanConfig::default())?;
            println!(
                "{} Created configuration file at {}",
                style("✓").green(),
                path.display()
            );
        }
        ConfigCommand::Get { key } => {
            let value = load_or_default(&path)?.get_value(&key)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        ConfigCommand::Set { key, value } => {
            let mut config = load_or_default(&path)?;
            let stored = config.set_value(&key, &value)?;
            config.extraction.validate()?;
            write_config(&path, &config)?;
            println!(
                "{} Set {} = {}",
                style("✓").green(),
                key,
                serde_json::to_string(&stored)?
            );
        }
        ConfigCommand::Path => {
            println!("Configuration file: {}", path.display());
            if path.exists() {
                println!("Status: {}", style("exists").green());
            } else {
                println!("Status: {}", style("not created").yellow());
                println!();
                println!("Run 'invscan config init' to create a configuration file.");
            }
        }
    }

    Ok(())
}

fn write_config(path: &Path, config: &InvscanConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    config.save(path)?;
    Ok(())
}
