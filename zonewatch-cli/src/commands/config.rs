//! Configuration management CLI commands.
//!
//! Provides `config path`, `config show`, and `config init` for inspecting
//! and creating the configuration file.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use zonewatch::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Print the effective configuration as INI
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run a config subcommand.
///
/// `config_path` overrides the default location (~/.zonewatch/config.ini).
pub fn run(command: ConfigCommands, config_path: Option<&Path>) -> Result<(), CliError> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(config_file_path);

    match command {
        ConfigCommands::Path => run_path(&path),
        ConfigCommands::Show => run_show(&path),
        ConfigCommands::Init { force } => run_init(path, force),
    }
}

/// Show the configuration file path.
fn run_path(path: &Path) -> Result<(), CliError> {
    println!("{}", path.display());
    Ok(())
}

/// Print the effective configuration.
fn run_show(path: &Path) -> Result<(), CliError> {
    if !path.exists() {
        println!("; No configuration file at {}; showing defaults", path.display());
    }
    let config = ConfigFile::load_from(path)?;
    print!("{}", config.to_ini_string());
    Ok(())
}

/// Write the default configuration.
fn run_init(path: PathBuf, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        println!("Configuration already exists at {}", path.display());
        println!("Use 'zonewatch config init --force' to overwrite it.");
        return Ok(());
    }

    ConfigFile::default().save_to(&path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
