//! Config CLI commands.

use std::path::PathBuf;

use clap::Subcommand;
use colored::Colorize;

use crate::config::template::{create_config_file, generate_config_template};
use crate::config::{self, config_paths};
use crate::error::StartpageError;

/// Config management commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum ConfigCommands {
    /// Write a configuration file with every option documented.
    ///
    /// All options are commented out and show their defaults; uncomment the
    /// ones you want to change.
    #[command(
        name = "init",
        after_long_help = r#"Examples:
  startpage config init                             # Create config at the default location
  startpage config init --force                     # Overwrite an existing config
  startpage config init --path ~/startpage.jsonc    # Create at a custom path
  startpage config init --stdout                    # Print the template"#
    )]
    Init {
        /// Overwrite the configuration file if it exists.
        #[arg(long, short)]
        force: bool,

        /// Where to write the file.
        /// Defaults to the first search path.
        #[arg(long, short, value_name = "PATH")]
        path: Option<PathBuf>,

        /// Print the template instead of writing a file.
        #[arg(long)]
        stdout: bool,
    },

    /// Show the configuration search paths and the settings file in use.
    Path,
}

/// Execute config subcommands.
///
/// # Errors
///
/// Returns an error if the configuration file cannot be written.
pub fn execute(cmd: &ConfigCommands) -> Result<(), StartpageError> {
    match cmd {
        ConfigCommands::Init { force, path, stdout } => {
            if *stdout {
                println!("{}", generate_config_template());
                Ok(())
            } else {
                init_config(*force, path.clone())
            }
        }
        ConfigCommands::Path => {
            show_paths();
            Ok(())
        }
    }
}

fn init_config(force: bool, custom_path: Option<PathBuf>) -> Result<(), StartpageError> {
    let config_path = custom_path
        .or_else(|| config_paths().into_iter().next())
        .unwrap_or_else(|| PathBuf::from("config.jsonc"));

    if config_path.exists() && !force {
        return Err(StartpageError::ConfigError(format!(
            "Configuration file already exists at: {}\nUse --force to overwrite.",
            config_path.display()
        )));
    }

    create_config_file(&config_path).map_err(|err| {
        StartpageError::ConfigError(format!(
            "Failed to create config file {}: {err}",
            config_path.display()
        ))
    })?;

    tracing::info!(path = %config_path.display(), "configuration file created");
    println!("Configuration file created at: {}", config_path.display());
    println!("All options are commented out; uncomment the ones you want to change.");
    Ok(())
}

fn show_paths() {
    println!("Configuration file search paths (in priority order):\n");

    // Loading the config records which file was used.
    config::get_config();
    let active = config::get_config_path();
    let custom = config::custom_config_path();
    if let Some(path) = custom {
        println!("  --config {}", path.display());
    }

    for (i, path) in config_paths().iter().enumerate() {
        let marker = if active.is_some_and(|a| a == path) {
            " (active)".green().to_string()
        } else if path.exists() {
            " (exists)".dimmed().to_string()
        } else {
            String::new()
        };
        println!("  {}. {}{marker}", i + 1, path.display());
    }

    if active.is_none() {
        println!("\nNo configuration file found, using defaults.");
        println!("Run 'startpage config init' to create one.");
    }

    println!("\nSettings file: {}", config::settings_path().display());
}
