//! `sharecount config`: inspect and validate engine configuration.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use sharecount_quantity::{ExtractConfig, ExtractError};

use crate::CliError;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Validate a config file without running extraction
    #[command(after_help = "\
Examples:
  sharecount config validate tuned.toml")]
    Validate {
        /// Path to the TOML config file
        file: PathBuf,
    },

    /// Print the default configuration as TOML
    #[command(after_help = "\
Examples:
  sharecount config defaults > tuned.toml")]
    Defaults,
}

pub fn cmd_config(cmd: ConfigCommands) -> Result<(), CliError> {
    match cmd {
        ConfigCommands::Validate { file } => {
            load_config(&file)?;
            eprintln!("{}: ok", file.display());
            Ok(())
        }
        ConfigCommands::Defaults => {
            let text = ExtractConfig::default()
                .to_toml()
                .map_err(|e| CliError::general(e.to_string()))?;
            print!("{text}");
            Ok(())
        }
    }
}

/// Read, parse and validate a config file.
pub fn load_config(path: &Path) -> Result<ExtractConfig, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("cannot read config {}: {e}", path.display())))?;

    ExtractConfig::from_toml(&text).map_err(|e| {
        let hint = match &e {
            ExtractError::ConfigParse(_) => "check key names against `sharecount config defaults`",
            ExtractError::ConfigValidation(_) => "fix the value named above, or start from `sharecount config defaults`",
        };
        CliError::config(format!("{}: {e}", path.display())).with_hint(hint)
    })
}
