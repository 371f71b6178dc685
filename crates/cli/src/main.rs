// sharecount - share quantity extraction from statement text

mod config_cmd;
mod exit_codes;
mod extract;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use sharecount_quantity::{normalize_with, CommaPolicy};

use config_cmd::ConfigCommands;
use exit_codes::{EXIT_CONFIG_INVALID, EXIT_ERROR, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "sharecount")]
#[command(about = "Extract share and unit quantities from financial statement text")]
#[command(long_version = long_version())]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the quantity held from statement text
    #[command(after_help = "\
Examples:
  sharecount extract statement.txt
  sharecount extract statement.txt --price 350.45 --value 35045 --json
  pdftotext stmt.pdf - | sharecount extract --isin US0378331005 --price 350.45 --value 35045
  sharecount extract statement.txt --config tuned.toml

Exit codes:
  0   quantity found
  3   cannot read input or config
  4   invalid config
  10  quantity unknown")]
    Extract {
        /// Text file (omit to read stdin)
        file: Option<PathBuf>,

        /// Security identifier (ISIN) the text refers to
        #[arg(long)]
        isin: Option<String>,

        /// Security name, recorded in the report only
        #[arg(long)]
        name: Option<String>,

        /// Unit price extracted from the same document
        #[arg(long)]
        price: Option<f64>,

        /// Market value extracted from the same document
        #[arg(long)]
        value: Option<f64>,

        /// Engine config file (TOML)
        #[arg(long, env = "SHARECOUNT_CONFIG")]
        config: Option<PathBuf>,

        /// Output the full extraction report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Normalize numerals the way the extractor reads them
    #[command(after_help = "\
Examples:
  sharecount normalize 1,234.56 1.234,56 \"1'234.56\"
  sharecount normalize 1,234 --comma decimal")]
    Normalize {
        /// Raw numerals
        #[arg(required = true)]
        raw: Vec<String>,

        /// How a single comma followed by exactly three digits is read
        #[arg(long, value_enum, default_value = "thousands")]
        comma: CommaArg,
    },

    /// Inspect and validate engine configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Clone, Copy, ValueEnum)]
enum CommaArg {
    Thousands,
    Decimal,
}

impl From<CommaArg> for CommaPolicy {
    fn from(arg: CommaArg) -> Self {
        match arg {
            CommaArg::Thousands => CommaPolicy::Thousands,
            CommaArg::Decimal => CommaPolicy::Decimal,
        }
    }
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  sharecount-quantity ", env!("CARGO_PKG_VERSION"),
        "\nbuild:   ", env!("BUILD_PROFILE"),
        "\ntarget:  ", env!("TARGET"),
        "\ncontract_version(extract): 1",
    )
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        None => {
            eprintln!("Usage: sharecount <command> [options]");
            eprintln!("       sharecount --help for more information");
            Ok(())
        }
        Some(Commands::Extract { file, isin, name, price, value, config, json }) => {
            extract::cmd_extract(file, isin, name, price, value, config, json)
        }
        Some(Commands::Normalize { raw, comma }) => cmd_normalize(raw, comma.into()),
        Some(Commands::Config(cmd)) => config_cmd::cmd_config(cmd),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_CONFIG_INVALID, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// normalize
// ============================================================================

fn cmd_normalize(raw: Vec<String>, policy: CommaPolicy) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    for r in &raw {
        let line = match normalize_with(r, policy) {
            Some(v) => v.to_string(),
            None => "invalid".to_string(),
        };
        writeln!(handle, "{}", line).map_err(|e| CliError::io(e.to_string()))?;
    }

    Ok(())
}
