// entlink CLI - reconcile a program master list against registry scrapes

mod exit_codes;
mod merge;
mod run;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::EXIT_SUCCESS;

#[derive(Parser)]
#[command(name = "entlink")]
#[command(about = "CSV record linkage: master list in, identifiers backfilled out")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the matching pipeline from a TOML config file
    #[command(after_help = "\
Examples:
  entlink run alumni.match.toml
  entlink run alumni.match.toml --json
  entlink run alumni.match.toml --output report.json
  RUST_LOG=debug entlink run alumni.match.toml")]
    Run {
        /// Path to the .match.toml config file
        config: PathBuf,

        /// Output JSON report to stdout instead of human summary
        #[arg(long)]
        json: bool,

        /// Write JSON report to file (overrides output.json in config)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Validate a match config without running
    #[command(after_help = "\
Examples:
  entlink validate alumni.match.toml")]
    Validate {
        /// Path to the .match.toml config file
        config: PathBuf,
    },

    /// Concatenate scraper batch CSVs into one file
    #[command(after_help = "\
Examples:
  entlink merge output/ -o registry.csv
  entlink merge output/ --pattern 'batch_*.csv' -o registry.csv")]
    Merge {
        /// Directory containing the batch files
        dir: PathBuf,

        /// Glob pattern for batch files within the directory
        #[arg(long, default_value = "batch_*.csv")]
        pattern: String,

        /// Output CSV path
        #[arg(long, short = 'o')]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            config,
            json,
            output,
        } => run::cmd_run(config, json, output),
        Commands::Validate { config } => run::cmd_validate(config),
        Commands::Merge {
            dir,
            pattern,
            output,
        } => merge::cmd_merge(&dir, &pattern, &output),
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
    pub fn config(msg: impl Into<String>) -> Self {
        Self {
            code: exit_codes::EXIT_INVALID_CONFIG,
            message: msg.into(),
            hint: None,
        }
    }

    pub fn runtime(msg: impl Into<String>) -> Self {
        Self {
            code: exit_codes::EXIT_RUNTIME,
            message: msg.into(),
            hint: None,
        }
    }
}
