// entstruct CLI - Ledger / Legal Entity / Business Unit assignments from ERP export packages

mod exit_codes;
mod recon;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::EXIT_SUCCESS;

#[derive(Parser)]
#[command(name = "entstruct")]
#[command(about = "Reconcile ledgers, legal entities and business units into one assignment table")]
#[command(long_version = LONG_VERSION)]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Debug logging (overridden by RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the assignment table from one or more export packages
    #[command(after_help = "\
Examples:
  entstruct build ledgers.zip legal_entities.zip business_units.zip
  entstruct build exports/*.zip --xlsx --drawio
  entstruct build export_dir --csv=out/assignments.csv --json
  entstruct build exports/*.zip --export table.xlsx --export table.json --strict
  entstruct build exports/*.zip --config fusion.toml -o result.json")]
    Build(recon::BuildArgs),

    /// Validate a source layout config without running
    #[command(after_help = "\
Examples:
  entstruct validate fusion.toml")]
    Validate {
        /// Path to the TOML config file
        config: PathBuf,
    },

    /// Print the effective source layout config as TOML
    #[command(after_help = "\
Examples:
  entstruct config > fusion.toml
  entstruct config --config fusion.toml")]
    Config {
        /// Config file to merge over the defaults
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// `--version` detail: commit, cargo profile and target triple, stamped by build.rs.
const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (", env!("ENTSTRUCT_COMMIT"), ")",
    "\nbuild:   ", env!("ENTSTRUCT_PROFILE"),
    "\ntarget:  ", env!("ENTSTRUCT_TARGET"),
);

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        None => {
            // No subcommand = show usage
            eprintln!("Usage: entstruct <command> [options]");
            eprintln!("       entstruct --help for more information");
            Ok(())
        }
        Some(Commands::Build(args)) => recon::cmd_build(args),
        Some(Commands::Validate { config }) => recon::cmd_validate(config),
        Some(Commands::Config { config }) => recon::cmd_config(config),
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
    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
