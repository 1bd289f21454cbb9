//! `entstruct build`, `entstruct validate`, `entstruct config`.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;

use entstruct_io::{drawio, export, load_inputs, ExportFormat};
use entstruct_recon::model::{
    Ambiguity, BackfillField, NumberedRow, ReconMeta, ReconResult, ReconSummary, SourceWarning,
};
use entstruct_recon::{ReconError, SourceConfig};

use crate::exit_codes::{EXIT_ERROR, EXIT_INVALID_CONFIG, EXIT_NO_INPUT, EXIT_RUNTIME, EXIT_USAGE, EXIT_WARNINGS};
use crate::CliError;

#[derive(Args)]
pub struct BuildArgs {
    /// ZIP export packages or directories of extracted CSV files
    #[arg(required = true, value_name = "INPUT")]
    pub inputs: Vec<PathBuf>,

    /// Source layout config (TOML); defaults to the Oracle Fusion export layout
    #[arg(long, env = "ENTSTRUCT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write the table as Excel (default: EnterpriseStructure.xlsx)
    #[arg(long, value_name = "PATH", num_args = 0..=1, require_equals = true)]
    pub xlsx: Option<Option<PathBuf>>,

    /// Write the table as CSV (default: Ledger_LE_BU_Assignments.csv)
    #[arg(long, value_name = "PATH", num_args = 0..=1, require_equals = true)]
    pub csv: Option<Option<PathBuf>>,

    /// Write the structure diagram for diagrams.net (default: EnterpriseStructure.drawio)
    #[arg(long, value_name = "PATH", num_args = 0..=1, require_equals = true)]
    pub drawio: Option<Option<PathBuf>>,

    /// Write the table to PATH, format chosen by extension (.xlsx, .csv, .drawio, .json). Repeatable.
    #[arg(long, value_name = "PATH")]
    pub export: Vec<PathBuf>,

    /// Print a diagrams.net link that opens the structure diagram in the browser
    #[arg(long)]
    pub drawio_link: bool,

    /// Print the full result (rows, summary, warnings, ambiguities) as JSON to stdout.
    /// `meta.run_at` changes on every run; use --no-meta for reproducible output.
    #[arg(long)]
    pub json: bool,

    /// Leave `meta` (engine version, run time) out of the JSON result
    #[arg(long)]
    pub no_meta: bool,

    /// Write the full result JSON to file
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Exit with code 5 when any source warning was raised
    #[arg(long)]
    pub strict: bool,

    /// Suppress the stderr summary and warning lines
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

/// JSON shape of `--json` / `--output`.
#[derive(Serialize)]
struct BuildReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<&'a ReconMeta>,
    summary: &'a ReconSummary,
    rows: &'a [NumberedRow],
    warnings: &'a [SourceWarning],
    ambiguities: &'a [Ambiguity],
    #[serde(skip_serializing_if = "Option::is_none")]
    drawio_url: Option<&'a str>,
}

impl<'a> BuildReport<'a> {
    fn new(result: &'a ReconResult, with_meta: bool, drawio_url: Option<&'a str>) -> Self {
        Self {
            meta: with_meta.then_some(&result.meta),
            summary: &result.summary,
            rows: &result.rows,
            warnings: &result.warnings,
            ambiguities: &result.ambiguities,
            drawio_url,
        }
    }
}

fn err(code: u8, msg: impl Into<String>) -> CliError {
    CliError { code, message: msg.into(), hint: None }
}

fn config_err(e: ReconError) -> CliError {
    err(EXIT_INVALID_CONFIG, e.to_string())
}

fn load_config(path: Option<&Path>) -> Result<SourceConfig, CliError> {
    match path {
        Some(path) => SourceConfig::load(path).map_err(config_err),
        None => Ok(SourceConfig::default()),
    }
}

/// Every (format, path) the run should write, in flag order.
fn export_targets(args: &BuildArgs) -> Result<Vec<(ExportFormat, PathBuf)>, CliError> {
    let mut targets = Vec::new();
    for (format, flag) in [
        (ExportFormat::Xlsx, &args.xlsx),
        (ExportFormat::Csv, &args.csv),
        (ExportFormat::Drawio, &args.drawio),
    ] {
        if let Some(path) = flag {
            let path = path.clone().unwrap_or_else(|| PathBuf::from(format.default_file_name()));
            targets.push((format, path));
        }
    }
    for path in &args.export {
        let format = ExportFormat::from_path(path).ok_or_else(|| {
            err(EXIT_USAGE, format!("cannot infer export format from '{}'", path.display()))
                .with_hint("use one of the extensions: .xlsx, .csv, .drawio, .json")
        })?;
        targets.push((format, path.clone()));
    }
    Ok(targets)
}

pub fn cmd_build(args: BuildArgs) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;
    let targets = export_targets(&args)?;

    let ingested = load_inputs(&args.inputs, &config);
    log::debug!(
        "opened {} of {} input(s), {} unreadable",
        ingested.opened,
        args.inputs.len(),
        ingested.unreadable
    );
    if ingested.opened == 0 {
        for warning in &ingested.input.warnings {
            eprintln!("warning: {warning}");
        }
        return Err(err(EXIT_NO_INPUT, "no input could be read").with_hint(
            "pass ZIP export packages or directories holding the extracted CSV files",
        ));
    }

    let result = entstruct_recon::run(&ingested.input);

    for (format, path) in &targets {
        export(*format, &result.rows, path)
            .map_err(|e| err(EXIT_RUNTIME, format!("cannot write {}: {e}", path.display())))?;
        if !args.quiet {
            eprintln!("wrote {}", path.display());
        }
    }

    let drawio_url = if args.drawio_link {
        let xml = drawio::render(&result.rows)
            .map_err(|e| err(EXIT_RUNTIME, format!("cannot render diagram: {e}")))?;
        let url = drawio::share_url(&xml)
            .map_err(|e| err(EXIT_RUNTIME, format!("cannot build diagram link: {e}")))?;
        Some(url)
    } else {
        None
    };

    if args.json || args.output.is_some() {
        let report = BuildReport::new(&result, !args.no_meta, drawio_url.as_deref());
        let json_str = serde_json::to_string_pretty(&report)
            .map_err(|e| err(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
        if let Some(ref path) = args.output {
            std::fs::write(path, &json_str)
                .map_err(|e| err(EXIT_RUNTIME, format!("cannot write output: {e}")))?;
            if !args.quiet {
                eprintln!("wrote {}", path.display());
            }
        }
        if args.json {
            println!("{json_str}");
        }
    }

    if targets.is_empty() && !args.json {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        entstruct_io::csv::write_rows(&result.rows, &mut handle)
            .map_err(|e| err(EXIT_RUNTIME, format!("cannot write table: {e}")))?;
        handle.flush().map_err(|e| err(EXIT_RUNTIME, e.to_string()))?;
    }

    if !args.quiet {
        print_summary(&result, ingested.opened, args.inputs.len());
    }
    if let Some(url) = &drawio_url {
        if !args.json {
            eprintln!("open in diagrams.net: {url}");
        }
    }

    if args.strict && !result.warnings.is_empty() {
        return Err(err(
            EXIT_WARNINGS,
            format!("{} source warning(s) under --strict", result.warnings.len()),
        ));
    }

    Ok(())
}

/// Human summary to stderr.
fn print_summary(result: &ReconResult, opened: usize, inputs: usize) {
    let s = &result.summary;
    eprintln!(
        "built {} assignment rows from {} of {} input(s): {} fully assigned, {} ledger only, {} legal entity only, {} without business unit",
        s.total_rows, opened, inputs, s.fully_assigned, s.ledger_only, s.legal_entity_only, s.without_business_unit,
    );
    if s.backfilled > 0 || s.ambiguous > 0 {
        eprintln!("back-fill: {} row(s) inferred, {} skipped as ambiguous", s.backfilled, s.ambiguous);
    }
    for warning in &result.warnings {
        eprintln!("warning: {warning}");
    }
    for ambiguity in &result.ambiguities {
        eprintln!("ambiguous: {}", describe_ambiguity(ambiguity));
    }
}

fn describe_ambiguity(a: &Ambiguity) -> String {
    let field = match a.field {
        BackfillField::Ledger => "ledger",
        BackfillField::LegalEntity => "legal entity",
    };
    let subject = if a.business_unit.is_empty() {
        format!("'{}'", a.from)
    } else {
        format!("business unit '{}' (from '{}')", a.business_unit, a.from)
    };
    format!("{subject}: {} {field} candidates [{}]", a.candidates.len(), a.candidates.join(", "))
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = SourceConfig::load(&config_path).map_err(config_err)?;
    eprintln!(
        "valid: {}, {}, {}, {}, {}",
        config.ledgers.file,
        config.legal_entities.file,
        config.ledger_identifiers.file,
        config.identifier_names.file,
        config.business_units.file,
    );
    Ok(())
}

pub fn cmd_config(config_path: Option<PathBuf>) -> Result<(), CliError> {
    let config = load_config(config_path.as_deref())?;
    let text = config.to_toml().map_err(config_err)?;
    print!("{text}");
    Ok(())
}
