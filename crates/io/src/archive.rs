//! Export package ingestion.
//!
//! An input is either a ZIP archive (as downloaded from the ERP export) or a
//! directory holding the extracted CSV files. Each package may carry any
//! subset of the five source tables; tables not present are skipped silently.
//! Packages that cannot be opened and tables that cannot be parsed become
//! warnings and never abort ingestion.

use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

use entstruct_recon::extract::extract_or_warn;
use entstruct_recon::{ReconInput, SourceConfig, SourceKind, SourceWarning};

use crate::csv::decode_text;

/// Merged records from every input, plus how many inputs could be opened.
#[derive(Debug, Default)]
pub struct Ingested {
    pub input: ReconInput,
    pub opened: usize,
    pub unreadable: usize,
}

/// Load every input in order and merge the results.
pub fn load_inputs(paths: &[PathBuf], config: &SourceConfig) -> Ingested {
    let mut ingested = Ingested::default();
    for path in paths {
        match load_path(path, config) {
            Ok(input) => {
                ingested.opened += 1;
                ingested.input.merge(input);
            }
            Err(warning) => {
                log::warn!("{warning}");
                ingested.unreadable += 1;
                ingested.input.warnings.push(warning);
            }
        }
    }
    ingested
}

/// Load one package. `Err` means the package itself could not be opened.
pub fn load_path(path: &Path, config: &SourceConfig) -> Result<ReconInput, SourceWarning> {
    if path.is_dir() {
        return Ok(load_directory(path, config));
    }
    let origin = display_name(path);
    let file = std::fs::File::open(path)
        .map_err(|e| SourceWarning::unreadable(&origin, None, e.to_string()))?;
    load_archive(file, &origin, config)
}

/// Read the source tables out of a ZIP archive.
pub fn load_archive<R: Read + Seek>(
    reader: R,
    origin: &str,
    config: &SourceConfig,
) -> Result<ReconInput, SourceWarning> {
    let mut archive = zip::ZipArchive::new(reader).map_err(|e| {
        SourceWarning::unreadable(origin, None, format!("could not open as a ZIP: {e}"))
    })?;

    let names: Vec<String> = archive.file_names().map(str::to_string).collect();
    let mut input = ReconInput::default();
    let mut found = 0;

    for source in SourceKind::ALL {
        let Some(entry) = find_entry(&names, config.file(source)) else {
            continue;
        };
        found += 1;

        let mut bytes = Vec::new();
        let read = archive
            .by_name(entry)
            .map_err(|e| e.to_string())
            .and_then(|mut f| f.read_to_end(&mut bytes).map_err(|e| e.to_string()));
        match read {
            Ok(_) => input.merge(extract_or_warn(source, &decode_text(bytes), config, origin)),
            Err(e) => input.warnings.push(SourceWarning::unreadable(origin, Some(source), e)),
        }
    }

    if found == 0 {
        log::info!("{origin}: no recognised source tables");
    }
    Ok(input)
}

/// Read the source tables from a directory of extracted CSV files.
pub fn load_directory(dir: &Path, config: &SourceConfig) -> ReconInput {
    let origin = display_name(dir);
    let mut input = ReconInput::default();
    for source in SourceKind::ALL {
        let path = dir.join(config.file(source));
        if !path.is_file() {
            continue;
        }
        match crate::csv::read_file_as_utf8(&path) {
            Ok(text) => input.merge(extract_or_warn(source, &text, config, &origin)),
            Err(e) => input.warnings.push(SourceWarning::unreadable(&origin, Some(source), e)),
        }
    }
    input
}

/// Exact entry name first, then any nested entry with that file name.
fn find_entry<'a>(names: &'a [String], file: &str) -> Option<&'a str> {
    names
        .iter()
        .find(|n| n.as_str() == file)
        .or_else(|| names.iter().find(|n| n.rsplit('/').next() == Some(file)))
        .map(String::as_str)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
