use crate::config::SourceConfig;
use crate::error::ReconError;
use crate::model::{
    BusinessUnitRecord, IdentifierNameLink, LedgerIdentifierLink, ReconInput, SourceKind,
    SourceWarning,
};

/// Parse one source table into typed records.
///
/// Values are trimmed. Short rows read missing cells as empty. Fails with
/// `MissingColumns` when any configured column is absent from the header.
pub fn extract_source(
    source: SourceKind,
    csv_data: &str,
    config: &SourceConfig,
) -> Result<ReconInput, ReconError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ReconError::Csv { source, message: e.to_string() })?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let wanted = config.columns(source);
    let missing: Vec<String> = wanted
        .iter()
        .filter(|c| !headers.iter().any(|h| h == *c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ReconError::MissingColumns { source, missing, found: headers });
    }

    let idx: Vec<usize> = wanted
        .iter()
        .filter_map(|c| headers.iter().position(|h| h == c))
        .collect();

    let mut out = ReconInput::default();
    for record in reader.records() {
        let record = record.map_err(|e| ReconError::Csv { source, message: e.to_string() })?;
        let field = |i: usize| record.get(idx[i]).unwrap_or("").trim().to_string();

        match source {
            SourceKind::Ledgers => push_name(&mut out.ledgers, field(0)),
            SourceKind::LegalEntities => push_name(&mut out.legal_entities, field(0)),
            SourceKind::LedgerIdentifiers => out.ledger_identifiers.push(LedgerIdentifierLink {
                ledger: field(0),
                identifier: field(1),
            }),
            SourceKind::IdentifierNames => out.identifier_names.push(IdentifierNameLink {
                identifier: field(0),
                legal_entity: field(1),
            }),
            SourceKind::BusinessUnits => {
                let bu = BusinessUnitRecord {
                    name: field(0),
                    primary_ledger_name: field(1),
                    legal_entity_name: field(2),
                };
                if !(bu.name.is_empty() && bu.primary_ledger_name.is_empty() && bu.legal_entity_name.is_empty()) {
                    out.business_units.push(bu);
                }
            }
        }
    }

    log::debug!("{source}: {} records from {} columns", out_len(&out), headers.len());

    Ok(out)
}

/// Like [`extract_source`], but a failure becomes a warning on an empty input.
pub fn extract_or_warn(
    source: SourceKind,
    csv_data: &str,
    config: &SourceConfig,
    origin: &str,
) -> ReconInput {
    match extract_source(source, csv_data, config) {
        Ok(input) => input,
        Err(err) => {
            log::warn!("{origin}: skipping {source}: {err}");
            let warning = match err {
                ReconError::MissingColumns { source, missing, found } => {
                    SourceWarning::missing_columns(Some(origin.to_string()), source, missing, found)
                }
                other => SourceWarning::unreadable(origin, Some(source), other.to_string()),
            };
            ReconInput {
                warnings: vec![warning],
                ..Default::default()
            }
        }
    }
}

fn push_name(names: &mut Vec<String>, name: String) {
    if !name.is_empty() {
        names.push(name);
    }
}

fn out_len(input: &ReconInput) -> usize {
    input.ledgers.len()
        + input.legal_entities.len()
        + input.ledger_identifiers.len()
        + input.identifier_names.len()
        + input.business_units.len()
}
