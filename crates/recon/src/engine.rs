use crate::assign::build_assignments;
use crate::bridge::BridgeRelation;
use crate::identity::IdentitySets;
use crate::model::{ReconInput, ReconMeta, ReconResult};
use crate::ordering::order_rows;
use crate::summary::compute_summary;

/// Reconcile pre-loaded sources into the ordered assignment table.
///
/// Never fails: malformed sources were already turned into warnings during
/// extraction, and an empty input produces an empty table.
pub fn run(input: &ReconInput) -> ReconResult {
    let identities = IdentitySets::build(input);
    let (bridge, conflicts) = BridgeRelation::build(&input.ledger_identifiers, &input.identifier_names);

    let assignments = build_assignments(&input.business_units, &identities, &bridge);
    let rows = order_rows(assignments.rows);

    let mut warnings = input.warnings.clone();
    warnings.extend(conflicts);

    let summary = compute_summary(
        &rows,
        assignments.backfilled,
        assignments.ambiguities.len(),
        warnings.len(),
    );

    log::info!(
        "built {} assignment rows ({} ledgers, {} legal entities, {} business unit records)",
        summary.total_rows,
        identities.ledgers.len(),
        identities.legal_entities.len(),
        input.business_units.len(),
    );

    ReconResult {
        meta: ReconMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        rows,
        warnings,
        ambiguities: assignments.ambiguities,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceConfig;
    use crate::extract::extract_source;
    use crate::model::SourceKind;

    #[test]
    fn integration_from_csv_tables() {
        let config = SourceConfig::default();
        let tables = [
            (SourceKind::Ledgers, "ORA_GL_PRIMARY_LEDGER_CONFIG.Name\nUS Primary\nUK Primary\nJP Primary\n"),
            (SourceKind::LegalEntities, "Name\nAcme Inc\nAcme Ltd\nAcme KK\nDormant LLC\n"),
            (
                SourceKind::LedgerIdentifiers,
                "GL_LEDGER.Name,LegalEntityIdentifier\nUS Primary,100\nUK Primary,200\nUK Primary,201\n",
            ),
            (
                SourceKind::IdentifierNames,
                "LegalEntityIdentifier,ObjectName\n100,Acme Inc\n200,Acme Ltd\n201,Acme KK\n",
            ),
            (
                SourceKind::BusinessUnits,
                "Name,PrimaryLedgerName,LegalEntityName\nUS Ops,US Primary,\nUK Ops,UK Primary,\nTokyo Ops,,Acme KK\n",
            ),
        ];

        let mut input = ReconInput::default();
        for (source, csv) in tables {
            input.merge(extract_source(source, csv, &config).unwrap());
        }

        let result = run(&input);
        let flat: Vec<_> = result
            .rows
            .iter()
            .map(|n| (n.row.ledger.as_str(), n.row.legal_entity.as_str(), n.row.business_unit.as_str()))
            .collect();

        assert_eq!(
            flat,
            [
                ("JP Primary", "", ""),
                ("UK Primary", "", "UK Ops"),
                ("UK Primary", "Acme KK", "Tokyo Ops"),
                ("UK Primary", "Acme Ltd", ""),
                ("US Primary", "Acme Inc", "US Ops"),
                ("", "Dormant LLC", ""),
            ]
        );
        assert_eq!(result.rows.last().unwrap().assignment, 6);
        assert_eq!(result.summary.backfilled, 2);
        assert_eq!(result.summary.ambiguous, 1);
        assert_eq!(result.ambiguities[0].business_unit, "UK Ops");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn empty_input_is_empty_output() {
        let result = run(&ReconInput::default());
        assert!(result.rows.is_empty());
        assert_eq!(result.summary.total_rows, 0);
    }
}
