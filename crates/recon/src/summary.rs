use crate::model::{NumberedRow, ReconSummary};

/// Compute summary statistics over the ordered rows.
pub fn compute_summary(rows: &[NumberedRow], backfilled: usize, ambiguous: usize, warnings: usize) -> ReconSummary {
    let mut fully_assigned = 0;
    let mut ledger_only = 0;
    let mut legal_entity_only = 0;
    let mut without_business_unit = 0;

    for n in rows {
        let r = &n.row;
        let has_ledger = !r.ledger.is_empty();
        let has_le = !r.legal_entity.is_empty();
        let has_bu = !r.business_unit.is_empty();

        match (has_ledger, has_le, has_bu) {
            (true, true, true) => fully_assigned += 1,
            (true, false, false) => ledger_only += 1,
            (false, true, false) => legal_entity_only += 1,
            _ => {}
        }
        if !has_bu {
            without_business_unit += 1;
        }
    }

    ReconSummary {
        total_rows: rows.len(),
        fully_assigned,
        ledger_only,
        legal_entity_only,
        without_business_unit,
        backfilled,
        ambiguous,
        warnings,
    }
}
