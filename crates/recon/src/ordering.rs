use std::cmp::Ordering;

use crate::model::{AssignmentRow, NumberedRow};

/// Presentation order: rows with a ledger first, then ascending
/// (ledger, legal entity, business unit). Empty sorts first among equals.
pub fn compare_rows(a: &AssignmentRow, b: &AssignmentRow) -> Ordering {
    a.ledger
        .is_empty()
        .cmp(&b.ledger.is_empty())
        .then_with(|| a.ledger.cmp(&b.ledger))
        .then_with(|| a.legal_entity.cmp(&b.legal_entity))
        .then_with(|| a.business_unit.cmp(&b.business_unit))
}

/// Sort rows and assign 1-based assignment numbers.
pub fn order_rows(mut rows: Vec<AssignmentRow>) -> Vec<NumberedRow> {
    rows.sort_by(compare_rows);
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| NumberedRow { assignment: i + 1, row })
        .collect()
}
