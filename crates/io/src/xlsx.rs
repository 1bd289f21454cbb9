// Excel export of the assignment table

use std::path::Path;

use rust_xlsxwriter::{Format, FormatBorder, Workbook};

use entstruct_recon::NumberedRow;

use crate::HEADERS;

pub const SHEET_NAME: &str = "Ledger_LE_BU_Assignments";

/// Bounds for auto-sized column widths, in characters.
const MIN_WIDTH: usize = 10;
const MAX_WIDTH: usize = 60;

/// Export statistics
#[derive(Debug, Default)]
pub struct ExportResult {
    pub rows_exported: usize,
}

/// Write the assignment table to a single-sheet workbook.
///
/// Header row is bold and frozen, with an autofilter over the data range.
pub fn export(rows: &[NumberedRow], path: &Path) -> Result<ExportResult, String> {
    let mut workbook = Workbook::new();
    let worksheet = workbook
        .add_worksheet()
        .set_name(SHEET_NAME)
        .map_err(|e| format!("Failed to create sheet '{}': {}", SHEET_NAME, e))?;

    let header_format = Format::new().set_bold().set_border_bottom(FormatBorder::Thin);
    for (col, header) in HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(|e| format!("Failed to write header: {}", e))?;
    }

    let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.chars().count()).collect();

    for (i, n) in rows.iter().enumerate() {
        let row32 = (i + 1) as u32;
        worksheet
            .write_number(row32, 0, n.assignment as f64)
            .map_err(|e| format!("Failed to write row {}: {}", row32, e))?;

        let cells = [&n.row.ledger, &n.row.legal_entity, &n.row.business_unit];
        for (offset, value) in cells.iter().enumerate() {
            let col = offset + 1;
            if !value.is_empty() {
                worksheet
                    .write_string(row32, col as u16, value.as_str())
                    .map_err(|e| format!("Failed to write row {}: {}", row32, e))?;
            }
            widths[col] = widths[col].max(value.chars().count());
        }
    }

    for (col, width) in widths.iter().enumerate() {
        let width = (*width + 2).clamp(MIN_WIDTH, MAX_WIDTH);
        worksheet
            .set_column_width(col as u16, width as f64)
            .map_err(|e| format!("Failed to set column width: {}", e))?;
    }

    worksheet
        .set_freeze_panes(1, 0)
        .map_err(|e| format!("Failed to freeze header: {}", e))?;
    if !rows.is_empty() {
        worksheet
            .autofilter(0, 0, rows.len() as u32, (HEADERS.len() - 1) as u16)
            .map_err(|e| format!("Failed to set autofilter: {}", e))?;
    }

    workbook
        .save(path)
        .map_err(|e| format!("Failed to save XLSX file: {}", e))?;

    Ok(ExportResult { rows_exported: rows.len() })
}
