// Format dispatch for the assignment table

use std::fmt;
use std::path::Path;

use entstruct_recon::NumberedRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Csv,
    Drawio,
    Json,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [Self::Xlsx, Self::Csv, Self::Drawio, Self::Json];

    /// Infer the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xlsx" => Some(Self::Xlsx),
            "csv" => Some(Self::Csv),
            "drawio" | "xml" => Some(Self::Drawio),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
            Self::Drawio => "drawio",
            Self::Json => "json",
        }
    }

    /// File name used when the format flag is given without a path.
    pub fn default_file_name(self) -> String {
        match self {
            Self::Xlsx | Self::Drawio => format!("EnterpriseStructure.{}", self.extension()),
            Self::Csv | Self::Json => format!("Ledger_LE_BU_Assignments.{}", self.extension()),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Write the table in `format` to `path`.
pub fn export(format: ExportFormat, rows: &[NumberedRow], path: &Path) -> Result<(), String> {
    log::debug!("exporting {} rows as {} to {}", rows.len(), format, path.display());
    match format {
        ExportFormat::Xlsx => crate::xlsx::export(rows, path).map(|_| ()),
        ExportFormat::Csv => crate::csv::export(rows, path),
        ExportFormat::Drawio => crate::drawio::export(rows, path),
        ExportFormat::Json => crate::json::export(rows, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entstruct_recon::AssignmentRow;
    use std::path::PathBuf;

    #[test]
    fn format_from_extension() {
        assert_eq!(ExportFormat::from_path(&PathBuf::from("out.XLSX")), Some(ExportFormat::Xlsx));
        assert_eq!(ExportFormat::from_path(&PathBuf::from("a/b.csv")), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::from_path(&PathBuf::from("d.drawio")), Some(ExportFormat::Drawio));
        assert_eq!(ExportFormat::from_path(&PathBuf::from("r.json")), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::from_path(&PathBuf::from("noext")), None);
        assert_eq!(ExportFormat::from_path(&PathBuf::from("x.pdf")), None);
    }

    #[test]
    fn default_file_names() {
        assert_eq!(ExportFormat::Xlsx.default_file_name(), "EnterpriseStructure.xlsx");
        assert_eq!(ExportFormat::Drawio.default_file_name(), "EnterpriseStructure.drawio");
        assert_eq!(ExportFormat::Csv.default_file_name(), "Ledger_LE_BU_Assignments.csv");
        assert_eq!(ExportFormat::Json.default_file_name(), "Ledger_LE_BU_Assignments.json");
    }

    #[test]
    fn every_format_writes_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let rows = vec![NumberedRow { assignment: 1, row: AssignmentRow::new("US Primary", "Acme Inc", "US Ops") }];
        for format in ExportFormat::ALL {
            let path = dir.path().join(format.default_file_name());
            export(format, &rows, &path).unwrap();
            let len = std::fs::metadata(&path).unwrap().len();
            assert!(len > 0, "{format} export is empty");
        }
    }
}
