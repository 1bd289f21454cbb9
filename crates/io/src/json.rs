// JSON export

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use entstruct_recon::NumberedRow;

/// Export rows as a JSON array of objects.
pub fn export(rows: &[NumberedRow], path: &Path) -> Result<(), String> {
    let file = File::create(path).map_err(|e| e.to_string())?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, rows).map_err(|e| e.to_string())?;
    Ok(())
}
