// CSV decoding and export

use std::io::Write;
use std::path::Path;

use entstruct_recon::NumberedRow;

use crate::HEADERS;

/// Decode raw table bytes to UTF-8 (handles Windows-1252, Latin-1, etc.)
pub fn decode_text(bytes: Vec<u8>) -> String {
    // Try UTF-8 first; on failure, recover the buffer from the error
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            // Fall back to Windows-1252 (common for Excel-exported CSVs)
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    }
}

/// Read a file and convert to UTF-8 if needed.
pub fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
    Ok(decode_text(bytes))
}

/// Write the assignment table with a header row.
pub fn write_rows<W: Write>(rows: &[NumberedRow], writer: W) -> Result<(), String> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADERS).map_err(|e| e.to_string())?;
    for n in rows {
        let assignment = n.assignment.to_string();
        wtr.write_record([
            assignment.as_str(),
            n.row.ledger.as_str(),
            n.row.legal_entity.as_str(),
            n.row.business_unit.as_str(),
        ])
        .map_err(|e| e.to_string())?;
    }
    wtr.flush().map_err(|e| e.to_string())?;
    Ok(())
}

pub fn export(rows: &[NumberedRow], path: &Path) -> Result<(), String> {
    let file = std::fs::File::create(path).map_err(|e| e.to_string())?;
    write_rows(rows, std::io::BufWriter::new(file))
}
