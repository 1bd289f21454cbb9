// Export package ingestion and assignment table export

pub mod archive;
pub mod csv;
pub mod drawio;
pub mod export;
pub mod json;
pub mod xlsx;

pub use archive::{load_inputs, Ingested};
pub use export::{export, ExportFormat};

/// Column headers shared by every tabular export.
pub const HEADERS: [&str; 4] = ["Assignment", "Ledger Name", "Legal Entity", "Business Unit"];
