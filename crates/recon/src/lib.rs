//! `entstruct-recon`: Ledger → Legal Entity → Business Unit reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded source records, returns the ordered
//! assignment table. Archive handling and exports live in `entstruct-io`.

pub mod assign;
pub mod bridge;
pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod identity;
pub mod model;
pub mod ordering;
pub mod summary;

pub use bridge::{BridgeRelation, Candidate};
pub use config::SourceConfig;
pub use engine::run;
pub use error::ReconError;
pub use model::{
    AssignmentRow, BusinessUnitRecord, NumberedRow, ReconInput, ReconResult, SourceKind,
    SourceWarning,
};
