use std::fmt;

use crate::model::SourceKind;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty file name, duplicate table, etc.).
    ConfigValidation(String),
    /// Source table lacks one or more required columns.
    MissingColumns {
        source: SourceKind,
        missing: Vec<String>,
        found: Vec<String>,
    },
    /// Malformed CSV content.
    Csv { source: SourceKind, message: String },
    /// IO error (file read, etc.).
    Io(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumns { source, missing, found } => {
                write!(f, "{source}: missing {missing:?}. Found: {found:?}")
            }
            Self::Csv { source, message } => write!(f, "{source}: malformed CSV: {message}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
