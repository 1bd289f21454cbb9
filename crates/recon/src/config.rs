use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ReconError;
use crate::model::SourceKind;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Where each source table lives inside an export package and which columns
/// carry the fields the engine reads. Every section defaults to the Oracle
/// Fusion export layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    pub ledgers: LedgerTable,
    pub legal_entities: LegalEntityTable,
    pub ledger_identifiers: LedgerIdentifierTable,
    pub identifier_names: IdentifierNameTable,
    pub business_units: BusinessUnitTable,
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LedgerTable {
    pub file: String,
    pub name: String,
}

impl Default for LedgerTable {
    fn default() -> Self {
        Self {
            file: "GL_PRIMARY_LEDGER.csv".into(),
            name: "ORA_GL_PRIMARY_LEDGER_CONFIG.Name".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LegalEntityTable {
    pub file: String,
    pub name: String,
}

impl Default for LegalEntityTable {
    fn default() -> Self {
        Self {
            file: "XLE_ENTITY_PROFILE.csv".into(),
            name: "Name".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LedgerIdentifierTable {
    pub file: String,
    pub ledger: String,
    pub identifier: String,
}

impl Default for LedgerIdentifierTable {
    fn default() -> Self {
        Self {
            file: "ORA_LEGAL_ENTITY_BAL_SEG_VAL_DEF.csv".into(),
            ledger: "GL_LEDGER.Name".into(),
            identifier: "LegalEntityIdentifier".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdentifierNameTable {
    pub file: String,
    pub identifier: String,
    pub legal_entity: String,
}

impl Default for IdentifierNameTable {
    fn default() -> Self {
        Self {
            file: "ORA_GL_JOURNAL_CONFIG_DETAIL.csv".into(),
            identifier: "LegalEntityIdentifier".into(),
            legal_entity: "ObjectName".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct BusinessUnitTable {
    pub file: String,
    pub name: String,
    pub primary_ledger: String,
    pub legal_entity: String,
}

impl Default for BusinessUnitTable {
    fn default() -> Self {
        Self {
            file: "FUN_BUSINESS_UNIT.csv".into(),
            name: "Name".into(),
            primary_ledger: "PrimaryLedgerName".into(),
            legal_entity: "LegalEntityName".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl SourceConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: SourceConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ReconError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ReconError::Io(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml(&text)
    }

    pub fn to_toml(&self) -> Result<String, ReconError> {
        toml::to_string_pretty(self).map_err(|e| ReconError::ConfigParse(e.to_string()))
    }

    /// File name of a source table inside an export package.
    pub fn file(&self, source: SourceKind) -> &str {
        match source {
            SourceKind::Ledgers => &self.ledgers.file,
            SourceKind::LegalEntities => &self.legal_entities.file,
            SourceKind::LedgerIdentifiers => &self.ledger_identifiers.file,
            SourceKind::IdentifierNames => &self.identifier_names.file,
            SourceKind::BusinessUnits => &self.business_units.file,
        }
    }

    /// Required columns of a source table, in extraction order.
    pub fn columns(&self, source: SourceKind) -> Vec<&str> {
        match source {
            SourceKind::Ledgers => vec![self.ledgers.name.as_str()],
            SourceKind::LegalEntities => vec![self.legal_entities.name.as_str()],
            SourceKind::LedgerIdentifiers => {
                vec![self.ledger_identifiers.ledger.as_str(), self.ledger_identifiers.identifier.as_str()]
            }
            SourceKind::IdentifierNames => {
                vec![self.identifier_names.identifier.as_str(), self.identifier_names.legal_entity.as_str()]
            }
            SourceKind::BusinessUnits => vec![
                self.business_units.name.as_str(),
                self.business_units.primary_ledger.as_str(),
                self.business_units.legal_entity.as_str(),
            ],
        }
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        let mut files = HashSet::new();
        for source in SourceKind::ALL {
            let file = self.file(source);
            if file.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "{source}: file must not be empty"
                )));
            }
            if !files.insert(file) {
                return Err(ReconError::ConfigValidation(format!(
                    "{source}: file '{file}' is already used by another source"
                )));
            }

            let columns = self.columns(source);
            if columns.iter().any(|c| c.trim().is_empty()) {
                return Err(ReconError::ConfigValidation(format!(
                    "{source}: column names must not be empty"
                )));
            }
            let distinct: HashSet<&str> = columns.iter().copied().collect();
            if distinct.len() != columns.len() {
                return Err(ReconError::ConfigValidation(format!(
                    "{source}: each field must map to a distinct column, got {columns:?}"
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
