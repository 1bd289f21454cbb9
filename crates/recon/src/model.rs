use serde::{Deserialize, Serialize};

pub type LedgerName = String;
pub type LegalEntityName = String;
pub type LegalEntityIdentifier = String;

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// The five source tables an export package may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Ledgers,
    LegalEntities,
    LedgerIdentifiers,
    IdentifierNames,
    BusinessUnits,
}

impl SourceKind {
    pub const ALL: [SourceKind; 5] = [
        Self::Ledgers,
        Self::LegalEntities,
        Self::LedgerIdentifiers,
        Self::IdentifierNames,
        Self::BusinessUnits,
    ];
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ledgers => write!(f, "ledgers"),
            Self::LegalEntities => write!(f, "legal_entities"),
            Self::LedgerIdentifiers => write!(f, "ledger_identifiers"),
            Self::IdentifierNames => write!(f, "identifier_names"),
            Self::BusinessUnits => write!(f, "business_units"),
        }
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A business unit as declared by its source. Ledger and LE are claims only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessUnitRecord {
    pub name: String,
    pub primary_ledger_name: LedgerName,
    pub legal_entity_name: LegalEntityName,
}

/// Bridge source A: a ledger's balancing-segment assignment to an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerIdentifierLink {
    pub ledger: LedgerName,
    pub identifier: LegalEntityIdentifier,
}

/// Bridge source B: an identifier's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierNameLink {
    pub identifier: LegalEntityIdentifier,
    pub legal_entity: LegalEntityName,
}

/// Pre-loaded records from one or more export packages.
///
/// Merging is plain concatenation; every downstream structure is built by set
/// union, so the order in which packages are merged never changes the result.
#[derive(Debug, Clone, Default)]
pub struct ReconInput {
    pub ledgers: Vec<LedgerName>,
    pub legal_entities: Vec<LegalEntityName>,
    pub ledger_identifiers: Vec<LedgerIdentifierLink>,
    pub identifier_names: Vec<IdentifierNameLink>,
    pub business_units: Vec<BusinessUnitRecord>,
    pub warnings: Vec<SourceWarning>,
}

impl ReconInput {
    pub fn merge(&mut self, other: ReconInput) {
        self.ledgers.extend(other.ledgers);
        self.legal_entities.extend(other.legal_entities);
        self.ledger_identifiers.extend(other.ledger_identifiers);
        self.identifier_names.extend(other.identifier_names);
        self.business_units.extend(other.business_units);
        self.warnings.extend(other.warnings);
    }

    /// True when no source contributed a single record.
    pub fn is_empty(&self) -> bool {
        self.ledgers.is_empty()
            && self.legal_entities.is_empty()
            && self.ledger_identifiers.is_empty()
            && self.identifier_names.is_empty()
            && self.business_units.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

/// A recoverable problem with one source. Never aborts a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceWarning {
    /// Archive, directory, or file the problem was found in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceKind>,
    #[serde(flatten)]
    pub kind: WarningKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WarningKind {
    /// Archive or table could not be opened or parsed.
    Unreadable { detail: String },
    /// Table is present but lacks required columns.
    MissingColumns { missing: Vec<String>, found: Vec<String> },
    /// One identifier was asserted to several legal entity names.
    IdentifierConflict {
        identifier: LegalEntityIdentifier,
        names: Vec<LegalEntityName>,
    },
}

impl SourceWarning {
    pub fn unreadable(origin: impl Into<String>, source: Option<SourceKind>, detail: impl Into<String>) -> Self {
        Self {
            origin: Some(origin.into()),
            source,
            kind: WarningKind::Unreadable { detail: detail.into() },
        }
    }

    pub fn missing_columns(
        origin: Option<String>,
        source: SourceKind,
        missing: Vec<String>,
        found: Vec<String>,
    ) -> Self {
        Self {
            origin,
            source: Some(source),
            kind: WarningKind::MissingColumns { missing, found },
        }
    }
}

impl std::fmt::Display for SourceWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref origin) = self.origin {
            write!(f, "{origin}: ")?;
        }
        if let Some(source) = self.source {
            write!(f, "{source}: ")?;
        }
        match &self.kind {
            WarningKind::Unreadable { detail } => write!(f, "could not be read: {detail}"),
            WarningKind::MissingColumns { missing, found } => {
                write!(f, "missing {missing:?}. Found: {found:?}")
            }
            WarningKind::IdentifierConflict { identifier, names } => {
                write!(f, "identifier '{identifier}' names several legal entities {names:?}; left unresolved")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// One (Ledger, Legal Entity, Business Unit) assignment. Empty = unassigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AssignmentRow {
    pub ledger: LedgerName,
    pub legal_entity: LegalEntityName,
    pub business_unit: String,
}

impl AssignmentRow {
    pub fn new(
        ledger: impl Into<String>,
        legal_entity: impl Into<String>,
        business_unit: impl Into<String>,
    ) -> Self {
        Self {
            ledger: ledger.into(),
            legal_entity: legal_entity.into(),
            business_unit: business_unit.into(),
        }
    }

    pub fn ledger_only(ledger: impl Into<String>) -> Self {
        Self::new(ledger, "", "")
    }

    pub fn is_blank(&self) -> bool {
        self.ledger.is_empty() && self.legal_entity.is_empty() && self.business_unit.is_empty()
    }
}

/// An assignment row with its 1-based presentation position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberedRow {
    pub assignment: usize,
    #[serde(flatten)]
    pub row: AssignmentRow,
}

/// Which field a back-fill tried to infer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackfillField {
    Ledger,
    LegalEntity,
}

/// A back-fill skipped because several candidates qualified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ambiguity {
    /// Empty for orphan legal entities.
    pub business_unit: String,
    pub field: BackfillField,
    /// The known peer the inference started from.
    pub from: String,
    pub candidates: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconSummary {
    pub total_rows: usize,
    pub fully_assigned: usize,
    pub ledger_only: usize,
    pub legal_entity_only: usize,
    pub without_business_unit: usize,
    pub backfilled: usize,
    pub ambiguous: usize,
    pub warnings: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub rows: Vec<NumberedRow>,
    pub warnings: Vec<SourceWarning>,
    pub ambiguities: Vec<Ambiguity>,
}
