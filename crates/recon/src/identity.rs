use std::collections::BTreeSet;

use crate::model::{LedgerName, LegalEntityName, ReconInput};

/// The authoritative universe of ledger and legal entity names.
///
/// Only the ledger and legal entity tables grant membership; a name claimed by
/// a business unit or a bridge link is not authoritative on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentitySets {
    pub ledgers: BTreeSet<LedgerName>,
    pub legal_entities: BTreeSet<LegalEntityName>,
}

impl IdentitySets {
    pub fn build(input: &ReconInput) -> Self {
        Self {
            ledgers: collect_names(&input.ledgers),
            legal_entities: collect_names(&input.legal_entities),
        }
    }

    pub fn has_ledger(&self, name: &str) -> bool {
        self.ledgers.contains(name)
    }

    pub fn has_legal_entity(&self, name: &str) -> bool {
        self.legal_entities.contains(name)
    }
}

fn collect_names(names: &[String]) -> BTreeSet<String> {
    names
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect()
}
