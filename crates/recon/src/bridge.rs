use std::collections::{BTreeMap, BTreeSet};

use crate::model::{
    IdentifierNameLink, LedgerIdentifierLink, LedgerName, LegalEntityIdentifier, LegalEntityName,
    SourceKind, SourceWarning, WarningKind,
};

// ---------------------------------------------------------------------------
// Candidate decision
// ---------------------------------------------------------------------------

/// Outcome of looking up the peers of a known entity for back-fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate<'a> {
    /// No peer is known.
    Unresolved,
    /// Exactly one peer; safe to back-fill.
    Unique(&'a str),
    /// Several peers; never guessed.
    Ambiguous(Vec<&'a str>),
}

impl<'a> Candidate<'a> {
    fn from_peers(peers: Option<&'a BTreeSet<String>>) -> Self {
        let Some(peers) = peers else {
            return Self::Unresolved;
        };
        let mut iter = peers.iter();
        match (iter.next(), iter.next()) {
            (None, _) => Self::Unresolved,
            (Some(only), None) => Self::Unique(only.as_str()),
            _ => Self::Ambiguous(peers.iter().map(String::as_str).collect()),
        }
    }

    pub fn unique(&self) -> Option<&'a str> {
        match self {
            Self::Unique(v) => Some(*v),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Relation
// ---------------------------------------------------------------------------

/// Direct Ledger ↔ Legal Entity relation composed through identifiers.
///
/// A ledger that carries identifiers, none of which resolve to a name, is
/// present with an empty set. That is different from a ledger that carries no
/// identifiers at all, which is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BridgeRelation {
    ledger_to_les: BTreeMap<LedgerName, BTreeSet<LegalEntityName>>,
    le_to_ledgers: BTreeMap<LegalEntityName, BTreeSet<LedgerName>>,
}

impl BridgeRelation {
    /// Compose ledger→identifier and identifier→name links.
    ///
    /// An identifier asserted to more than one name is reported and treated as
    /// unresolved, so the outcome does not depend on input order.
    pub fn build(
        ledger_identifiers: &[LedgerIdentifierLink],
        identifier_names: &[IdentifierNameLink],
    ) -> (Self, Vec<SourceWarning>) {
        let mut asserted: BTreeMap<LegalEntityIdentifier, BTreeSet<LegalEntityName>> = BTreeMap::new();
        for link in identifier_names {
            let identifier = link.identifier.trim();
            let name = link.legal_entity.trim();
            if identifier.is_empty() || name.is_empty() {
                continue;
            }
            asserted
                .entry(identifier.to_string())
                .or_default()
                .insert(name.to_string());
        }

        let mut warnings = Vec::new();
        let mut resolved: BTreeMap<&str, &str> = BTreeMap::new();
        for (identifier, names) in &asserted {
            match Candidate::from_peers(Some(names)) {
                Candidate::Unique(name) => {
                    resolved.insert(identifier.as_str(), name);
                }
                Candidate::Ambiguous(names) => {
                    log::warn!("identifier '{identifier}' resolves to {} names", names.len());
                    warnings.push(SourceWarning {
                        origin: None,
                        source: Some(SourceKind::IdentifierNames),
                        kind: WarningKind::IdentifierConflict {
                            identifier: identifier.clone(),
                            names: names.into_iter().map(str::to_string).collect(),
                        },
                    });
                }
                Candidate::Unresolved => {}
            }
        }

        let mut ledger_to_idents: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for link in ledger_identifiers {
            let ledger = link.ledger.trim();
            let identifier = link.identifier.trim();
            if ledger.is_empty() || identifier.is_empty() {
                continue;
            }
            ledger_to_idents.entry(ledger).or_default().insert(identifier);
        }

        let mut relation = Self::default();
        for (ledger, idents) in ledger_to_idents {
            let les = relation.ledger_to_les.entry(ledger.to_string()).or_default();
            for ident in idents {
                if let Some(name) = resolved.get(ident) {
                    les.insert((*name).to_string());
                }
            }
        }

        for (ledger, les) in &relation.ledger_to_les {
            for le in les {
                relation
                    .le_to_ledgers
                    .entry(le.clone())
                    .or_default()
                    .insert(ledger.clone());
            }
        }

        log::debug!(
            "bridge: {} ledgers, {} legal entities, {} conflicting identifiers",
            relation.ledger_to_les.len(),
            relation.le_to_ledgers.len(),
            warnings.len()
        );

        (relation, warnings)
    }

    /// Ledgers present in the relation with their LE sets (possibly empty).
    pub fn ledgers(&self) -> impl Iterator<Item = (&LedgerName, &BTreeSet<LegalEntityName>)> {
        self.ledger_to_les.iter()
    }

    pub fn contains_ledger(&self, ledger: &str) -> bool {
        self.ledger_to_les.contains_key(ledger)
    }

    pub fn legal_entities_of(&self, ledger: &str) -> Option<&BTreeSet<LegalEntityName>> {
        self.ledger_to_les.get(ledger)
    }

    pub fn ledgers_of(&self, legal_entity: &str) -> Option<&BTreeSet<LedgerName>> {
        self.le_to_ledgers.get(legal_entity)
    }

    /// Back-fill candidate for a ledger's legal entity.
    pub fn legal_entity_for(&self, ledger: &str) -> Candidate<'_> {
        Candidate::from_peers(self.ledger_to_les.get(ledger))
    }

    /// Back-fill candidate for a legal entity's ledger.
    pub fn ledger_for(&self, legal_entity: &str) -> Candidate<'_> {
        Candidate::from_peers(self.le_to_ledgers.get(legal_entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a(ledger: &str, identifier: &str) -> LedgerIdentifierLink {
        LedgerIdentifierLink { ledger: ledger.into(), identifier: identifier.into() }
    }

    fn b(identifier: &str, legal_entity: &str) -> IdentifierNameLink {
        IdentifierNameLink { identifier: identifier.into(), legal_entity: legal_entity.into() }
    }

    #[test]
    fn composes_two_hops() {
        let (rel, warnings) = BridgeRelation::build(
            &[a("L1", "100"), a("L1", "200"), a("L2", "200")],
            &[b("100", "E1"), b("200", "E2")],
        );
        assert!(warnings.is_empty());
        let l1: Vec<_> = rel.legal_entities_of("L1").unwrap().iter().collect();
        assert_eq!(l1, ["E1", "E2"]);
        let e2: Vec<_> = rel.ledgers_of("E2").unwrap().iter().collect();
        assert_eq!(e2, ["L1", "L2"]);
    }

    #[test]
    fn many_identifiers_same_name_collapse() {
        let (rel, _) = BridgeRelation::build(
            &[a("L1", "100"), a("L1", "101")],
            &[b("100", "E1"), b("101", "E1")],
        );
        assert_eq!(rel.legal_entity_for("L1"), Candidate::Unique("E1"));
    }

    #[test]
    fn unresolved_identifiers_leave_empty_entry() {
        let (rel, _) = BridgeRelation::build(&[a("L1", "999")], &[b("100", "E1")]);
        assert!(rel.contains_ledger("L1"));
        assert!(rel.legal_entities_of("L1").unwrap().is_empty());
        assert_eq!(rel.legal_entity_for("L1"), Candidate::Unresolved);
        assert!(!rel.contains_ledger("L9"));
        assert_eq!(rel.legal_entity_for("L9"), Candidate::Unresolved);
    }

    #[test]
    fn blank_links_are_skipped() {
        let (rel, _) = BridgeRelation::build(
            &[a("", "100"), a("L1", " "), a(" L2 ", " 100 ")],
            &[b("100", ""), b("100", " E1 ")],
        );
        assert!(!rel.contains_ledger(""));
        assert!(!rel.contains_ledger("L1"));
        assert_eq!(rel.legal_entity_for("L2"), Candidate::Unique("E1"));
    }

    #[test]
    fn ambiguous_inverse() {
        let (rel, _) = BridgeRelation::build(
            &[a("L1", "100"), a("L2", "100")],
            &[b("100", "E1")],
        );
        assert_eq!(rel.ledger_for("E1"), Candidate::Ambiguous(vec!["L1", "L2"]));
        assert_eq!(rel.ledger_for("E1").unique(), None);
    }

    #[test]
    fn conflicting_identifier_is_reported_and_unresolved() {
        let links = [a("L1", "100")];
        let forward = [b("100", "E1"), b("100", "E2")];
        let reverse = [b("100", "E2"), b("100", "E1")];

        let (rel_fwd, warn_fwd) = BridgeRelation::build(&links, &forward);
        let (rel_rev, warn_rev) = BridgeRelation::build(&links, &reverse);

        assert_eq!(rel_fwd, rel_rev);
        assert_eq!(warn_fwd, warn_rev);
        assert_eq!(warn_fwd.len(), 1);
        match &warn_fwd[0].kind {
            WarningKind::IdentifierConflict { identifier, names } => {
                assert_eq!(identifier, "100");
                assert_eq!(names, &vec!["E1".to_string(), "E2".to_string()]);
            }
            other => panic!("unexpected warning {other:?}"),
        }
        assert!(rel_fwd.legal_entities_of("L1").unwrap().is_empty());
    }

    #[test]
    fn repeated_identical_assertion_is_not_a_conflict() {
        let (_, warnings) = BridgeRelation::build(&[a("L1", "100")], &[b("100", "E1"), b("100", "E1")]);
        assert!(warnings.is_empty());
    }
}
