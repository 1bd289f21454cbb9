use std::collections::{BTreeSet, HashSet};

use crate::bridge::{BridgeRelation, Candidate};
use crate::identity::IdentitySets;
use crate::model::{Ambiguity, AssignmentRow, BackfillField, BusinessUnitRecord};

/// Deduplicated assignment rows, in emission order, plus back-fill evidence.
#[derive(Debug, Default)]
pub struct Assignments {
    pub rows: Vec<AssignmentRow>,
    pub ambiguities: Vec<Ambiguity>,
    /// Rows with at least one field inferred from the bridge relation.
    pub backfilled: usize,
}

/// Build the assignment table in four cumulative phases.
///
/// 1. One row per business unit, claims validated against the identity sets
///    and missing peers back-filled on a unique match.
/// 2. Bridge pairs not already covered by a business unit row.
/// 3. Authoritative ledgers with no bridge entry and no business unit.
/// 4. Authoritative legal entities with no business unit.
pub fn build_assignments(
    business_units: &[BusinessUnitRecord],
    identities: &IdentitySets,
    bridge: &BridgeRelation,
) -> Assignments {
    let mut builder = Builder::default();

    builder.business_unit_rows(business_units, identities, bridge);
    let after_bu = builder.rows.len();

    builder.bridge_pair_rows(bridge);
    let after_pairs = builder.rows.len();

    builder.orphan_ledger_rows(identities, bridge);
    let after_ledgers = builder.rows.len();

    builder.orphan_legal_entity_rows(identities, bridge);

    log::debug!(
        "assignments: {} business unit, {} bridge pair, {} orphan ledger, {} orphan legal entity rows",
        after_bu,
        after_pairs - after_bu,
        after_ledgers - after_pairs,
        builder.rows.len() - after_ledgers,
    );

    builder.finish()
}

#[derive(Default)]
struct Builder {
    rows: Vec<AssignmentRow>,
    seen: HashSet<AssignmentRow>,
    backfilled: HashSet<AssignmentRow>,
    ambiguities: Vec<Ambiguity>,
    ledgers_with_bu: BTreeSet<String>,
    les_with_bu: BTreeSet<String>,
}

impl Builder {
    /// Record a row unless it is blank or already emitted.
    fn emit(&mut self, row: AssignmentRow) -> bool {
        if row.is_blank() || self.seen.contains(&row) {
            return false;
        }
        self.seen.insert(row.clone());
        self.rows.push(row);
        true
    }

    fn business_unit_rows(
        &mut self,
        business_units: &[BusinessUnitRecord],
        identities: &IdentitySets,
        bridge: &BridgeRelation,
    ) {
        for bu in business_units {
            let name = bu.name.trim();
            let claimed_ledger = bu.primary_ledger_name.trim();
            let claimed_le = bu.legal_entity_name.trim();

            let mut ledger = if identities.has_ledger(claimed_ledger) { claimed_ledger } else { "" };
            let mut legal_entity = if identities.has_legal_entity(claimed_le) { claimed_le } else { "" };
            let mut inferred = false;

            if ledger.is_empty() && !legal_entity.is_empty() {
                match bridge.ledger_for(legal_entity) {
                    Candidate::Unique(found) => {
                        ledger = found;
                        inferred = true;
                    }
                    Candidate::Ambiguous(candidates) => {
                        self.ambiguity(name, BackfillField::Ledger, legal_entity, candidates)
                    }
                    Candidate::Unresolved => {}
                }
            }

            if legal_entity.is_empty() && !ledger.is_empty() {
                match bridge.legal_entity_for(ledger) {
                    Candidate::Unique(found) => {
                        legal_entity = found;
                        inferred = true;
                    }
                    Candidate::Ambiguous(candidates) => {
                        self.ambiguity(name, BackfillField::LegalEntity, ledger, candidates)
                    }
                    Candidate::Unresolved => {}
                }
            }

            let row = AssignmentRow::new(ledger, legal_entity, name);
            if inferred {
                self.backfilled.insert(row.clone());
            }
            if !ledger.is_empty() {
                self.ledgers_with_bu.insert(ledger.to_string());
            }
            if !legal_entity.is_empty() {
                self.les_with_bu.insert(legal_entity.to_string());
            }
            self.emit(row);
        }
    }

    fn bridge_pair_rows(&mut self, bridge: &BridgeRelation) {
        let covered: HashSet<(String, String)> = self
            .rows
            .iter()
            .map(|r| (r.ledger.clone(), r.legal_entity.clone()))
            .collect();

        for (ledger, les) in bridge.ledgers() {
            if les.is_empty() {
                if !self.ledgers_with_bu.contains(ledger) {
                    self.emit(AssignmentRow::ledger_only(ledger.as_str()));
                }
                continue;
            }
            for le in les {
                if !covered.contains(&(ledger.clone(), le.clone())) {
                    self.emit(AssignmentRow::new(ledger.as_str(), le.as_str(), ""));
                }
            }
        }
    }

    fn orphan_ledger_rows(&mut self, identities: &IdentitySets, bridge: &BridgeRelation) {
        let orphans: Vec<&String> = identities
            .ledgers
            .iter()
            .filter(|l| !bridge.contains_ledger(l) && !self.ledgers_with_bu.contains(*l))
            .collect();
        for ledger in orphans {
            self.emit(AssignmentRow::ledger_only(ledger.as_str()));
        }
    }

    fn orphan_legal_entity_rows(&mut self, identities: &IdentitySets, bridge: &BridgeRelation) {
        let orphans: Vec<&String> = identities
            .legal_entities
            .iter()
            .filter(|le| !self.les_with_bu.contains(*le))
            .collect();
        for le in orphans {
            let ledger = match bridge.ledger_for(le) {
                Candidate::Unique(found) => found,
                Candidate::Ambiguous(candidates) => {
                    self.ambiguity("", BackfillField::Ledger, le, candidates);
                    ""
                }
                Candidate::Unresolved => "",
            };
            let inferred = !ledger.is_empty();
            let row = AssignmentRow::new(ledger, le.as_str(), "");
            if self.emit(row.clone()) && inferred {
                self.backfilled.insert(row);
            }
        }
    }

    fn ambiguity(&mut self, business_unit: &str, field: BackfillField, from: &str, candidates: Vec<&str>) {
        self.ambiguities.push(Ambiguity {
            business_unit: business_unit.to_string(),
            field,
            from: from.to_string(),
            candidates: candidates.into_iter().map(str::to_string).collect(),
        });
    }

    fn finish(self) -> Assignments {
        let mut ambiguities = self.ambiguities;
        ambiguities.sort_by(|a, b| {
            (&a.business_unit, &a.from, a.field as u8).cmp(&(&b.business_unit, &b.from, b.field as u8))
        });
        ambiguities.dedup();

        let backfilled = self.rows.iter().filter(|r| self.backfilled.contains(*r)).count();

        Assignments {
            rows: self.rows,
            ambiguities,
            backfilled,
        }
    }
}
