// Property-based tests for the assignment builder.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use std::collections::HashSet;

use proptest::prelude::*;

use entstruct_recon::bridge::BridgeRelation;
use entstruct_recon::model::{
    BusinessUnitRecord, IdentifierNameLink, LedgerIdentifierLink, ReconInput,
};
use entstruct_recon::ordering::compare_rows;
use entstruct_recon::run;

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Small name pools so that claims, links and identity sets collide often.
fn arb_ledger() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "L[0-4]",
        1 => Just(String::new()),
    ]
}

fn arb_le() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "E[0-4]",
        1 => Just(String::new()),
    ]
}

fn arb_ident() -> impl Strategy<Value = String> {
    "I[0-5]"
}

fn arb_bu() -> impl Strategy<Value = BusinessUnitRecord> {
    ("B[0-6]", arb_ledger(), arb_le()).prop_map(|(name, ledger, le)| BusinessUnitRecord {
        name,
        primary_ledger_name: ledger,
        legal_entity_name: le,
    })
}

fn arb_input() -> impl Strategy<Value = ReconInput> {
    (
        prop::collection::vec("L[0-5]", 0..5),
        prop::collection::vec("E[0-5]", 0..5),
        prop::collection::vec((arb_ledger(), arb_ident()), 0..8),
        prop::collection::vec((arb_ident(), arb_le()), 0..8),
        prop::collection::vec(arb_bu(), 0..6),
    )
        .prop_map(|(ledgers, les, links, names, bus)| ReconInput {
            ledgers,
            legal_entities: les,
            ledger_identifiers: links
                .into_iter()
                .map(|(ledger, identifier)| LedgerIdentifierLink { ledger, identifier })
                .collect(),
            identifier_names: names
                .into_iter()
                .map(|(identifier, legal_entity)| IdentifierNameLink { identifier, legal_entity })
                .collect(),
            business_units: bus,
            warnings: Vec::new(),
        })
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn idempotent(input in arb_input()) {
        let r1 = run(&input);
        let r2 = run(&input);
        prop_assert_eq!(r1.rows, r2.rows);
        prop_assert_eq!(r1.ambiguities, r2.ambiguities);
        prop_assert_eq!(r1.warnings, r2.warnings);
    }
}

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn no_duplicate_or_blank_rows(input in arb_input()) {
        let result = run(&input);
        let mut seen = HashSet::new();
        for n in &result.rows {
            prop_assert!(!n.row.is_blank(), "blank row {:?}", n);
            prop_assert!(seen.insert(n.row.clone()), "duplicate row {:?}", n);
        }
    }
}

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn every_authoritative_name_appears(input in arb_input()) {
        let result = run(&input);
        for ledger in &input.ledgers {
            prop_assert!(
                result.rows.iter().any(|n| &n.row.ledger == ledger),
                "ledger {} missing", ledger
            );
        }
        for le in &input.legal_entities {
            prop_assert!(
                result.rows.iter().any(|n| &n.row.legal_entity == le),
                "legal entity {} missing", le
            );
        }
    }
}

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn ordered_and_numbered(input in arb_input()) {
        let result = run(&input);
        for (i, n) in result.rows.iter().enumerate() {
            prop_assert_eq!(n.assignment, i + 1);
        }
        for pair in result.rows.windows(2) {
            prop_assert!(
                compare_rows(&pair[0].row, &pair[1].row) == std::cmp::Ordering::Less,
                "out of order: {:?} then {:?}", pair[0], pair[1]
            );
        }
    }
}

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn backfill_only_on_unique_candidate(input in arb_input()) {
        let (bridge, _) = BridgeRelation::build(&input.ledger_identifiers, &input.identifier_names);
        let result = run(&input);
        let is_ledger = |l: &str| !l.is_empty() && input.ledgers.iter().any(|x| x.trim() == l);
        let is_le = |e: &str| !e.is_empty() && input.legal_entities.iter().any(|x| x.trim() == e);
        let ledger_peers = |e: &str| bridge.ledgers_of(e).map(|s| s.len()).unwrap_or(0);
        let le_peers = |l: &str| bridge.legal_entities_of(l).map(|s| s.len()).unwrap_or(0);

        for n in &result.rows {
            let r = &n.row;
            if r.ledger.is_empty() || r.legal_entity.is_empty() {
                continue;
            }
            if r.business_unit.is_empty() {
                // Ledger + LE without a business unit comes from a bridge pair
                // or from an orphan legal entity with a single ledger.
                let paired = bridge
                    .legal_entities_of(&r.ledger)
                    .is_some_and(|les| les.contains(&r.legal_entity));
                prop_assert!(paired, "pair not in bridge: {:?}", r);
                continue;
            }

            let records: Vec<_> = input
                .business_units
                .iter()
                .filter(|b| b.name.trim() == r.business_unit)
                .collect();
            let explained = records.iter().any(|b| {
                let claimed_ledger = b.primary_ledger_name.trim();
                let claimed_le = b.legal_entity_name.trim();
                let ledger_ok = (is_ledger(claimed_ledger) && claimed_ledger == r.ledger)
                    || (!is_ledger(claimed_ledger) && is_le(claimed_le) && ledger_peers(&r.legal_entity) == 1);
                let le_ok = (is_le(claimed_le) && claimed_le == r.legal_entity)
                    || (!is_le(claimed_le) && le_peers(&r.ledger) == 1);
                ledger_ok && le_ok
            });
            prop_assert!(explained, "field back-filled without a unique candidate: {:?}", r);
        }

        for n in &result.rows {
            let r = &n.row;
            if r.business_unit.is_empty() && r.ledger.is_empty() && !r.legal_entity.is_empty() {
                prop_assert_ne!(ledger_peers(&r.legal_entity), 1, "unique ledger not back-filled: {:?}", r);
            }
        }
    }
}

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn merge_order_independent(a in arb_input(), b in arb_input()) {
        let mut ab = a.clone();
        ab.merge(b.clone());
        let mut ba = b;
        ba.merge(a);
        prop_assert_eq!(run(&ab).rows, run(&ba).rows);
    }
}
