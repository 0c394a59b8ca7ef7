//! Property tests for the element model and vocabulary helpers.

use biopax_model::digest::unification_xref_id;
use biopax_model::vocab::strip_prefix;
use biopax_model::{Element, PvjsonGraph};
use proptest::prelude::*;

fn local_name_strategy() -> impl Strategy<Value = String> {
    "[A-Z][a-zA-Z]{1,12}".prop_map(|s| s)
}

fn prefix_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("gpml:".to_string()),
        Just("biopax:".to_string()),
        Just("http://www.biopax.org/release/biopax-level3.owl#".to_string()),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn strip_prefix_recovers_local_name(prefix in prefix_strategy(), local in local_name_strategy()) {
        let tagged = format!("{prefix}{local}");
        prop_assert_eq!(strip_prefix(&tagged), local.as_str());
    }

    #[test]
    fn xref_ids_agree_exactly_when_records_agree(
        db1 in "[A-Za-z ]{1,8}", id1 in "[A-Z0-9]{1,8}",
        db2 in "[A-Za-z ]{1,8}", id2 in "[A-Z0-9]{1,8}",
    ) {
        let same_record = db1 == db2 && id1 == id2;
        prop_assert_eq!(unification_xref_id(&db1, &id1) == unification_xref_id(&db2, &id2), same_record);
    }

    #[test]
    fn graph_json_round_trips(ids in proptest::collection::vec("[a-z0-9]{1,6}", 0..8)) {
        let elements: Vec<Element> = ids.iter().map(|id| Element::new(id.clone()).with_type("Protein")).collect();
        let graph = PvjsonGraph::new(elements).with_organism("Homo sapiens");
        let text = serde_json::to_string(&graph).unwrap();
        let back = PvjsonGraph::from_json_str(&text).unwrap();
        prop_assert_eq!(back, graph);
    }
}

