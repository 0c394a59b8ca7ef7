//! Property tests for the graph stages.

use biopax_convert::genetic::{repair_genetic_interactions, GENETIC_INTERACTION};
use biopax_convert::normalize::normalize_types;
use biopax_convert::prune::{prune_attributes, PRESENTATION_ATTRIBUTES};
use biopax_model::vocab::{all_types, strip_prefix};
use biopax_model::{Element, PvjsonGraph, TypeTag};
use proptest::prelude::*;
use serde_json::Value;

fn candidate_strategy() -> impl Strategy<Value = String> {
    let known: Vec<String> = all_types().map(str::to_string).collect();
    let typed = (
        prop_oneof![Just(""), Just("gpml:"), Just("biopax:")],
        prop_oneof![
            proptest::sample::select(known),
            Just("GeneProduct".to_string()),
            Just("Metabolite".to_string()),
            Just("Label".to_string()),
            "[A-Z][a-z]{2,8}",
        ],
    );
    typed.prop_map(|(prefix, local)| format!("{prefix}{local}"))
}

fn attribute_strategy() -> impl Strategy<Value = (String, Value)> {
    let keys: Vec<String> = PRESENTATION_ATTRIBUTES
        .iter()
        .map(|k| k.to_string())
        .chain(["displayName", "comment", "conversionDirection"].map(String::from))
        .collect();
    (proptest::sample::select(keys), "[a-z0-9]{0,6}").prop_map(|(k, v)| (k, Value::String(v)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn normalized_type_is_first_vocabulary_match(candidates in proptest::collection::vec(candidate_strategy(), 1..5)) {
        let graph = PvjsonGraph::new(vec![Element::new("e").with_candidates(candidates.clone())]);
        let graph = normalize_types(graph);

        let chosen = match &graph.elements[0].type_tag {
            Some(TypeTag::Single(t)) => t.clone(),
            other => return Err(TestCaseError::fail(format!("not single: {other:?}"))),
        };
        let stripped: Vec<&str> = candidates.iter().map(|c| strip_prefix(c)).collect();
        match all_types().find(|t| stripped.contains(t)) {
            Some(expected) => prop_assert_eq!(chosen.as_str(), expected),
            None => prop_assert_eq!(chosen.as_str(), stripped[0]),
        }
    }

    #[test]
    fn pruning_is_idempotent(attributes in proptest::collection::vec(attribute_strategy(), 0..12)) {
        let mut element = Element::new("e").with_type("Protein");
        for (key, value) in attributes {
            element = element.with_attribute(key, value);
        }
        let once = prune_attributes(PvjsonGraph::new(vec![element]));
        let twice = prune_attributes(once.clone());
        prop_assert_eq!(&once, &twice);
        for key in PRESENTATION_ATTRIBUTES {
            prop_assert!(!once.elements[0].attributes.contains_key(*key));
        }
    }

    #[test]
    fn self_paired_interactions_split(name in "[A-Z0-9]{1,8}", start_as_gene in any::<bool>()) {
        let participant_type = if start_as_gene { "Gene" } else { "Protein" };
        let graph = PvjsonGraph::new(vec![
            Element::new("a").with_type(participant_type).with_attribute("displayName", name),
            Element::new("gi").with_type(GENETIC_INTERACTION).with_participants(["a", "a"]),
        ]);
        let graph = repair_genetic_interactions(graph);

        let participants = graph.element("gi").unwrap().participant.clone();
        prop_assert_eq!(participants.len(), 2);
        prop_assert_ne!(&participants[0], &participants[1]);

        let original = graph.element(&participants[0]).unwrap();
        let clone = graph.element(&participants[1]).unwrap();
        prop_assert_eq!(original.element_type(), Some("Gene"));
        prop_assert_eq!(clone, &original.duplicate(participants[1].clone()));
    }
}
