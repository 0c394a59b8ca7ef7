//! GeneticInteraction repair.
//!
//! BioPAX only allows genes as participants of a genetic interaction, and
//! an interaction must not pair an element with itself.

use biopax_model::{Element, PvjsonGraph};
use uuid::Uuid;

pub const GENETIC_INTERACTION: &str = "GeneticInteraction";

pub fn repair_genetic_interactions(mut graph: PvjsonGraph) -> PvjsonGraph {
    let index = graph.index_by_id();
    let interactions: Vec<usize> = graph
        .elements
        .iter()
        .enumerate()
        .filter(|(_, e)| e.has_type(GENETIC_INTERACTION))
        .map(|(i, _)| i)
        .collect();

    let mut clones: Vec<Element> = Vec::new();
    for position in interactions {
        let participants = graph.elements[position].participant.clone();

        for participant_id in &participants {
            let Some(&target) = index.get(participant_id) else {
                tracing::warn!(
                    interaction_id = %graph.elements[position].id,
                    participant_id = %participant_id,
                    "skipping missing genetic interaction participant"
                );
                continue;
            };
            let participant = &mut graph.elements[target];
            if !participant.has_type("Gene") {
                tracing::debug!(
                    element_id = %participant.id,
                    from = participant.element_type().unwrap_or("<none>"),
                    "retyping genetic interaction participant to Gene"
                );
                participant.set_type("Gene");
                participant.entity_reference = None;
            }
        }

        if let [first, second] = participants.as_slice() {
            if first == second {
                if let Some(&source) = index.get(first) {
                    let clone_id = Uuid::new_v4().to_string();
                    clones.push(graph.elements[source].duplicate(clone_id.clone()));
                    graph.elements[position].participant[1] = clone_id;
                }
            }
        }
    }

    if !clones.is_empty() {
        tracing::debug!(clones = clones.len(), "split self-paired genetic interactions");
    }
    graph.elements.extend(clones);
    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_gene_participants_are_retyped_in_place() {
        let mut protein = Element::new("p1").with_type("Protein");
        protein.entity_reference = Some("ProteinReference_1".into());
        let graph = PvjsonGraph::new(vec![
            protein,
            Element::new("g1").with_type("Gene"),
            Element::new("gi")
                .with_type(GENETIC_INTERACTION)
                .with_participants(["p1", "g1", "ghost"]),
        ]);
        let graph = repair_genetic_interactions(graph);

        assert_eq!(graph.elements.len(), 3);
        assert_eq!(graph.elements[0].element_type(), Some("Gene"));
        assert!(graph.elements[0].entity_reference.is_none());
        assert_eq!(graph.elements[2].participant, vec!["p1", "g1", "ghost"]);
    }

    #[test]
    fn self_pair_gets_a_fresh_clone() {
        let graph = PvjsonGraph::new(vec![
            Element::new("a")
                .with_type("Gene")
                .with_attribute("displayName", "BRCA1"),
            Element::new("gi")
                .with_type(GENETIC_INTERACTION)
                .with_participants(["a", "a"]),
        ]);
        let graph = repair_genetic_interactions(graph);

        let participants = &graph.elements[1].participant;
        assert_eq!(participants[0], "a");
        assert_ne!(participants[1], "a");
        assert!(Uuid::parse_str(&participants[1]).is_ok());

        let original = graph.element("a").unwrap();
        let clone = graph.element(&participants[1]).unwrap();
        assert_eq!(clone, &original.duplicate(participants[1].clone()));
    }

    #[test]
    fn other_interactions_are_untouched() {
        let graph = PvjsonGraph::new(vec![
            Element::new("p1").with_type("Protein"),
            Element::new("mi")
                .with_type("MolecularInteraction")
                .with_participants(["p1", "p1"]),
        ]);
        let repaired = repair_genetic_interactions(graph.clone());
        assert_eq!(repaired, graph);
    }
}
