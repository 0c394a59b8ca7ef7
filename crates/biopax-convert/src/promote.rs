//! Diagram-only elements (labels, shapes) become `PhysicalEntity` when an
//! interaction or group points at them, and are dropped otherwise.

use biopax_model::vocab::is_presentation_type;
use biopax_model::{Element, PvjsonGraph};
use std::collections::HashSet;

/// Ids named by a control pair, an interaction participant or a group member.
///
/// `controller`/`controlled` only count when an element carries both.
pub fn referenced_ids(elements: &[Element]) -> HashSet<String> {
    let mut ids = HashSet::new();
    for element in elements {
        if let (Some(controller), Some(controlled)) = (&element.controller, &element.controlled) {
            if !controller.is_empty() && !controlled.is_empty() {
                ids.insert(controller.clone());
                ids.insert(controlled.clone());
            }
        }
        ids.extend(element.participant.iter().cloned());
        ids.extend(element.contains.iter().cloned());
    }
    ids
}

pub fn promote_ambiguous(mut graph: PvjsonGraph) -> PvjsonGraph {
    let referenced = referenced_ids(&graph.elements);
    let before = graph.elements.len();

    graph.elements = graph
        .elements
        .into_iter()
        .filter_map(|mut element| {
            if !element.element_type().is_some_and(is_presentation_type) {
                return Some(element);
            }
            if referenced.contains(&element.id) {
                tracing::debug!(element_id = %element.id, "promoted referenced presentation element");
                element.set_type("PhysicalEntity");
                Some(element)
            } else {
                None
            }
        })
        .collect();

    tracing::debug!(
        dropped = before - graph.elements.len(),
        "removed unreferenced presentation elements"
    );
    graph
}
