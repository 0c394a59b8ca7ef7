//! Type normalization: collapse candidate and prefixed type tags to one
//! canonical type per element.

use biopax_model::vocab::{all_types, strip_prefix};
use biopax_model::{ConversionConfig, Element, PvjsonGraph, TypeTag};

/// Pick the canonical type for a set of candidates.
///
/// The first BioPAX type (in vocabulary order) present among the
/// prefix-stripped candidates wins. Without a match the first candidate is
/// kept, prefix-stripped. `None` for an empty candidate list.
pub fn canonical_type(tag: &TypeTag) -> Option<String> {
    let candidates: Vec<&str> = tag.candidates().into_iter().map(strip_prefix).collect();
    all_types()
        .find(|t| candidates.contains(t))
        .or_else(|| candidates.first().copied())
        .map(str::to_string)
}

/// Normalize every element's type. Untyped elements keep their relative
/// order and move behind the typed ones. Pathway elements lose their
/// `entityReference`.
pub fn normalize_types(mut graph: PvjsonGraph) -> PvjsonGraph {
    let (typed, untyped): (Vec<Element>, Vec<Element>) = graph
        .elements
        .into_iter()
        .partition(|e| e.type_tag.is_some());

    let mut elements: Vec<Element> = typed
        .into_iter()
        .map(|mut element| {
            element.type_tag = element
                .type_tag
                .as_ref()
                .and_then(canonical_type)
                .map(TypeTag::Single);
            if element.has_type("Pathway") && element.entity_reference.take().is_some() {
                tracing::debug!(element_id = %element.id, "dropped entityReference from Pathway element");
            }
            element
        })
        .collect();
    elements.extend(untyped);

    tracing::debug!(elements = elements.len(), "normalized element types");
    graph.elements = elements;
    graph
}

/// Rewrite vendor types (`GeneProduct`, `Metabolite`, `Group`, ...) to
/// their BioPAX counterparts.
///
/// Runs right after [`normalize_types`], so reference lookups and
/// containment see the BioPAX type.
pub fn apply_vendor_mappings(mut graph: PvjsonGraph, config: &ConversionConfig) -> PvjsonGraph {
    for element in &mut graph.elements {
        let Some(current) = element.element_type() else {
            continue;
        };
        let mapped = config.map_vendor_type(current);
        if mapped != current {
            tracing::debug!(element_id = %element.id, from = current, to = mapped, "mapped vendor type");
            let mapped = mapped.to_string();
            element.set_type(mapped);
        }
    }
    graph
}
