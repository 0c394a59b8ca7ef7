//! Xref cleanup ahead of reference resolution.
//!
//! Only dereferenceable (`http…`) xrefs survive, and only on reference and
//! xref nodes. Interactions also lose their GPML `interactionType`.

use biopax_model::vocab::is_edge_type;
use biopax_model::PvjsonGraph;

fn carries_xrefs(t: Option<&str>) -> bool {
    t.is_some_and(|t| t.ends_with("Reference") || t.ends_with("Xref"))
}

pub fn clean_xrefs(mut graph: PvjsonGraph) -> PvjsonGraph {
    for element in graph.elements.iter_mut() {
        element.xref.retain(|xref| xref.starts_with("http"));
        if !carries_xrefs(element.element_type()) {
            element.xref.clear();
        }
        if element.element_type().is_some_and(is_edge_type) {
            element.attributes.remove("interactionType");
        }
    }
    graph
}
