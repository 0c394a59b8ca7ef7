//! Containment flattening: `contains` keeps only ids of BioPAX-typed members.

use biopax_model::vocab::is_biopax_type;
use biopax_model::PvjsonGraph;

pub fn flatten_containment(mut graph: PvjsonGraph) -> PvjsonGraph {
    let index = graph.index_by_id();
    let types: Vec<Option<String>> = graph
        .elements
        .iter()
        .map(|e| e.element_type().map(str::to_string))
        .collect();

    for element in graph.elements.iter_mut() {
        if element.contains.is_empty() {
            continue;
        }
        let members = std::mem::take(&mut element.contains);
        element.contains = members
            .into_iter()
            .filter(|member| match index.get(member) {
                Some(&i) => types[i].as_deref().is_some_and(is_biopax_type),
                None => {
                    tracing::warn!(
                        container_id = %element.id,
                        missing_id = %member,
                        "dropping dangling containment reference"
                    );
                    false
                }
            })
            .collect();
    }
    graph
}
