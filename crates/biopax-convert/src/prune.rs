//! Presentation-only attribute removal.

use biopax_model::PvjsonGraph;

/// Layout and styling attributes with no BioPAX meaning.
pub const PRESENTATION_ATTRIBUTES: &[&str] = &[
    "backgroundColor",
    "borderWidth",
    "color",
    "displayId",
    "fillOpacity",
    "fontSize",
    "fontWeight",
    "fontStyle",
    "gpml:element",
    "gpml:Type",
    "height",
    "width",
    "x",
    "y",
    "isPartOf",
    "padding",
    "rotation",
    "shape",
    "strokeDasharray",
    "textAlign",
    "verticalAlign",
    "zIndex",
    "points",
    "markerStart",
    "markerEnd",
    "relX",
    "relY",
];

pub fn prune_attributes(mut graph: PvjsonGraph) -> PvjsonGraph {
    let mut removed = 0usize;
    for element in graph.elements.iter_mut() {
        for key in PRESENTATION_ATTRIBUTES {
            if element.attributes.remove(*key).is_some() {
                removed += 1;
            }
        }
    }
    tracing::debug!(removed, "pruned presentation attributes");
    graph
}
