//! Pathway identity: graph id, version and context base IRI.

use biopax_model::{ConversionConfig, PathwayMetadata, PvjsonGraph};
use serde_json::{json, Value};

pub const DEFAULT_VERSION: &str = "0";

/// Stamp the pathway IRI and version onto the graph and point every
/// `@base` declaration at `<pathway IRI>/`.
pub fn apply_metadata(
    mut graph: PvjsonGraph,
    metadata: &PathwayMetadata,
    config: &ConversionConfig,
) -> PvjsonGraph {
    let pathway_iri = config.pathway_iri(&metadata.identifier);
    let base = format!("{pathway_iri}/");

    let mut rebased = 0usize;
    for entry in graph.context.iter_mut() {
        if let Value::Object(obj) = entry {
            if obj.contains_key("@base") {
                obj.insert("@base".to_string(), Value::String(base.clone()));
                rebased += 1;
            }
        }
    }
    if rebased == 0 {
        graph.context.push(json!({ "@base": base }));
    }

    graph.id = Some(pathway_iri);
    graph.version = Some(
        metadata
            .version
            .clone()
            .unwrap_or_else(|| DEFAULT_VERSION.to_string()),
    );
    graph
}
