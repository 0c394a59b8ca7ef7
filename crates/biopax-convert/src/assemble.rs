//! BioPAX JSON-LD document assembly.
//!
//! Layout of `@graph`:
//! 1. the `owl:Ontology` node importing BioPAX, keyed by the base IRI;
//! 2. every BioPAX-typed element in graph order;
//! 3. the Pathway node for the diagram itself;
//! 4. the synthesized organism and xref nodes.
//!
//! Element properties are projected onto the BioPAX terms of the bundled
//! context. Anything else the diagram carried is left behind.

use crate::organism::SynthesizedNodes;
use biopax_model::vocab::{is_biopax_type, is_edge_type, BIOPAX_NS, OWL_NS};
use biopax_model::{ConversionConfig, Element, PvjsonGraph};
use biopax_rdf::BIOPAX_CONTEXT_URL;
use serde_json::{json, Map, Value};
use std::collections::HashMap;

/// Element attributes emitted into the document.
pub const BIOPAX_PROPERTIES: &[&str] = &[
    "left",
    "right",
    "organism",
    "cellularLocation",
    "conversionDirection",
    "controlType",
    "db",
    "identifier",
    "displayName",
    "standardName",
    "name",
    "comment",
    "title",
    "year",
    "author",
    "source",
];

fn is_emitted_attribute(key: &str) -> bool {
    BIOPAX_PROPERTIES.contains(&key) || key.starts_with("http://") || key.starts_with("https://")
}

fn id_list(ids: impl IntoIterator<Item = String>) -> Value {
    Value::Array(ids.into_iter().map(Value::String).collect())
}

/// Prerequisites first, then the BioPAX terms unless the diagram already
/// names them, then the diagram's own context. The last object entry gains
/// the `biopax` prefix.
pub fn build_context(graph_context: Vec<Value>, config: &ConversionConfig) -> Vec<Value> {
    let mut context = vec![Value::String(config.prerequisites_context.clone())];
    if !graph_context.iter().any(|c| c.as_str() == Some(BIOPAX_CONTEXT_URL)) {
        context.push(Value::String(BIOPAX_CONTEXT_URL.to_string()));
    }
    context.extend(graph_context);

    let binding = Value::String(BIOPAX_NS.to_string());
    match context.iter_mut().rev().find_map(Value::as_object_mut) {
        Some(last) => {
            last.insert("biopax".to_string(), binding);
        }
        None => context.push(json!({ "biopax": binding })),
    }
    context
}

fn element_node(element: Element, node_type: &str) -> Value {
    let mut node = Map::new();
    node.insert("id".to_string(), Value::String(element.id));
    node.insert("type".to_string(), Value::String(node_type.to_string()));
    if !element.participant.is_empty() {
        node.insert("participant".to_string(), id_list(element.participant));
    }
    if let Some(controller) = element.controller {
        node.insert("controller".to_string(), Value::String(controller));
    }
    if let Some(controlled) = element.controlled {
        node.insert("controlled".to_string(), Value::String(controlled));
    }
    if !element.xref.is_empty() {
        node.insert("xref".to_string(), id_list(element.xref));
    }
    if let Some(reference) = element.entity_reference {
        node.insert("entityReference".to_string(), Value::String(reference));
    }
    for (key, value) in element.attributes {
        if is_emitted_attribute(&key) {
            node.insert(key, value);
        }
    }
    Value::Object(node)
}

pub fn assemble_document(
    graph: PvjsonGraph,
    synthesized: SynthesizedNodes,
    config: &ConversionConfig,
) -> Value {
    let pathway_id = graph.id.clone().unwrap_or_default();
    let base = graph
        .base_iri()
        .map(str::to_string)
        .unwrap_or_else(|| format!("{pathway_id}/"));

    let mapped: HashMap<String, String> = graph
        .elements
        .iter()
        .filter_map(|e| {
            let t = e.element_type()?;
            Some((e.id.clone(), config.map_vendor_type(t).to_string()))
        })
        .collect();
    let member_is_edge = |id: &String| mapped.get(id).is_some_and(|t| is_edge_type(t));

    let mut ontology = Map::new();
    ontology.insert("@id".to_string(), Value::String(base));
    ontology.insert("@type".to_string(), Value::String(format!("{OWL_NS}Ontology")));
    ontology.insert(format!("{OWL_NS}imports"), json!({ "@id": BIOPAX_NS }));
    let mut nodes = vec![Value::Object(ontology)];

    let mut pathway_components = Vec::new();
    for mut element in graph.elements {
        let Some(node_type) = mapped.get(&element.id).cloned() else {
            continue;
        };
        if !is_biopax_type(&node_type) {
            continue;
        }
        if is_edge_type(&node_type) {
            pathway_components.push(element.id.clone());
        }

        let members = std::mem::take(&mut element.contains);
        let mut node = element_node(element, &node_type);
        if !members.is_empty() {
            let (edges, entities): (Vec<String>, Vec<String>) =
                members.into_iter().partition(|m| member_is_edge(m));
            if let Value::Object(obj) = &mut node {
                match node_type.as_str() {
                    "Pathway" => {
                        obj.insert("pathwayComponent".to_string(), id_list(edges));
                    }
                    "Complex" => {
                        obj.insert("component".to_string(), id_list(entities));
                    }
                    _ => {}
                }
            }
        }
        nodes.push(node);
    }

    let mut pathway = Map::new();
    pathway.insert("id".to_string(), Value::String(pathway_id));
    pathway.insert("type".to_string(), Value::String("Pathway".to_string()));
    pathway.insert("pathwayComponent".to_string(), id_list(pathway_components));
    if let Some(name) = graph.standard_name {
        pathway.insert("name".to_string(), Value::String(name));
    }
    if let Some(name) = graph.display_name {
        pathway.insert("displayName".to_string(), Value::String(name));
    }
    pathway.insert("organism".to_string(), Value::String(synthesized.organism_iri));
    nodes.push(Value::Object(pathway));

    for element in synthesized.nodes {
        let node_type = element.element_type().unwrap_or("UnificationXref").to_string();
        nodes.push(element_node(element, &node_type));
    }

    tracing::debug!(nodes = nodes.len(), "assembled BioPAX document");
    json!({
        "@context": build_context(graph.context, config),
        "@graph": nodes
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthesized() -> SynthesizedNodes {
        SynthesizedNodes {
            organism_iri: "http://identifiers.org/taxonomy/9606".to_string(),
            nodes: vec![Element::new("http://identifiers.org/taxonomy/9606")
                .with_type("BioSource")
                .with_attribute("standardName", "Homo sapiens")],
        }
    }

    fn graph(elements: Vec<Element>) -> PvjsonGraph {
        let mut graph = PvjsonGraph::new(elements).with_context(vec![
            json!(BIOPAX_CONTEXT_URL),
            json!({ "@base": "http://identifiers.org/wikipathways/WP1/" }),
        ]);
        graph.id = Some("http://identifiers.org/wikipathways/WP1".to_string());
        graph.standard_name = Some("Apoptosis".to_string());
        graph
    }

    #[test]
    fn context_gets_prerequisites_and_biopax_prefix() {
        let config = ConversionConfig::default();
        let context = build_context(vec![json!({ "@base": "http://b/" })], &config);
        assert_eq!(context[0], json!(config.prerequisites_context));
        assert_eq!(context[1], json!(BIOPAX_CONTEXT_URL));
        assert_eq!(context[2]["biopax"], json!(BIOPAX_NS));

        let context = build_context(vec![json!(BIOPAX_CONTEXT_URL)], &config);
        assert_eq!(context.len(), 3);
        assert_eq!(context[2], json!({ "biopax": BIOPAX_NS }));
    }

    #[test]
    fn graph_order_and_pathway_node() {
        let doc = assemble_document(
            graph(vec![
                Element::new("p1").with_type("GeneProduct").with_attribute("x", 1),
                Element::new("r1").with_type("Conversion"),
                Element::new("l1").with_type("Label"),
                Element::new("u1"),
            ]),
            synthesized(),
            &ConversionConfig::default(),
        );
        let nodes = doc["@graph"].as_array().unwrap();

        assert_eq!(nodes[0]["@id"], json!("http://identifiers.org/wikipathways/WP1/"));
        assert_eq!(nodes[0]["@type"], json!(format!("{OWL_NS}Ontology")));
        assert_eq!(nodes[1], json!({ "id": "p1", "type": "Protein" }));
        assert_eq!(nodes[2]["type"], json!("Conversion"));
        assert_eq!(
            nodes[3],
            json!({
                "id": "http://identifiers.org/wikipathways/WP1",
                "type": "Pathway",
                "pathwayComponent": ["r1"],
                "name": "Apoptosis",
                "organism": "http://identifiers.org/taxonomy/9606"
            })
        );
        assert_eq!(nodes[4]["type"], json!("BioSource"));
        assert_eq!(nodes.len(), 5);
    }

    #[test]
    fn containers_split_members_by_kind() {
        let doc = assemble_document(
            graph(vec![
                Element::new("pw").with_type("Pathway").with_contains(["r1", "p1"]),
                Element::new("cx").with_type("Group").with_contains(["r1", "p1"]),
                Element::new("r1").with_type("BiochemicalReaction"),
                Element::new("p1").with_type("Protein"),
            ]),
            synthesized(),
            &ConversionConfig::default(),
        );
        let nodes = doc["@graph"].as_array().unwrap();

        assert_eq!(nodes[1]["pathwayComponent"], json!(["r1"]));
        assert!(nodes[1].get("contains").is_none());
        assert_eq!(nodes[2]["type"], json!("Complex"));
        assert_eq!(nodes[2]["component"], json!(["p1"]));
    }

    #[test]
    fn staging_and_layout_attributes_are_not_emitted() {
        let mut element = Element::new("p1")
            .with_type("Protein")
            .with_attribute("displayName", "TP53")
            .with_attribute("database", "Ensembl")
            .with_attribute("http://purl.org/dc/terms/source", "curated");
        element.entity_reference = Some("ProteinReference_1".to_string());
        let node = element_node(element, "Protein");

        assert_eq!(
            node,
            json!({
                "id": "p1",
                "type": "Protein",
                "entityReference": "ProteinReference_1",
                "displayName": "TP53",
                "http://purl.org/dc/terms/source": "curated"
            })
        );
    }
}
