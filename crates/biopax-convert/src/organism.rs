//! Organism and xref synthesis.
//!
//! Resolves the pathway's organism through the configured taxonomy table
//! and emits the BioSource with its taxonomy UnificationXref. Reference and
//! publication nodes that arrive without usable identifiers are completed
//! here as well.

use crate::error::{ConversionError, ConversionResult};
use biopax_model::config::taxonomy_id;
use biopax_model::digest::unification_xref_id;
use biopax_model::vocab::{is_reference_type, ORGANISM_REFERENCE_TYPES};
use biopax_model::{ConversionConfig, Element, PvjsonGraph};
use serde_json::Value;
use std::collections::HashSet;

pub const TAXONOMY_DB: &str = "taxonomy";
pub const UNKNOWN: &str = "Unknown";

/// Nodes synthesized for the document tail, plus the organism IRI.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedNodes {
    pub organism_iri: String,
    pub nodes: Vec<Element>,
}

/// `(db, identifier)` from an identifiers.org IRI:
/// `http://identifiers.org/ncbigene/7157` → `("ncbigene", "7157")`.
pub fn identifiers_org_record(iri: &str) -> Option<(String, String)> {
    let (_, path) = iri.rsplit_once("identifiers.org")?;
    let mut parts = path.split('/').skip(1);
    let db = parts.next().filter(|s| !s.is_empty())?;
    let identifier = parts.next().filter(|s| !s.is_empty())?;
    Some((db.to_string(), identifier.to_string()))
}

fn xref_node(db: &str, identifier: &str) -> Element {
    Element::new(unification_xref_id(db, identifier))
        .with_type("UnificationXref")
        .with_attribute("db", db)
        .with_attribute("identifier", identifier)
}

pub fn synthesize_organism(
    mut graph: PvjsonGraph,
    config: &ConversionConfig,
) -> ConversionResult<(PvjsonGraph, SynthesizedNodes)> {
    let name = graph.organism.clone();
    let organism_iri = name
        .as_deref()
        .and_then(|n| config.organism_iri(n))
        .map(str::to_string)
        .ok_or(ConversionError::OrganismNotFound { organism: name.clone() })?;
    let name = name.unwrap_or_default();

    let mut known: HashSet<String> = graph.elements.iter().map(|e| e.id.clone()).collect();
    let mut nodes = Vec::new();

    let taxon = xref_node(TAXONOMY_DB, taxonomy_id(&organism_iri));
    let mut biosource = Element::new(organism_iri.clone())
        .with_type("BioSource")
        .with_attribute("standardName", name.clone());
    biosource.xref = vec![taxon.id.clone()];
    known.insert(taxon.id.clone());
    nodes.push(taxon);
    nodes.push(biosource);

    for element in graph.elements.iter_mut() {
        let Some(t) = element.element_type().map(str::to_string) else {
            continue;
        };

        if ORGANISM_REFERENCE_TYPES.contains(&t.as_str()) {
            element
                .attributes
                .insert("organism".to_string(), Value::String(organism_iri.clone()));
        }

        if is_reference_type(&t) && element.xref.is_empty() {
            let (db, identifier) = identifiers_org_record(&element.id)
                .unwrap_or_else(|| (UNKNOWN.to_string(), UNKNOWN.to_string()));
            let xref = xref_node(&db, &identifier);
            element.xref = vec![xref.id.clone()];
            if known.insert(xref.id.clone()) {
                nodes.push(xref);
            }
        }

        if t == "PublicationXref" {
            let mut completed = false;
            for key in ["db", "identifier"] {
                if !element.attributes.get(key).is_some_and(Value::is_string) {
                    element
                        .attributes
                        .insert(key.to_string(), Value::String(UNKNOWN.to_string()));
                    completed = true;
                }
            }
            if completed {
                element.attributes.remove("displayName");
            }
        }
    }

    tracing::debug!(organism = %name, iri = %organism_iri, nodes = nodes.len(), "synthesized organism nodes");
    Ok((graph, SynthesizedNodes { organism_iri, nodes }))
}
