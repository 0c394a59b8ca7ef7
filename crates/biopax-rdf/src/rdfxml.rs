//! N-Quads ↔ RDF/XML through Sophia.
//!
//! Sophia parses the patched N-Quads into an in-memory graph (graph names
//! are dropped; BioPAX documents live in the default graph) and its RDF/XML
//! serializer writes the final document.

use sophia::api::prelude::*;
use sophia::inmem::graph::LightGraph;
use sophia::turtle::parser::nq;
use sophia::turtle::serializer::nt::NtSerializer;
use sophia::xml::serializer::RdfXmlSerializer;

/// Parse N-Quads text into an in-memory graph.
pub fn parse_nquads(text: &str) -> Result<LightGraph, String> {
    nq::parse_str(text)
        .to_triples()
        .collect_triples()
        .map_err(|e| format!("failed to parse N-Quads: {e}"))
}

/// Serialize a graph as RDF/XML (without an XML declaration).
pub fn serialize_rdfxml(graph: &LightGraph) -> Result<String, String> {
    let mut stringifier = RdfXmlSerializer::new_stringifier();
    let text = stringifier
        .serialize_graph(graph)
        .map_err(|e| format!("failed to serialize RDF/XML: {e}"))?
        .as_str()
        .to_string();
    Ok(strip_xml_declaration(&text).to_string())
}

/// Parse RDF/XML and write it back out as N-Triples.
///
/// Used to check serialized documents statement by statement.
pub fn rdfxml_to_ntriples(xml: &str) -> Result<String, String> {
    let graph: LightGraph = sophia::xml::parser::parse_str(xml)
        .collect_triples()
        .map_err(|e| format!("failed to parse RDF/XML: {e}"))?;
    let mut stringifier = NtSerializer::new_stringifier();
    let text = stringifier
        .serialize_graph(&graph)
        .map_err(|e| format!("failed to serialize N-Triples: {e}"))?
        .as_str()
        .to_string();
    Ok(text)
}

fn strip_xml_declaration(text: &str) -> &str {
    let trimmed = text.trim_start();
    if trimmed.starts_with("<?xml") {
        if let Some(end) = trimmed.find("?>") {
            return trimmed[end + 2..].trim_start();
        }
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = concat!(
        "<http://ex.org/s> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://ex.org/T> .\n",
        "<http://ex.org/s> <http://ex.org/name> \"TP53\" .\n",
    );

    #[test]
    fn nquads_round_trip_through_rdfxml() {
        let graph = parse_nquads(SAMPLE).unwrap();
        let xml = serialize_rdfxml(&graph).unwrap();
        assert!(xml.contains("rdf:RDF"));
        assert!(!xml.starts_with("<?xml"));

        let nt = rdfxml_to_ntriples(&xml).unwrap();
        assert!(nt.contains("<http://ex.org/s> <http://ex.org/name> \"TP53\""));
        assert!(nt.contains("<http://ex.org/T>"));
    }

    #[test]
    fn malformed_nquads_fail() {
        let err = parse_nquads("<http://ex.org/s> <rel> oops .\n").unwrap_err();
        assert!(err.starts_with("failed to parse N-Quads"));
    }

    #[test]
    fn declaration_is_stripped_once() {
        assert_eq!(
            strip_xml_declaration("<?xml version=\"1.0\"?>\n<rdf:RDF/>"),
            "<rdf:RDF/>"
        );
        assert_eq!(strip_xml_declaration("<rdf:RDF/>"), "<rdf:RDF/>");
    }
}
