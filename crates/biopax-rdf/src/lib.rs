//! BioPAX document serialization (linked data → RDF/XML).
//!
//! The conversion runs as a small state machine:
//!
//! ```text
//!   JSON-LD ──expand──► expanded nodes ──to-quads──► N-Quads
//!                                                      │
//!                                                    patch
//!                                                      ▼
//!   <?xml …?> + RDF/XML ◄──rdf/xml── Sophia graph ◄──parse──
//! ```
//!
//! Every step either hands its output to the next one or stops with an
//! [`RdfError`] naming the step. No partial document is ever returned.
//!
//! Today this crate uses:
//! - an in-crate JSON-LD processor ([`context`], [`expand`]) covering the
//!   features BioPAX documents use,
//! - **Sophia** for IRI resolution, N-Quads writing ([`nquads`]) and parsing,
//!   and RDF/XML serialization ([`rdfxml`]).

pub mod context;
pub mod expand;
pub mod nquads;
pub mod rdfxml;

pub use context::{ContextLoader, StaticContextLoader, BIOPAX_CONTEXT_URL};

use serde_json::Value;

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Fixed textual substitutions applied to the N-Quads.
///
/// - `SBO:` terms arrive as bare CURIEs that JSON-LD treats as IRIs with an
///   `SBO` scheme; they are moved into the identifiers.org SBO namespace.
/// - the pvjson context maps `identifier` to an RDA property; BioPAX wants
///   its own `id` property.
pub const NQUADS_PATCHES: &[(&str, &str)] = &[
    ("<SBO:", "<http://identifiers.org/biomodels.sbo/SBO:"),
    (
        "http://rdaregistry.info/Elements/u/P60052",
        "http://www.biopax.org/release/biopax-level3.owl#id",
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializationStep {
    Expand,
    ToQuads,
    Patch,
    ParseQuads,
    RdfXml,
}

impl SerializationStep {
    pub const fn name(self) -> &'static str {
        match self {
            SerializationStep::Expand => "expand JSON-LD",
            SerializationStep::ToQuads => "convert JSON-LD to N-Quads",
            SerializationStep::Patch => "patch N-Quads",
            SerializationStep::ParseQuads => "parse N-Quads",
            SerializationStep::RdfXml => "serialize RDF/XML",
        }
    }
}

impl std::fmt::Display for SerializationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("failed to {step}: {message}")]
pub struct RdfError {
    pub step: SerializationStep,
    pub message: String,
}

impl RdfError {
    fn at(step: SerializationStep) -> impl FnOnce(String) -> RdfError {
        move |message| RdfError { step, message }
    }
}

enum State {
    Document(Value),
    Expanded(Vec<Value>),
    Quads(String),
    Patched(String),
    Graph(sophia::inmem::graph::LightGraph),
    Serialized(String),
}

/// Apply [`NQUADS_PATCHES`] to N-Quads text.
pub fn patch_nquads(nquads: &str) -> String {
    NQUADS_PATCHES
        .iter()
        .fold(nquads.to_string(), |text, (from, to)| text.replace(from, to))
}

/// Expand a BioPAX JSON-LD document to canonical N-Quads (before patching).
pub fn document_to_nquads(document: &Value, loader: &dyn ContextLoader) -> Result<String, RdfError> {
    let expanded = expand::expand(document, loader).map_err(RdfError::at(SerializationStep::Expand))?;
    let quads = nquads::to_quads(&expanded).map_err(RdfError::at(SerializationStep::ToQuads))?;
    nquads::write_nquads(&quads).map_err(RdfError::at(SerializationStep::ToQuads))
}

/// Serialize a BioPAX JSON-LD document as an RDF/XML text document.
pub fn serialize_document(document: &Value, loader: &dyn ContextLoader) -> Result<String, RdfError> {
    let mut state = State::Document(document.clone());
    loop {
        state = match state {
            State::Document(doc) => State::Expanded(
                expand::expand(&doc, loader).map_err(RdfError::at(SerializationStep::Expand))?,
            ),
            State::Expanded(nodes) => {
                let quads =
                    nquads::to_quads(&nodes).map_err(RdfError::at(SerializationStep::ToQuads))?;
                tracing::debug!(quads = quads.len(), "converted expanded document to quads");
                State::Quads(
                    nquads::write_nquads(&quads).map_err(RdfError::at(SerializationStep::ToQuads))?,
                )
            }
            State::Quads(text) => State::Patched(patch_nquads(&text)),
            State::Patched(text) => State::Graph(
                rdfxml::parse_nquads(&text).map_err(RdfError::at(SerializationStep::ParseQuads))?,
            ),
            State::Graph(graph) => State::Serialized(
                rdfxml::serialize_rdfxml(&graph).map_err(RdfError::at(SerializationStep::RdfXml))?,
            ),
            State::Serialized(xml) => return Ok(format!("{XML_DECLARATION}\n{xml}")),
        };
    }
}
