//! JSON-LD context processing: remote context loading, term definitions and
//! IRI expansion.
//!
//! This covers the subset of JSON-LD 1.0 context features BioPAX documents
//! use: `@base`, `@vocab`, prefixes, simple and expanded term definitions,
//! keyword aliases, `@type` coercion and `@container: @list|@set`.

use biopax_model::config::DEFAULT_PREREQUISITES_CONTEXT;
use serde_json::{Map, Value};
use sophia::iri::resolve::BaseIri;
use sophia::iri::Iri;
use std::collections::HashMap;

/// The BioPAX term context published alongside WikiPathways pvjson.
pub const BIOPAX_CONTEXT_URL: &str = "https://wikipathwayscontexts.firebaseio.com/biopax.json";

const OWL_PREREQUISITES_DOCUMENT: &str = include_str!("../contexts/owl-prerequisites.jsonld");
const BIOPAX_CONTEXT_DOCUMENT: &str = include_str!("../contexts/biopax.jsonld");

/// Remote contexts may reference each other; bail out past this depth.
const MAX_CONTEXT_DEPTH: usize = 16;

/// Resolves remote `@context` URLs to their documents.
///
/// The converter never performs network I/O; loaders serve preloaded
/// documents and fail on anything else.
pub trait ContextLoader: Send + Sync {
    fn load(&self, url: &str) -> Result<Value, String>;
}

/// Loader over an in-memory table of context documents.
#[derive(Debug, Clone, Default)]
pub struct StaticContextLoader {
    documents: HashMap<String, ContextDocument>,
}

#[derive(Debug, Clone)]
enum ContextDocument {
    Parsed(Value),
    /// Compiled-in JSON, parsed on each load.
    Bundled(&'static str),
}

impl StaticContextLoader {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loader preloaded with the OWL prerequisites and BioPAX term contexts.
    pub fn bundled() -> Self {
        Self::empty()
            .with_bundled(DEFAULT_PREREQUISITES_CONTEXT, OWL_PREREQUISITES_DOCUMENT)
            .with_bundled(BIOPAX_CONTEXT_URL, BIOPAX_CONTEXT_DOCUMENT)
    }

    pub fn with_document(mut self, url: impl Into<String>, document: Value) -> Self {
        self.documents.insert(url.into(), ContextDocument::Parsed(document));
        self
    }

    fn with_bundled(mut self, url: &str, text: &'static str) -> Self {
        self.documents.insert(url.to_string(), ContextDocument::Bundled(text));
        self
    }
}

impl ContextLoader for StaticContextLoader {
    fn load(&self, url: &str) -> Result<Value, String> {
        match self.documents.get(url) {
            Some(ContextDocument::Parsed(document)) => Ok(document.clone()),
            Some(ContextDocument::Bundled(text)) => serde_json::from_str(text)
                .map_err(|e| format!("bundled context {url} is not valid JSON: {e}")),
            None => Err(format!("remote context {url} is not available offline")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    List,
    Set,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermDefinition {
    /// `None` when the term was explicitly mapped to `null`.
    pub iri: Option<String>,
    pub type_mapping: Option<String>,
    pub container: Option<Container>,
}

#[derive(Debug, Clone, Default)]
pub struct ActiveContext {
    pub base: Option<String>,
    pub vocab: Option<String>,
    terms: HashMap<String, TermDefinition>,
}

impl ActiveContext {
    pub fn term(&self, term: &str) -> Option<&TermDefinition> {
        self.terms.get(term)
    }

    /// Apply a local context (string, object, array or null) on top of this one.
    pub fn process(&self, local: &Value, loader: &dyn ContextLoader) -> Result<ActiveContext, String> {
        self.process_at_depth(local, loader, 0)
    }

    fn process_at_depth(
        &self,
        local: &Value,
        loader: &dyn ContextLoader,
        depth: usize,
    ) -> Result<ActiveContext, String> {
        if depth > MAX_CONTEXT_DEPTH {
            return Err("context nesting too deep (recursive remote contexts?)".to_string());
        }
        match local {
            Value::Null => Ok(ActiveContext {
                base: self.base.clone(),
                ..ActiveContext::default()
            }),
            Value::Array(items) => {
                let mut result = self.clone();
                for item in items {
                    result = result.process_at_depth(item, loader, depth + 1)?;
                }
                Ok(result)
            }
            Value::String(url) => {
                let document = loader.load(url)?;
                let inner = match document {
                    Value::Object(mut obj) => obj.remove("@context").unwrap_or(Value::Object(obj)),
                    other => other,
                };
                self.process_at_depth(&inner, loader, depth + 1)
            }
            Value::Object(definitions) => {
                let mut result = self.clone();
                result.apply_definitions(definitions)?;
                Ok(result)
            }
            other => Err(format!("invalid local context: {other}")),
        }
    }

    fn apply_definitions(&mut self, local: &Map<String, Value>) -> Result<(), String> {
        if let Some(base) = local.get("@base") {
            self.base = match base {
                Value::Null => None,
                Value::String(b) => Some(match &self.base {
                    Some(current) if !is_absolute_iri(b) => resolve_relative(current, b)?,
                    _ => b.clone(),
                }),
                other => return Err(format!("invalid @base: {other}")),
            };
        }

        let mut defined: HashMap<String, bool> = HashMap::new();

        if let Some(vocab) = local.get("@vocab") {
            self.vocab = match vocab {
                Value::Null => None,
                Value::String(v) => Some(self.expand_defining(v, local, &mut defined)?),
                other => return Err(format!("invalid @vocab: {other}")),
            };
        }

        for term in local.keys() {
            if term.starts_with('@') {
                continue;
            }
            self.define_term(local, term, &mut defined)?;
        }
        Ok(())
    }

    fn define_term(
        &mut self,
        local: &Map<String, Value>,
        term: &str,
        defined: &mut HashMap<String, bool>,
    ) -> Result<(), String> {
        match defined.get(term) {
            Some(true) => return Ok(()),
            Some(false) => return Err(format!("cyclic IRI mapping for term {term}")),
            None => {}
        }
        defined.insert(term.to_string(), false);

        let Some(value) = local.get(term) else {
            defined.insert(term.to_string(), true);
            return Ok(());
        };

        let definition = match value {
            Value::Null => TermDefinition {
                iri: None,
                type_mapping: None,
                container: None,
            },
            Value::String(id) => TermDefinition {
                iri: Some(self.expand_defining(id, local, defined)?),
                type_mapping: None,
                container: None,
            },
            Value::Object(obj) => {
                let iri = match obj.get("@id") {
                    Some(Value::String(id)) => Some(self.expand_defining(id, local, defined)?),
                    Some(Value::Null) => None,
                    Some(other) => return Err(format!("invalid @id for term {term}: {other}")),
                    None => Some(self.expand_defining(term, local, defined)?),
                };
                let type_mapping = match obj.get("@type") {
                    Some(Value::String(t)) if t == "@id" || t == "@vocab" => Some(t.clone()),
                    Some(Value::String(t)) => Some(self.expand_defining(t, local, defined)?),
                    Some(other) => return Err(format!("invalid @type for term {term}: {other}")),
                    None => None,
                };
                let container = match obj.get("@container").and_then(Value::as_str) {
                    Some("@list") => Some(Container::List),
                    Some("@set") => Some(Container::Set),
                    _ => None,
                };
                TermDefinition {
                    iri,
                    type_mapping,
                    container,
                }
            }
            other => return Err(format!("invalid term definition for {term}: {other}")),
        };

        self.terms.insert(term.to_string(), definition);
        defined.insert(term.to_string(), true);
        Ok(())
    }

    /// IRI expansion while a local context is being applied: terms and
    /// prefixes it defines are resolved first.
    fn expand_defining(
        &mut self,
        value: &str,
        local: &Map<String, Value>,
        defined: &mut HashMap<String, bool>,
    ) -> Result<String, String> {
        if value.starts_with('@') {
            return Ok(value.to_string());
        }
        if local.contains_key(value) && !defined.contains_key(value) {
            self.define_term(local, value, defined)?;
        }
        if let Some((prefix, suffix)) = value.split_once(':') {
            if prefix == "_" || suffix.starts_with("//") {
                return Ok(value.to_string());
            }
            if local.contains_key(prefix) {
                self.define_term(local, prefix, defined)?;
            }
            if let Some(TermDefinition { iri: Some(iri), .. }) = self.terms.get(prefix) {
                return Ok(format!("{iri}{suffix}"));
            }
            return Ok(value.to_string());
        }
        if let Some(TermDefinition { iri: Some(iri), .. }) = self.terms.get(value) {
            return Ok(iri.clone());
        }
        match &self.vocab {
            Some(vocab) => Ok(format!("{vocab}{value}")),
            None => Ok(value.to_string()),
        }
    }

    /// Expand a property name, type or `@vocab`-relative value.
    pub fn expand_vocab(&self, value: &str) -> Option<String> {
        self.expand_iri(value, true)
    }

    /// Expand an `@id` value (document-relative).
    pub fn expand_document(&self, value: &str) -> Option<String> {
        self.expand_iri(value, false)
    }

    fn expand_iri(&self, value: &str, vocab: bool) -> Option<String> {
        if value.starts_with('@') {
            return Some(value.to_string());
        }
        if vocab {
            if let Some(definition) = self.terms.get(value) {
                return definition.iri.clone();
            }
        }
        if let Some((prefix, suffix)) = value.split_once(':') {
            if prefix == "_" || suffix.starts_with("//") {
                return Some(value.to_string());
            }
            if let Some(TermDefinition { iri: Some(iri), .. }) = self.terms.get(prefix) {
                return Some(format!("{iri}{suffix}"));
            }
            if is_absolute_iri(value) {
                return Some(value.to_string());
            }
        }
        if vocab {
            if let Some(v) = &self.vocab {
                return Some(format!("{v}{value}"));
            }
        }
        match &self.base {
            // Ill-formed references drop out like any other relative IRI.
            Some(base) => resolve_relative(base, value).ok(),
            None => Some(value.to_string()),
        }
    }
}

/// `scheme:rest` with an RFC 3986 scheme.
///
/// Only the shape is checked; malformed IRIs are rejected when quads are
/// written.
pub fn is_absolute_iri(value: &str) -> bool {
    let Some((scheme, _)) = value.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Resolve a reference against a base IRI (RFC 3987).
pub fn resolve_relative(base: &str, reference: &str) -> Result<String, String> {
    let parsed = BaseIri::new(base).map_err(|e| format!("invalid base IRI {base}: {e}"))?;
    parsed
        .resolve(reference)
        .map(Iri::unwrap)
        .map_err(|e| format!("cannot resolve {reference} against {base}: {e}"))
}
