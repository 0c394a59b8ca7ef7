//! The pvjson element graph: the in-memory shape every pipeline stage reads
//! and returns.
//!
//! Structural fields (`contains`, `participant`, `controller`, `controlled`,
//! `xref`, `entityReference`) are typed so stages can rewrite them without
//! string-keyed bookkeeping. Everything else an upstream parser emits lives in
//! the open `attributes` map and is carried through verbatim.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// An element's `type` field.
///
/// Upstream parsers emit either one (possibly vendor-prefixed) type or a list
/// of candidates. The type normalizer collapses both to `Single`, and every
/// later stage only ever reads `Single`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeTag {
    Single(String),
    Candidates(Vec<String>),
}

impl TypeTag {
    /// The canonical type, if this tag has been resolved to one.
    pub fn canonical(&self) -> Option<&str> {
        match self {
            TypeTag::Single(t) => Some(t.as_str()),
            TypeTag::Candidates(_) => None,
        }
    }

    /// All candidate strings, in input order.
    pub fn candidates(&self) -> Vec<&str> {
        match self {
            TypeTag::Single(t) => vec![t.as_str()],
            TypeTag::Candidates(ts) => ts.iter().map(String::as_str).collect(),
        }
    }
}

/// A deferred cross-reference lookup staged on an element by the upstream
/// parser. The reference enrichment stage resolves it and removes it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupRequest {
    pub db: String,
    pub identifier: String,
    /// The element's own type at the time of the lookup (e.g. `Protein`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_hint: Option<String>,
}

/// Staging attributes an upstream parser uses to describe a lookup without
/// an explicit `lookup` object.
pub const STAGING_DB_ATTRIBUTE: &str = "database";
pub const STAGING_IDENTIFIER_ATTRIBUTE: &str = "identifier";

/// One node or edge of the pathway diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_tag: Option<TypeTag>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "one_or_many")]
    pub contains: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "one_or_many")]
    pub participant: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controlled: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "one_or_many")]
    pub xref: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lookup: Option<LookupRequest>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Element {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            type_tag: None,
            contains: Vec::new(),
            participant: Vec::new(),
            controller: None,
            controlled: None,
            xref: Vec::new(),
            entity_reference: None,
            lookup: None,
            attributes: Map::new(),
        }
    }

    pub fn with_type(mut self, t: impl Into<String>) -> Self {
        self.type_tag = Some(TypeTag::Single(t.into()));
        self
    }

    pub fn with_candidates<I, S>(mut self, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_tag = Some(TypeTag::Candidates(
            candidates.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_contains<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.contains = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_participants<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.participant = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_control(mut self, controller: impl Into<String>, controlled: impl Into<String>) -> Self {
        self.controller = Some(controller.into());
        self.controlled = Some(controlled.into());
        self
    }

    pub fn with_lookup(mut self, db: impl Into<String>, identifier: impl Into<String>) -> Self {
        self.lookup = Some(LookupRequest {
            db: db.into(),
            identifier: identifier.into(),
            type_hint: None,
        });
        self
    }

    /// The canonical type. `None` before normalization or for untyped elements.
    pub fn element_type(&self) -> Option<&str> {
        self.type_tag.as_ref().and_then(TypeTag::canonical)
    }

    pub fn set_type(&mut self, t: impl Into<String>) {
        self.type_tag = Some(TypeTag::Single(t.into()));
    }

    pub fn has_type(&self, t: &str) -> bool {
        self.element_type() == Some(t)
    }

    /// The lookup this element asks for, explicit or derived from the
    /// `database`/`identifier` staging attributes.
    pub fn lookup_request(&self) -> Option<LookupRequest> {
        let mut request = match &self.lookup {
            Some(lookup) => lookup.clone(),
            None => {
                let db = self.attributes.get(STAGING_DB_ATTRIBUTE)?.as_str()?;
                let identifier = self.attributes.get(STAGING_IDENTIFIER_ATTRIBUTE)?.as_str()?;
                if db.is_empty() || identifier.is_empty() {
                    return None;
                }
                LookupRequest {
                    db: db.to_string(),
                    identifier: identifier.to_string(),
                    type_hint: None,
                }
            }
        };
        if request.type_hint.is_none() {
            request.type_hint = self.element_type().map(str::to_string);
        }
        Some(request)
    }

    /// A copy of this element under a different id.
    pub fn duplicate(&self, new_id: impl Into<String>) -> Element {
        let mut copy = self.clone();
        copy.id = new_id.into();
        copy
    }

    pub fn display_name(&self) -> Option<&str> {
        self.attributes.get("displayName").and_then(Value::as_str)
    }
}

/// Pathway-level identity handed in alongside the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathwayMetadata {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl PathwayMetadata {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// The whole pvjson document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PvjsonGraph {
    #[serde(rename = "@context", default, deserialize_with = "values_one_or_many")]
    pub context: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organism: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl PvjsonGraph {
    pub fn new(elements: Vec<Element>) -> Self {
        Self {
            context: Vec::new(),
            id: None,
            version: None,
            elements,
            organism: None,
            standard_name: None,
            display_name: None,
        }
    }

    pub fn with_organism(mut self, organism: impl Into<String>) -> Self {
        self.organism = Some(organism.into());
        self
    }

    pub fn with_context(mut self, context: Vec<Value>) -> Self {
        self.context = context;
        self
    }

    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Position of every element by id. Later duplicates shadow earlier ones.
    pub fn index_by_id(&self) -> HashMap<String, usize> {
        self.elements
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id.clone(), i))
            .collect()
    }

    /// The `@base` of the last context object declaring one.
    pub fn base_iri(&self) -> Option<&str> {
        self.context
            .iter()
            .rev()
            .filter_map(Value::as_object)
            .find_map(|obj| obj.get("@base").and_then(Value::as_str))
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(v)) => v,
    })
}

fn values_one_or_many<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => Vec::new(),
        Value::Array(values) => values,
        other => vec![other],
    })
}
