//! Expanded JSON-LD → RDF quads → canonical N-Quads text.
//!
//! Output lines are sorted and deduplicated. Triples whose subject, predicate
//! or object IRI is still relative after expansion are dropped, as JSON-LD
//! requires. Terms are handed to Sophia's N-Quads serializer for writing.

use crate::context::is_absolute_iri;
use biopax_model::vocab::{RDF_NS, XSD_NS};
use serde_json::{Map, Value};
use sophia::api::quad::Spog;
use sophia::api::serializer::{QuadSerializer, Stringifier};
use sophia::api::term::{BnodeId, LanguageTag, SimpleTerm};
use sophia::api::MownStr;
use sophia::iri::IriRef;
use sophia::turtle::serializer::nq::NqSerializer;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Term {
    Iri(String),
    Blank(String),
    Literal {
        lexical: String,
        datatype: String,
        language: Option<String>,
    },
}

impl Term {
    fn to_simple(&self) -> Result<SimpleTerm<'static>, String> {
        Ok(match self {
            Term::Iri(iri) => SimpleTerm::Iri(iri_ref(iri)?),
            Term::Blank(label) => SimpleTerm::BlankNode(
                BnodeId::new(MownStr::from(label.clone()))
                    .map_err(|e| format!("invalid blank node: {e}"))?,
            ),
            Term::Literal {
                lexical,
                language: Some(tag),
                ..
            } => SimpleTerm::LiteralLanguage(
                MownStr::from(lexical.clone()),
                LanguageTag::new(MownStr::from(tag.clone()))
                    .map_err(|e| format!("invalid language tag: {e}"))?,
            ),
            Term::Literal {
                lexical,
                datatype,
                language: None,
            } => SimpleTerm::LiteralDatatype(MownStr::from(lexical.clone()), iri_ref(datatype)?),
        })
    }
}

fn iri_ref(iri: &str) -> Result<IriRef<MownStr<'static>>, String> {
    IriRef::new(MownStr::from(iri.to_string())).map_err(|e| e.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quad {
    pub subject: Term,
    pub predicate: String,
    pub object: Term,
}

impl Quad {
    fn to_spog(&self) -> Result<Spog<SimpleTerm<'static>>, String> {
        let predicate = SimpleTerm::Iri(iri_ref(&self.predicate)?);
        Ok((
            [self.subject.to_simple()?, predicate, self.object.to_simple()?],
            None,
        ))
    }
}

const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

struct QuadCollector {
    quads: BTreeSet<Quad>,
    next_blank: usize,
    /// Document blank node labels, relabelled into the generated `bN` space.
    relabelled: HashMap<String, Term>,
}

impl QuadCollector {
    fn fresh_blank(&mut self) -> Term {
        let label = format!("b{}", self.next_blank);
        self.next_blank += 1;
        Term::Blank(label)
    }

    fn node_term(&mut self, id: &str) -> Option<Term> {
        if let Some(label) = id.strip_prefix("_:") {
            if let Some(term) = self.relabelled.get(label) {
                return Some(term.clone());
            }
            let term = self.fresh_blank();
            self.relabelled.insert(label.to_string(), term.clone());
            return Some(term);
        }
        is_absolute_iri(id).then(|| Term::Iri(id.to_string()))
    }

    fn push(&mut self, subject: &Term, predicate: &str, object: Term) {
        self.quads.insert(Quad {
            subject: subject.clone(),
            predicate: predicate.to_string(),
            object,
        });
    }

    /// Emit a node's statements and return the term naming it.
    fn node(&mut self, node: &Map<String, Value>) -> Result<Option<Term>, String> {
        let subject = match node.get("@id").and_then(Value::as_str) {
            Some(id) => match self.node_term(id) {
                Some(term) => term,
                None => return Ok(None),
            },
            None => self.fresh_blank(),
        };

        let rdf_type = format!("{RDF_NS}type");
        for t in string_values(node.get("@type")) {
            if is_absolute_iri(t) {
                self.push(&subject, &rdf_type, Term::Iri(t.to_string()));
            }
        }

        let mut properties: Vec<&String> = node.keys().filter(|k| !k.starts_with('@')).collect();
        properties.sort();
        for property in properties {
            if !is_absolute_iri(property) {
                continue;
            }
            let items = match &node[property.as_str()] {
                Value::Array(items) => items.as_slice(),
                other => std::slice::from_ref(other),
            };
            for item in items {
                if let Some(object) = self.object(item)? {
                    self.push(&subject, property, object);
                }
            }
        }

        if let Some(Value::Array(graph)) = node.get("@graph") {
            for inner in graph {
                if let Value::Object(obj) = inner {
                    self.node(obj)?;
                }
            }
        }

        Ok(Some(subject))
    }

    fn object(&mut self, item: &Value) -> Result<Option<Term>, String> {
        let Value::Object(obj) = item else {
            return Err(format!("expanded value is not an object: {item}"));
        };
        if let Some(value) = obj.get("@value") {
            return Ok(Some(literal(value, obj.get("@type"), obj.get("@language"))?));
        }
        if let Some(list) = obj.get("@list") {
            let items = list.as_array().map(Vec::as_slice).unwrap_or(&[]);
            return self.list(items).map(Some);
        }
        self.node(obj)
    }

    fn list(&mut self, items: &[Value]) -> Result<Term, String> {
        let nil = Term::Iri(format!("{RDF_NS}nil"));
        let first = format!("{RDF_NS}first");
        let rest = format!("{RDF_NS}rest");

        let mut objects = Vec::with_capacity(items.len());
        for item in items {
            if let Some(object) = self.object(item)? {
                objects.push(object);
            }
        }
        if objects.is_empty() {
            return Ok(nil);
        }
        let cells: Vec<Term> = objects.iter().map(|_| self.fresh_blank()).collect();
        for (i, object) in objects.into_iter().enumerate() {
            self.push(&cells[i], &first, object);
            let next = cells.get(i + 1).cloned().unwrap_or_else(|| nil.clone());
            self.push(&cells[i], &rest, next);
        }
        Ok(cells[0].clone())
    }
}

fn string_values(value: Option<&Value>) -> Vec<&str> {
    match value {
        Some(Value::String(s)) => vec![s.as_str()],
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

fn literal(value: &Value, datatype: Option<&Value>, language: Option<&Value>) -> Result<Term, String> {
    let datatype = datatype.and_then(Value::as_str);
    let (lexical, default_type) = match value {
        Value::String(s) => (s.clone(), XSD_STRING.to_string()),
        Value::Bool(b) => (b.to_string(), format!("{XSD_NS}boolean")),
        Value::Number(n) => match n.as_i64() {
            Some(i) if datatype.map_or(true, |d| d != format!("{XSD_NS}double")) => {
                (i.to_string(), format!("{XSD_NS}integer"))
            }
            _ => {
                let f = n.as_f64().ok_or_else(|| format!("unrepresentable number {n}"))?;
                (format!("{f:E}"), format!("{XSD_NS}double"))
            }
        },
        other => return Err(format!("invalid literal value {other}")),
    };
    let language = match language.and_then(Value::as_str) {
        Some(lang) if value.is_string() => Some(lang.to_string()),
        _ => None,
    };
    let datatype = match (&language, datatype) {
        (Some(_), _) => format!("{RDF_NS}langString"),
        (None, Some(dt)) => dt.to_string(),
        (None, None) => default_type,
    };
    Ok(Term::Literal {
        lexical,
        datatype,
        language,
    })
}

/// Turn expanded node objects into a sorted, duplicate-free quad set.
pub fn to_quads(expanded: &[Value]) -> Result<Vec<Quad>, String> {
    let mut collector = QuadCollector {
        quads: BTreeSet::new(),
        next_blank: 0,
        relabelled: HashMap::new(),
    };
    for item in expanded {
        match item {
            Value::Object(obj) => {
                collector.node(obj)?;
            }
            other => return Err(format!("top-level expanded item is not a node: {other}")),
        }
    }
    Ok(collector.quads.into_iter().collect())
}

/// Serialize quads as N-Quads, one sorted line each.
///
/// Fails when a term is not a well-formed IRI, blank node or language tag.
pub fn write_nquads(quads: &[Quad]) -> Result<String, String> {
    let dataset = quads
        .iter()
        .map(Quad::to_spog)
        .collect::<Result<Vec<_>, _>>()?;
    let mut stringifier = NqSerializer::new_stringifier();
    let text = stringifier
        .serialize_dataset(&dataset)
        .map_err(|e| format!("failed to write N-Quads: {e}"))?
        .as_str()
        .to_string();

    let mut lines: Vec<&str> = text.lines().collect();
    lines.sort_unstable();
    lines.dedup();
    let mut out = lines.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    Ok(out)
}
