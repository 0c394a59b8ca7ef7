//! JSON-LD expansion: compact document → list of expanded node objects.
//!
//! Keys are visited in sorted order so the expanded form (and everything
//! derived from it) is deterministic.

use crate::context::{is_absolute_iri, ActiveContext, Container, ContextLoader};
use serde_json::{Map, Value};

/// Expand a compact JSON-LD document against an initial context.
pub fn expand(document: &Value, loader: &dyn ContextLoader) -> Result<Vec<Value>, String> {
    let expanded = expand_element(&ActiveContext::default(), None, document, loader)?;
    Ok(match expanded {
        Value::Null => Vec::new(),
        Value::Array(items) => items,
        Value::Object(mut obj) if obj.len() == 1 && obj.contains_key("@graph") => {
            match obj.remove("@graph") {
                Some(Value::Array(items)) => items,
                Some(other) => vec![other],
                None => Vec::new(),
            }
        }
        other => vec![other],
    })
}

fn expand_element(
    active: &ActiveContext,
    active_property: Option<&str>,
    element: &Value,
    loader: &dyn ContextLoader,
) -> Result<Value, String> {
    match element {
        Value::Null => Ok(Value::Null),
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                match expand_element(active, active_property, item, loader)? {
                    Value::Null => {}
                    Value::Array(nested) => out.extend(nested),
                    other => out.push(other),
                }
            }
            Ok(Value::Array(out))
        }
        Value::Object(obj) => expand_object(active, active_property, obj, loader),
        scalar => match active_property {
            None | Some("@graph") => Ok(Value::Null),
            Some(property) => Ok(expand_value(active, property, scalar)),
        },
    }
}

fn expand_object(
    active: &ActiveContext,
    active_property: Option<&str>,
    obj: &Map<String, Value>,
    loader: &dyn ContextLoader,
) -> Result<Value, String> {
    let scoped;
    let active = match obj.get("@context") {
        Some(local) => {
            scoped = active.process(local, loader)?;
            &scoped
        }
        None => active,
    };

    let mut keys: Vec<&String> = obj.keys().filter(|k| k.as_str() != "@context").collect();
    keys.sort();

    let mut result = Map::new();
    for key in keys {
        let value = &obj[key.as_str()];
        let Some(property) = active.expand_vocab(key) else {
            continue;
        };
        if property.starts_with('@') {
            expand_keyword(active, &property, value, &mut result, loader)?;
            continue;
        }
        if !is_absolute_iri(&property) {
            continue;
        }

        let mut expanded = expand_element(active, Some(key.as_str()), value, loader)?;
        let is_list_container = active
            .term(key)
            .map(|t| t.container == Some(Container::List))
            .unwrap_or(false);
        if is_list_container && !is_list_object(&expanded) {
            let items = match expanded {
                Value::Array(items) => items,
                Value::Null => Vec::new(),
                other => vec![other],
            };
            expanded = single_key_object("@list", Value::Array(items));
        }
        append_values(&mut result, &property, expanded);
    }

    if let Some(v) = result.get("@value") {
        if v.is_null() {
            return Ok(Value::Null);
        }
        return Ok(Value::Object(result));
    }
    if result.is_empty() {
        return Ok(Value::Null);
    }
    // Free-floating `@language`/`@index`-only objects carry no data.
    if active_property.is_none() && result.keys().all(|k| k == "@language" || k == "@index") {
        return Ok(Value::Null);
    }
    Ok(Value::Object(result))
}

fn expand_keyword(
    active: &ActiveContext,
    keyword: &str,
    value: &Value,
    result: &mut Map<String, Value>,
    loader: &dyn ContextLoader,
) -> Result<(), String> {
    match keyword {
        "@id" => {
            let id = value
                .as_str()
                .ok_or_else(|| format!("@id must be a string, got {value}"))?;
            if let Some(iri) = active.expand_document(id) {
                result.insert("@id".to_string(), Value::String(iri));
            }
        }
        "@type" => {
            let types: Vec<&Value> = match value {
                Value::Array(items) => items.iter().collect(),
                other => vec![other],
            };
            let mut expanded = Vec::with_capacity(types.len());
            for t in types {
                let t = t
                    .as_str()
                    .ok_or_else(|| format!("@type values must be strings, got {t}"))?;
                if let Some(iri) = active.expand_vocab(t) {
                    expanded.push(Value::String(iri));
                }
            }
            // Inside a value object `@type` is a single datatype.
            if result.contains_key("@value") || (expanded.len() == 1 && value.is_string()) {
                if let Some(first) = expanded.into_iter().next() {
                    result.insert("@type".to_string(), first);
                }
            } else {
                result.insert("@type".to_string(), Value::Array(expanded));
            }
        }
        "@value" => {
            if value.is_object() || value.is_array() {
                return Err(format!("@value must be a scalar, got {value}"));
            }
            result.insert("@value".to_string(), value.clone());
        }
        "@language" | "@index" => {
            result.insert(keyword.to_string(), value.clone());
        }
        "@graph" => {
            let expanded = expand_element(active, Some("@graph"), value, loader)?;
            append_values(result, "@graph", expanded);
        }
        "@list" => {
            let expanded = expand_element(active, Some("@list"), value, loader)?;
            let items = match expanded {
                Value::Array(items) => items,
                Value::Null => Vec::new(),
                other => vec![other],
            };
            result.insert("@list".to_string(), Value::Array(items));
        }
        "@set" => {
            let expanded = expand_element(active, Some("@set"), value, loader)?;
            append_values(result, "@set", expanded);
        }
        _ => {}
    }
    Ok(())
}

/// Expand a scalar under the coercion rules of `property`'s term definition.
fn expand_value(active: &ActiveContext, property: &str, value: &Value) -> Value {
    let type_mapping = active.term(property).and_then(|t| t.type_mapping.as_deref());
    match (type_mapping, value) {
        (Some("@id"), Value::String(s)) => match active.expand_document(s) {
            Some(iri) => single_key_object("@id", Value::String(iri)),
            None => Value::Null,
        },
        (Some("@vocab"), Value::String(s)) => match active.expand_vocab(s) {
            Some(iri) => single_key_object("@id", Value::String(iri)),
            None => Value::Null,
        },
        (Some(datatype), _) if !datatype.starts_with('@') => {
            let mut obj = Map::new();
            obj.insert("@value".to_string(), value.clone());
            obj.insert("@type".to_string(), Value::String(datatype.to_string()));
            Value::Object(obj)
        }
        _ => single_key_object("@value", value.clone()),
    }
}

fn is_list_object(value: &Value) -> bool {
    value.as_object().map(|o| o.contains_key("@list")).unwrap_or(false)
}

fn single_key_object(key: &str, value: Value) -> Value {
    let mut obj = Map::new();
    obj.insert(key.to_string(), value);
    Value::Object(obj)
}

fn append_values(result: &mut Map<String, Value>, key: &str, value: Value) {
    let items = match value {
        Value::Null => return,
        Value::Array(items) => items,
        other => vec![other],
    };
    let slot = result
        .entry(key.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    if let Value::Array(existing) = slot {
        existing.extend(items);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{StaticContextLoader, BIOPAX_CONTEXT_URL};
    use serde_json::json;

    const BP: &str = "http://www.biopax.org/release/biopax-level3.owl#";

    fn doc(graph: Value) -> Value {
        json!({
            "@context": [BIOPAX_CONTEXT_URL, { "@base": "http://identifiers.org/wikipathways/WP1/" }],
            "@graph": graph
        })
    }

    #[test]
    fn expands_ids_types_and_coerced_properties() {
        let expanded = expand(
            &doc(json!([{
                "id": "p1",
                "type": "Protein",
                "displayName": "TP53",
                "entityReference": "ProteinReference_1"
            }])),
            &StaticContextLoader::bundled(),
        )
        .unwrap();

        assert_eq!(expanded.len(), 1);
        let node = &expanded[0];
        assert_eq!(node["@id"], json!("http://identifiers.org/wikipathways/WP1/p1"));
        assert_eq!(node["@type"], json!(format!("{BP}Protein")));
        assert_eq!(
            node[format!("{BP}displayName")],
            json!([{ "@value": "TP53", "@type": "http://www.w3.org/2001/XMLSchema#string" }])
        );
        assert_eq!(
            node[format!("{BP}entityReference")],
            json!([{ "@id": "http://identifiers.org/wikipathways/WP1/ProteinReference_1" }])
        );
    }

    #[test]
    fn empty_arrays_produce_no_values() {
        let expanded = expand(
            &doc(json!([{ "id": "pw", "type": "Pathway", "pathwayComponent": [] }])),
            &StaticContextLoader::bundled(),
        )
        .unwrap();
        assert_eq!(expanded[0][format!("{BP}pathwayComponent")], json!([]));
    }

    #[test]
    fn nested_node_objects_and_explicit_iris() {
        let expanded = expand(
            &doc(json!([{
                "@id": "http://identifiers.org/wikipathways/WP1/",
                "@type": "http://www.w3.org/2002/07/owl#Ontology",
                "http://www.w3.org/2002/07/owl#imports": { "@id": BP }
            }])),
            &StaticContextLoader::bundled(),
        )
        .unwrap();
        assert_eq!(
            expanded[0]["http://www.w3.org/2002/07/owl#imports"],
            json!([{ "@id": BP }])
        );
        assert_eq!(
            expanded[0]["@type"],
            json!("http://www.w3.org/2002/07/owl#Ontology")
        );
    }

    #[test]
    fn list_containers_wrap_values() {
        let context = json!({ "ex": "http://example.org/", "steps": { "@id": "ex:steps", "@container": "@list" } });
        let expanded = expand(
            &json!({ "@context": context, "@id": "http://example.org/s", "steps": ["a", "b"] }),
            &StaticContextLoader::empty(),
        )
        .unwrap();
        assert_eq!(
            expanded[0]["http://example.org/steps"],
            json!([{ "@list": [{ "@value": "a" }, { "@value": "b" }] }])
        );
    }

    #[test]
    fn unmapped_relative_properties_are_dropped() {
        let expanded = expand(
            &json!({ "@id": "http://example.org/s", "notMapped": "x", "http://example.org/p": "y" }),
            &StaticContextLoader::empty(),
        )
        .unwrap();
        let node = expanded[0].as_object().unwrap();
        assert!(node.contains_key("http://example.org/p"));
        assert_eq!(node.len(), 2);
    }

    #[test]
    fn unknown_remote_context_is_an_error() {
        let err = expand(
            &json!({ "@context": "https://example.org/missing.json", "@id": "http://x/" }),
            &StaticContextLoader::bundled(),
        )
        .unwrap_err();
        assert!(err.contains("missing.json"));
    }
}
