//! Reference enrichment: resolve staged lookups into EntityReference and
//! UnificationXref nodes.
//!
//! Every lookup runs as its own tokio task. The stage waits for all of them
//! before touching the graph, so results are applied in element order no
//! matter which task finished first. The first failed lookup ends the stage.

use crate::error::{ConversionError, ConversionResult};
use crate::lookup::{ResolvedReference, XrefResolver};
use biopax_model::digest::{record_node_id, unification_xref_id};
use biopax_model::element::{STAGING_DB_ATTRIBUTE, STAGING_IDENTIFIER_ATTRIBUTE};
use biopax_model::vocab::{entity_type_for_reference, strip_prefix, REFERENCE_TYPES};
use biopax_model::{Element, LookupRequest, PvjsonGraph};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinSet;

/// First reference type (in vocabulary order) among the reported types.
pub fn reference_type(reported: &[String]) -> Option<&'static str> {
    let stripped: Vec<&str> = reported.iter().map(|t| strip_prefix(t)).collect();
    REFERENCE_TYPES.iter().copied().find(|t| stripped.contains(t))
}

fn has_reference_type(entity_type: &str) -> bool {
    REFERENCE_TYPES
        .iter()
        .any(|r| entity_type_for_reference(r) == Some(entity_type))
}

/// The lookup to run for an element, if any.
///
/// An explicit `lookup` always counts. Staging attributes only count on
/// entity types that have a reference counterpart.
pub fn pending_lookup(element: &Element) -> Option<LookupRequest> {
    if element.lookup.is_none() && !element.element_type().is_some_and(has_reference_type) {
        return None;
    }
    element.lookup_request()
}

pub async fn resolve_references(
    mut graph: PvjsonGraph,
    resolver: Arc<dyn XrefResolver>,
) -> ConversionResult<PvjsonGraph> {
    let mut tasks = JoinSet::new();
    for (index, element) in graph.elements.iter().enumerate() {
        let Some(request) = pending_lookup(element) else {
            continue;
        };
        let resolver = Arc::clone(&resolver);
        tasks.spawn(async move { (index, resolver.resolve(&request).await) });
    }
    if tasks.is_empty() {
        return Ok(graph);
    }
    tracing::debug!(lookups = tasks.len(), "resolving references");

    // Returning early drops the set, which aborts lookups still in flight.
    let mut resolved: Vec<(usize, ResolvedReference)> = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        let (index, outcome) = joined.map_err(|e| ConversionError::TaskJoin(e.to_string()))?;
        let reference = outcome.map_err(|source| ConversionError::Resolution {
            element_id: graph.elements[index].id.clone(),
            source,
        })?;
        resolved.push((index, reference));
    }
    resolved.sort_by_key(|(index, _)| *index);

    let mut known: HashSet<String> = graph.elements.iter().map(|e| e.id.clone()).collect();
    let mut emitted = Vec::new();
    for (index, reference) in resolved {
        let element = &mut graph.elements[index];
        let Some(ref_type) = reference_type(&reference.types) else {
            return Err(ConversionError::UnresolvedReferenceType {
                element_id: element.id.clone(),
                reported: reference.types,
            });
        };
        let entity_type = entity_type_for_reference(ref_type).unwrap_or("PhysicalEntity");
        if element.element_type() != Some(entity_type) {
            tracing::warn!(
                element_id = %element.id,
                from = element.element_type().unwrap_or("<none>"),
                to = entity_type,
                "retyping element to match its resolved reference"
            );
            element.set_type(entity_type);
        }

        let xref_id = unification_xref_id(&reference.db, &reference.identifier);
        let reference_id = record_node_id(ref_type, &reference.db, &reference.identifier);

        if known.insert(xref_id.clone()) {
            emitted.push(
                Element::new(xref_id.clone())
                    .with_type("UnificationXref")
                    .with_attribute("db", reference.db.clone())
                    .with_attribute("identifier", reference.identifier.clone()),
            );
        }
        if known.insert(reference_id.clone()) {
            let mut node = Element::new(reference_id.clone()).with_type(ref_type);
            node.xref = vec![xref_id];
            if let Some(name) = &reference.display_name {
                node = node.with_attribute("displayName", name.clone());
            }
            emitted.push(node);
        }

        element.lookup = None;
        element.attributes.remove(STAGING_DB_ATTRIBUTE);
        element.attributes.remove(STAGING_IDENTIFIER_ATTRIBUTE);
        element.entity_reference = Some(reference_id);
    }

    tracing::debug!(nodes = emitted.len(), "emitted reference and xref nodes");
    graph.elements.extend(emitted);
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::{LookupError, StaticXrefResolver};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use tokio::sync::Barrier;

    fn record(db: &str, identifier: &str, types: &[&str]) -> ResolvedReference {
        ResolvedReference {
            db: db.to_string(),
            identifier: identifier.to_string(),
            types: types.iter().map(|t| t.to_string()).collect(),
            display_name: None,
        }
    }

    struct FailingResolver;

    #[async_trait]
    impl XrefResolver for FailingResolver {
        async fn resolve(&self, request: &LookupRequest) -> Result<ResolvedReference, LookupError> {
            if request.identifier == "bad" {
                return Err(LookupError::Service("timeout".into()));
            }
            Ok(record(&request.db, &request.identifier, &["ProteinReference"]))
        }
    }

    /// Every lookup waits until all of them have started.
    struct RendezvousResolver {
        barrier: Barrier,
    }

    #[async_trait]
    impl XrefResolver for RendezvousResolver {
        async fn resolve(&self, request: &LookupRequest) -> Result<ResolvedReference, LookupError> {
            self.barrier.wait().await;
            Ok(record(&request.db, &request.identifier, &["ProteinReference"]))
        }
    }

    /// Sets its flag when dropped.
    struct DropFlag(Arc<AtomicBool>);

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    /// `slow` never answers; `bad` fails right away.
    struct StalledResolver {
        slow_dropped: Arc<AtomicBool>,
    }

    #[async_trait]
    impl XrefResolver for StalledResolver {
        async fn resolve(&self, request: &LookupRequest) -> Result<ResolvedReference, LookupError> {
            if request.identifier == "bad" {
                return Err(LookupError::Service("unavailable".into()));
            }
            let _guard = DropFlag(Arc::clone(&self.slow_dropped));
            std::future::pending::<()>().await;
            unreachable!()
        }
    }

    #[test]
    fn reference_type_follows_vocabulary_order() {
        let reported: Vec<String> = vec!["gpml:GeneProduct".into(), "biopax:GeneReference".into(), "ProteinReference".into()];
        assert_eq!(reference_type(&reported), Some("ProteinReference"));
        assert_eq!(reference_type(&["Protein".to_string()]), None);
    }

    #[tokio::test]
    async fn same_record_collapses_to_one_xref() {
        let resolver = StaticXrefResolver::new().with_record(record("Ensembl", "ENSG001", &["ProteinReference"]));
        let graph = PvjsonGraph::new(vec![
            Element::new("a").with_type("Protein").with_lookup("Ensembl", "ENSG001"),
            Element::new("b").with_type("Protein").with_lookup("Ensembl", "ENSG001"),
        ]);
        let graph = resolve_references(graph, Arc::new(resolver)).await.unwrap();

        let xrefs: Vec<&Element> = graph.elements.iter().filter(|e| e.has_type("UnificationXref")).collect();
        let references: Vec<&Element> = graph.elements.iter().filter(|e| e.has_type("ProteinReference")).collect();
        assert_eq!(xrefs.len(), 1);
        assert_eq!(references.len(), 1);
        assert_eq!(references[0].xref, vec![xrefs[0].id.clone()]);
        assert_eq!(graph.elements[0].entity_reference, graph.elements[1].entity_reference);
        assert_eq!(graph.elements[0].entity_reference.as_deref(), Some(references[0].id.as_str()));
        assert!(graph.elements[0].lookup.is_none());
    }

    #[tokio::test]
    async fn retypes_element_to_match_reference() {
        let mut reported = record("Entrez Gene", "7157", &["GeneReference"]);
        reported.display_name = Some("TP53".into());
        let resolver = StaticXrefResolver::new().with_record(reported);
        let graph = PvjsonGraph::new(vec![Element::new("a")
            .with_type("Protein")
            .with_attribute("database", "Entrez Gene")
            .with_attribute("identifier", "7157")]);
        let graph = resolve_references(graph, Arc::new(resolver)).await.unwrap();

        let element = &graph.elements[0];
        assert_eq!(element.element_type(), Some("Gene"));
        assert!(!element.attributes.contains_key("database"));
        assert!(!element.attributes.contains_key("identifier"));
        let reference = graph.element(element.entity_reference.as_deref().unwrap()).unwrap();
        assert_eq!(reference.element_type(), Some("GeneReference"));
        assert_eq!(reference.display_name(), Some("TP53"));
    }

    #[tokio::test]
    async fn staging_attributes_on_containers_are_not_lookups() {
        let graph = PvjsonGraph::new(vec![Element::new("pw")
            .with_type("Pathway")
            .with_attribute("database", "WikiPathways")
            .with_attribute("identifier", "WP2")]);
        let resolved = resolve_references(graph.clone(), Arc::new(StaticXrefResolver::new()))
            .await
            .unwrap();
        assert_eq!(resolved, graph);
    }

    #[tokio::test]
    async fn unknown_reference_type_is_fatal() {
        let resolver = StaticXrefResolver::new().with_record(record("ChEBI", "15377", &["SmallMolecule"]));
        let graph = PvjsonGraph::new(vec![Element::new("w").with_type("SmallMolecule").with_lookup("ChEBI", "15377")]);
        let err = resolve_references(graph, Arc::new(resolver)).await.unwrap_err();
        assert!(matches!(
            err,
            ConversionError::UnresolvedReferenceType { ref element_id, .. } if element_id == "w"
        ));
    }

    #[tokio::test]
    async fn one_failed_lookup_fails_the_stage() {
        let graph = PvjsonGraph::new(vec![
            Element::new("ok").with_type("Protein").with_lookup("UniProt", "P1"),
            Element::new("broken").with_type("Protein").with_lookup("UniProt", "bad"),
        ]);
        let err = resolve_references(graph, Arc::new(FailingResolver)).await.unwrap_err();
        match err {
            ConversionError::Resolution { element_id, source } => {
                assert_eq!(element_id, "broken");
                assert!(matches!(source, LookupError::Service(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn lookups_run_concurrently() {
        const LOOKUPS: usize = 4;
        let elements = (0..LOOKUPS)
            .map(|i| {
                Element::new(format!("p{i}"))
                    .with_type("Protein")
                    .with_lookup("UniProt", format!("P{i}"))
            })
            .collect();
        let resolver = RendezvousResolver {
            barrier: Barrier::new(LOOKUPS),
        };

        let graph = tokio::time::timeout(
            Duration::from_secs(5),
            resolve_references(PvjsonGraph::new(elements), Arc::new(resolver)),
        )
        .await
        .expect("lookups were not in flight together")
        .unwrap();

        let references = graph.elements.iter().filter(|e| e.has_type("ProteinReference")).count();
        assert_eq!(references, LOOKUPS);
    }

    #[tokio::test]
    async fn first_failure_aborts_lookups_in_flight() {
        let slow_dropped = Arc::new(AtomicBool::new(false));
        let resolver = StalledResolver {
            slow_dropped: Arc::clone(&slow_dropped),
        };
        let graph = PvjsonGraph::new(vec![
            Element::new("stuck").with_type("Protein").with_lookup("UniProt", "slow"),
            Element::new("broken").with_type("Protein").with_lookup("UniProt", "bad"),
        ]);

        let err = tokio::time::timeout(Duration::from_secs(5), resolve_references(graph, Arc::new(resolver)))
            .await
            .expect("stage waited on a lookup that never completes")
            .unwrap_err();
        assert!(matches!(
            err,
            ConversionError::Resolution { ref element_id, .. } if element_id == "broken"
        ));

        tokio::time::timeout(Duration::from_secs(5), async {
            while !slow_dropped.load(Ordering::SeqCst) {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("pending lookup was not aborted");
    }
}
