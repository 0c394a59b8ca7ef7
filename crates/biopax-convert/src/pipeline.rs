//! The conversion entry point: every stage, in order.

use crate::assemble::assemble_document;
use crate::enrich::resolve_references;
use crate::error::{ConversionResult, Stage};
use crate::flatten::flatten_containment;
use crate::genetic::repair_genetic_interactions;
use crate::lookup::{HintXrefResolver, XrefResolver};
use crate::metadata::apply_metadata;
use crate::normalize::{apply_vendor_mappings, normalize_types};
use crate::organism::synthesize_organism;
use crate::promote::promote_ambiguous;
use crate::prune::prune_attributes;
use crate::xrefs::clean_xrefs;
use biopax_model::{ConversionConfig, PathwayMetadata, PvjsonGraph};
use biopax_rdf::{serialize_document, ContextLoader, StaticContextLoader};
use serde_json::Value;
use std::sync::Arc;

/// Everything a conversion run consults besides its input.
#[derive(Clone)]
pub struct Converter {
    config: ConversionConfig,
    resolver: Arc<dyn XrefResolver>,
    loader: Arc<dyn ContextLoader>,
}

impl Converter {
    pub fn new(config: ConversionConfig, resolver: Arc<dyn XrefResolver>) -> Self {
        Self {
            config,
            resolver,
            loader: Arc::new(StaticContextLoader::bundled()),
        }
    }

    pub fn with_loader(mut self, loader: Arc<dyn ContextLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    pub fn resolver(&self) -> Arc<dyn XrefResolver> {
        Arc::clone(&self.resolver)
    }

    pub fn loader(&self) -> &dyn ContextLoader {
        self.loader.as_ref()
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(ConversionConfig::default(), Arc::new(HintXrefResolver))
    }
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn stage_done(stage: Stage, graph: &PvjsonGraph) {
    tracing::debug!(stage = %stage, elements = graph.elements.len(), "stage complete");
}

/// Run every graph stage and assemble the BioPAX JSON-LD document.
pub async fn build_document(
    metadata: &PathwayMetadata,
    graph: PvjsonGraph,
    converter: &Converter,
) -> ConversionResult<Value> {
    let config = converter.config();

    let graph = apply_metadata(graph, metadata, config);
    stage_done(Stage::Metadata, &graph);
    let graph = apply_vendor_mappings(normalize_types(graph), config);
    stage_done(Stage::NormalizeTypes, &graph);
    let graph = promote_ambiguous(graph);
    stage_done(Stage::PromoteAmbiguous, &graph);
    let graph = prune_attributes(graph);
    stage_done(Stage::PruneAttributes, &graph);
    let graph = flatten_containment(graph);
    stage_done(Stage::FlattenContainment, &graph);
    let graph = clean_xrefs(graph);
    stage_done(Stage::CleanXrefs, &graph);
    let graph = resolve_references(graph, converter.resolver()).await?;
    stage_done(Stage::ResolveReferences, &graph);
    let graph = repair_genetic_interactions(graph);
    stage_done(Stage::RepairGeneticInteractions, &graph);
    let (graph, synthesized) = synthesize_organism(graph, config)?;
    stage_done(Stage::SynthesizeOrganism, &graph);

    let document = assemble_document(graph, synthesized, config);
    tracing::debug!(stage = %Stage::Assemble, "stage complete");
    Ok(document)
}

/// Convert a pvjson graph to a BioPAX Level 3 RDF/XML document.
pub async fn pvjson2biopax(
    metadata: &PathwayMetadata,
    graph: PvjsonGraph,
    converter: &Converter,
) -> ConversionResult<String> {
    let document = build_document(metadata, graph, converter).await?;
    let xml = serialize_document(&document, converter.loader())?;
    tracing::info!(pathway = %metadata.identifier, bytes = xml.len(), "converted pathway to BioPAX");
    Ok(xml)
}
