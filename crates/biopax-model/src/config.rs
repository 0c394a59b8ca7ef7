//! Conversion configuration: the static lookup tables the pipeline consults.
//!
//! Tables are plain data handed to the stages that need them. A JSON file may
//! override any subset of fields; missing fields keep the built-in defaults.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const DEFAULT_PATHWAY_IRI_PREFIX: &str = "http://identifiers.org/wikipathways/";
pub const DEFAULT_PREREQUISITES_CONTEXT: &str =
    "https://wikipathwayscontexts.firebaseio.com/owlPrerequisites.json";
pub const TAXONOMY_IRI_PREFIX: &str = "http://identifiers.org/taxonomy/";

const ORGANISMS: &[(&str, &str)] = &[
    ("Anopheles gambiae", "7165"),
    ("Arabidopsis thaliana", "3702"),
    ("Bacillus subtilis", "1423"),
    ("Bos taurus", "9913"),
    ("Caenorhabditis elegans", "6239"),
    ("Canis familiaris", "9615"),
    ("Danio rerio", "7955"),
    ("Drosophila melanogaster", "7227"),
    ("Escherichia coli", "562"),
    ("Equus caballus", "9796"),
    ("Gallus gallus", "9031"),
    ("Gibberella zeae", "5518"),
    ("Homo sapiens", "9606"),
    ("Hordeum vulgare", "4513"),
    ("Mus musculus", "10090"),
    ("Mycobacterium tuberculosis", "1773"),
    ("Oryza sativa", "4530"),
    ("Pan troglodytes", "9598"),
    ("Rattus norvegicus", "10116"),
    ("Saccharomyces cerevisiae", "4932"),
    ("Solanum lycopersicum", "4081"),
    ("Sus scrofa", "9823"),
    ("Zea mays", "4577"),
];

/// GPML DataNode types that have a direct BioPAX counterpart.
const VENDOR_TYPE_MAPPINGS: &[(&str, &str)] = &[
    ("GeneProduct", "Protein"),
    ("Metabolite", "SmallMolecule"),
    ("Unknown", "PhysicalEntity"),
    ("Group", "Complex"),
    ("Protein", "Protein"),
    ("Rna", "Rna"),
    ("Complex", "Complex"),
    ("Pathway", "Pathway"),
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConversionConfig {
    /// Organism name → taxonomy IRI.
    pub organisms: BTreeMap<String, String>,
    /// Vendor (diagram) type → BioPAX type, applied by the assembler.
    pub vendor_type_mappings: BTreeMap<String, String>,
    /// Context URL prepended to the document's `@context`.
    pub prerequisites_context: String,
    /// Pathway IRIs are `<prefix><identifier>`.
    pub pathway_iri_prefix: String,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            organisms: ORGANISMS
                .iter()
                .map(|(name, taxon)| (name.to_string(), format!("{TAXONOMY_IRI_PREFIX}{taxon}")))
                .collect(),
            vendor_type_mappings: VENDOR_TYPE_MAPPINGS
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            prerequisites_context: DEFAULT_PREREQUISITES_CONTEXT.to_string(),
            pathway_iri_prefix: DEFAULT_PATHWAY_IRI_PREFIX.to_string(),
        }
    }
}

impl ConversionConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn organism_iri(&self, organism: &str) -> Option<&str> {
        self.organisms.get(organism).map(String::as_str)
    }

    pub fn pathway_iri(&self, identifier: &str) -> String {
        format!("{}{identifier}", self.pathway_iri_prefix)
    }

    pub fn map_vendor_type<'a>(&'a self, t: &'a str) -> &'a str {
        self.vendor_type_mappings
            .get(t)
            .map(String::as_str)
            .unwrap_or(t)
    }
}

/// Taxonomy id from a taxonomy IRI: `http://identifiers.org/taxonomy/9606` → `9606`.
pub fn taxonomy_id(iri: &str) -> &str {
    iri.strip_prefix(TAXONOMY_IRI_PREFIX)
        .unwrap_or_else(|| iri.rsplit('/').next().unwrap_or(iri))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_covers_reference_organisms() {
        let config = ConversionConfig::default();
        assert_eq!(config.organisms.len(), 23);
        assert_eq!(
            config.organism_iri("Homo sapiens"),
            Some("http://identifiers.org/taxonomy/9606")
        );
        assert_eq!(config.organism_iri("Homo sapien"), None);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ConversionConfig::from_json_str(
            r#"{ "organisms": { "Felis catus": "http://identifiers.org/taxonomy/9685" } }"#,
        )
        .unwrap();
        assert_eq!(config.organisms.len(), 1);
        assert_eq!(config.prerequisites_context, DEFAULT_PREREQUISITES_CONTEXT);
        assert_eq!(config.map_vendor_type("GeneProduct"), "Protein");
    }

    #[test]
    fn vendor_mapping_passes_unknown_types_through() {
        let config = ConversionConfig::default();
        assert_eq!(config.map_vendor_type("Metabolite"), "SmallMolecule");
        assert_eq!(config.map_vendor_type("Catalysis"), "Catalysis");
    }

    #[test]
    fn taxonomy_id_strips_prefix() {
        assert_eq!(taxonomy_id("http://identifiers.org/taxonomy/10090"), "10090");
        assert_eq!(taxonomy_id("https://other.org/taxon/42"), "42");
    }
}
