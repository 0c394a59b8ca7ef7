//! BioPAX Level 3 vocabulary: the closed type sets the pipeline targets.
//!
//! Order matters. When an element carries several candidate types, the
//! normalizer picks the first member of [`ALL_TYPES`] that is among the
//! candidates, so specific types are listed before their generic parents.

pub const BIOPAX_NS: &str = "http://www.biopax.org/release/biopax-level3.owl#";
pub const OWL_NS: &str = "http://www.w3.org/2002/07/owl#";
pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";

/// Entity, reference, xref and container types (everything that is not an
/// interaction).
pub const NODE_TYPES: &[&str] = &[
    "UnificationXref",
    "RelationshipXref",
    "PublicationXref",
    "ProteinReference",
    "SmallMoleculeReference",
    "DnaReference",
    "RnaReference",
    "GeneReference",
    "Protein",
    "SmallMolecule",
    "Dna",
    "Rna",
    "Gene",
    "Complex",
    "Pathway",
    "BioSource",
    "PhysicalEntity",
];

/// Interaction types. Elements of these types become `pathwayComponent`s.
pub const EDGE_TYPES: &[&str] = &[
    "GeneticInteraction",
    "MolecularInteraction",
    "Catalysis",
    "Modulation",
    "TemplateReactionRegulation",
    "Control",
    "BiochemicalReaction",
    "TransportWithBiochemicalReaction",
    "ComplexAssembly",
    "Transport",
    "Degradation",
    "TemplateReaction",
    "Conversion",
    "Interaction",
];

/// Types an external reference service may resolve a record to.
pub const REFERENCE_TYPES: &[&str] = &[
    "ProteinReference",
    "SmallMoleculeReference",
    "DnaReference",
    "RnaReference",
    "GeneReference",
];

/// References that carry an `organism` (BioPAX restricts it to sequence entities).
pub const ORGANISM_REFERENCE_TYPES: &[&str] = &["DnaReference", "RnaReference", "ProteinReference"];

/// Diagram-only element types that survive only when something points at them.
pub const PRESENTATION_TYPES: &[&str] = &["Label", "Shape"];

/// Node types followed by edge types, in priority order.
pub fn all_types() -> impl Iterator<Item = &'static str> {
    NODE_TYPES.iter().chain(EDGE_TYPES.iter()).copied()
}

pub fn is_biopax_type(t: &str) -> bool {
    NODE_TYPES.contains(&t) || EDGE_TYPES.contains(&t)
}

pub fn is_edge_type(t: &str) -> bool {
    EDGE_TYPES.contains(&t)
}

pub fn is_reference_type(t: &str) -> bool {
    REFERENCE_TYPES.contains(&t)
}

pub fn is_presentation_type(t: &str) -> bool {
    PRESENTATION_TYPES.contains(&t)
}

/// `ProteinReference` → `Protein`, `GeneReference` → `Gene`, …
pub fn entity_type_for_reference(reference_type: &str) -> Option<&'static str> {
    match reference_type {
        "ProteinReference" => Some("Protein"),
        "SmallMoleculeReference" => Some("SmallMolecule"),
        "DnaReference" => Some("Dna"),
        "RnaReference" => Some("Rna"),
        "GeneReference" => Some("Gene"),
        _ => None,
    }
}

/// Drop a vendor namespace prefix: `gpml:Label` → `Label`.
///
/// Absolute IRIs are reduced to their local name as well, so
/// `http://www.biopax.org/release/biopax-level3.owl#Protein` → `Protein`.
pub fn strip_prefix(t: &str) -> &str {
    if let Some(pos) = t.rfind('#') {
        return &t[pos + 1..];
    }
    if t.contains("://") {
        return t.rsplit('/').next().unwrap_or(t);
    }
    match t.split_once(':') {
        Some((_, local)) => local,
        None => t,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_and_edge_sets_are_disjoint() {
        for t in NODE_TYPES {
            assert!(!EDGE_TYPES.contains(t), "{t} is in both sets");
        }
    }

    #[test]
    fn every_reference_type_maps_to_an_entity_type() {
        for t in REFERENCE_TYPES {
            let entity = entity_type_for_reference(t).unwrap();
            assert!(is_biopax_type(entity));
            assert!(!is_reference_type(entity));
        }
    }

    #[test]
    fn strip_prefix_handles_curies_and_iris() {
        assert_eq!(strip_prefix("gpml:Label"), "Label");
        assert_eq!(strip_prefix("biopax:Protein"), "Protein");
        assert_eq!(strip_prefix("Protein"), "Protein");
        assert_eq!(strip_prefix(&format!("{BIOPAX_NS}Complex")), "Complex");
        assert_eq!(
            strip_prefix("http://vocabularies.wikipathways.org/gpml#GeneProduct"),
            "GeneProduct"
        );
        assert_eq!(strip_prefix("http://example.org/types/Rna"), "Rna");
    }

    #[test]
    fn specific_types_precede_generic_parents() {
        let order: Vec<_> = all_types().collect();
        let pos = |t: &str| order.iter().position(|x| *x == t).unwrap();
        assert!(pos("Protein") < pos("PhysicalEntity"));
        assert!(pos("Catalysis") < pos("Control"));
        assert!(pos("Control") < pos("Interaction"));
        assert!(pos("BiochemicalReaction") < pos("Conversion"));
    }
}
