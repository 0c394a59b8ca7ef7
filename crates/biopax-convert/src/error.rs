//! Fatal conversion errors.
//!
//! Data-quality problems (dangling ids, type corrections) are logged and
//! never surface here. Everything in [`ConversionError`] aborts the run and
//! names the stage it came from.

use crate::lookup::LookupError;
use biopax_rdf::RdfError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Metadata,
    NormalizeTypes,
    PruneAttributes,
    PromoteAmbiguous,
    FlattenContainment,
    CleanXrefs,
    ResolveReferences,
    RepairGeneticInteractions,
    SynthesizeOrganism,
    Assemble,
    Serialize,
}

impl Stage {
    pub const fn name(self) -> &'static str {
        match self {
            Stage::Metadata => "metadata",
            Stage::NormalizeTypes => "normalize-types",
            Stage::PruneAttributes => "prune-attributes",
            Stage::PromoteAmbiguous => "promote-ambiguous",
            Stage::FlattenContainment => "flatten-containment",
            Stage::CleanXrefs => "clean-xrefs",
            Stage::ResolveReferences => "resolve-references",
            Stage::RepairGeneticInteractions => "repair-genetic-interactions",
            Stage::SynthesizeOrganism => "synthesize-organism",
            Stage::Assemble => "assemble",
            Stage::Serialize => "serialize",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("[resolve-references] reference lookup failed for element {element_id}: {source}")]
    Resolution {
        element_id: String,
        #[source]
        source: LookupError,
    },
    #[error("[resolve-references] lookup for element {element_id} reported no BioPAX reference type (got {reported:?})")]
    UnresolvedReferenceType {
        element_id: String,
        reported: Vec<String>,
    },
    #[error("[resolve-references] reference lookup task failed: {0}")]
    TaskJoin(String),
    #[error("[synthesize-organism] organism {organism:?} not found in taxonomy table")]
    OrganismNotFound { organism: Option<String> },
    #[error("[serialize] {0}")]
    Serialization(#[from] RdfError),
}

impl ConversionError {
    /// The pipeline stage the error originated in.
    pub fn stage(&self) -> Stage {
        match self {
            ConversionError::Resolution { .. }
            | ConversionError::UnresolvedReferenceType { .. }
            | ConversionError::TaskJoin(_) => Stage::ResolveReferences,
            ConversionError::OrganismNotFound { .. } => Stage::SynthesizeOrganism,
            ConversionError::Serialization(_) => Stage::Serialize,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ConversionError::OrganismNotFound { .. })
    }
}

pub type ConversionResult<T> = Result<T, ConversionError>;
