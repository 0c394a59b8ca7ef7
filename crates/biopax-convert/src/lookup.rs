//! Cross-reference lookup interface
//!
//! Abstraction over external reference services (BridgeDb, mygene.info, …).
//! The converter never talks to the network itself; callers inject an
//! [`XrefResolver`]. Two offline resolvers ship with the crate.

use async_trait::async_trait;
use biopax_model::vocab::entity_type_for_reference;
use biopax_model::LookupRequest;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// What a reference service knows about one external record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedReference {
    pub db: String,
    pub identifier: String,
    /// Types the service reports for the record, e.g. `["ProteinReference"]`
    /// or `["gpml:GeneProduct", "biopax:ProteinReference"]`.
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum LookupError {
    #[error("no record for {db}:{identifier}")]
    NotFound { db: String, identifier: String },
    #[error("reference service error: {0}")]
    Service(String),
}

impl LookupError {
    fn not_found(request: &LookupRequest) -> Self {
        LookupError::NotFound {
            db: request.db.clone(),
            identifier: request.identifier.clone(),
        }
    }
}

/// Resolves a staged lookup to reference data.
///
/// Implementations own retries and timeouts; the converter calls each
/// request once and treats any error as fatal.
#[async_trait]
pub trait XrefResolver: Send + Sync {
    async fn resolve(&self, request: &LookupRequest) -> Result<ResolvedReference, LookupError>;
}

/// In-memory table keyed by `(db, identifier)`.
#[derive(Debug, Clone, Default)]
pub struct StaticXrefResolver {
    records: HashMap<(String, String), ResolvedReference>,
}

#[derive(Debug, thiserror::Error)]
pub enum XrefTableError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid xref table: {0}")]
    Parse(#[from] serde_json::Error),
}

impl StaticXrefResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(mut self, record: ResolvedReference) -> Self {
        self.insert(record);
        self
    }

    pub fn insert(&mut self, record: ResolvedReference) {
        self.records
            .insert((record.db.clone(), record.identifier.clone()), record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Load a JSON array of [`ResolvedReference`] records.
    pub fn from_json_str(text: &str) -> Result<Self, XrefTableError> {
        let records: Vec<ResolvedReference> = serde_json::from_str(text)?;
        let mut resolver = Self::new();
        for record in records {
            resolver.insert(record);
        }
        Ok(resolver)
    }

    pub fn from_path(path: &Path) -> Result<Self, XrefTableError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

#[async_trait]
impl XrefResolver for StaticXrefResolver {
    async fn resolve(&self, request: &LookupRequest) -> Result<ResolvedReference, LookupError> {
        self.records
            .get(&(request.db.clone(), request.identifier.clone()))
            .cloned()
            .ok_or_else(|| LookupError::not_found(request))
    }
}

/// Offline resolver that trusts the element's own type.
///
/// A `Protein` asking for `(Ensembl, ENSG001)` resolves to a
/// `ProteinReference` for that record. Types with no reference counterpart
/// are reported as not found.
#[derive(Debug, Clone, Copy, Default)]
pub struct HintXrefResolver;

#[async_trait]
impl XrefResolver for HintXrefResolver {
    async fn resolve(&self, request: &LookupRequest) -> Result<ResolvedReference, LookupError> {
        let reference_type = request
            .type_hint
            .as_deref()
            .map(|hint| format!("{hint}Reference"))
            .filter(|t| entity_type_for_reference(t).is_some())
            .ok_or_else(|| LookupError::not_found(request))?;
        Ok(ResolvedReference {
            db: request.db.clone(),
            identifier: request.identifier.clone(),
            types: vec![reference_type],
            display_name: None,
        })
    }
}
