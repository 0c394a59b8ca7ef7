//! pvjson element graph model and BioPAX Level 3 vocabulary
//!
//! This crate defines the shared in-memory representation every conversion
//! stage reads and returns, plus the immutable tables those stages consult:
//!
//! - [`element`]: `Element`, `TypeTag`, `PvjsonGraph`, `PathwayMetadata`
//! - [`vocab`]: the closed BioPAX type sets (priority-ordered)
//! - [`digest`]: deterministic ids for xref/reference nodes
//! - [`config`]: organism and vendor-type tables (`ConversionConfig`)

pub mod config;
pub mod digest;
pub mod element;
pub mod vocab;

pub use config::{ConfigError, ConversionConfig};
pub use element::{Element, LookupRequest, PathwayMetadata, PvjsonGraph, TypeTag};
