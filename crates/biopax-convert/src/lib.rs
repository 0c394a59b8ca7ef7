//! pvjson → BioPAX Level 3 conversion.
//!
//! A pathway diagram graph goes through a fixed sequence of rewriting
//! stages, each taking the graph by value and handing back a new one:
//!
//! ```text
//!   metadata → normalize types → promote labels/shapes → prune attributes
//!     → flatten containment → clean xrefs → resolve references (async)
//!     → repair genetic interactions → synthesize organism → assemble
//!     → serialize (biopax-rdf)
//! ```
//!
//! Only reference resolution is concurrent: one task per lookup, joined
//! before the next stage runs. Fatal problems are [`ConversionError`]s;
//! data-quality problems in the diagram are logged with `tracing` and
//! worked around.
//!
//! ```no_run
//! use biopax_convert::{pvjson2biopax, Converter};
//! use biopax_model::{PathwayMetadata, PvjsonGraph};
//!
//! # async fn run(text: &str) -> Result<(), Box<dyn std::error::Error>> {
//! let graph = PvjsonGraph::from_json_str(text)?;
//! let xml = pvjson2biopax(&PathwayMetadata::new("WP554"), graph, &Converter::default()).await?;
//! println!("{xml}");
//! # Ok(())
//! # }
//! ```

pub mod assemble;
pub mod enrich;
pub mod error;
pub mod flatten;
pub mod genetic;
pub mod lookup;
pub mod metadata;
pub mod normalize;
pub mod organism;
pub mod pipeline;
pub mod promote;
pub mod prune;
pub mod xrefs;

pub use error::{ConversionError, ConversionResult, Stage};
pub use lookup::{HintXrefResolver, LookupError, ResolvedReference, StaticXrefResolver, XrefResolver};
pub use pipeline::{build_document, pvjson2biopax, Converter};
