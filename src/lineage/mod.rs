//! Lineage module: the assembled graph and the queries run against it.
//!
//! # Module Organization
//!
//! - [`graph`]: node/edge structures, search and bounded subgraph extraction
//! - [`verify`]: fingerprint checks of artifact files
//! - [`render`]: Graphviz DOT/PNG output
//! - `engine`: [`LineageEngine`], which builds the graph from a root and fronts the queries
//!
//! ```rust,no_run
//! use metafield::{config::LineageConfig, lineage::LineageEngine};
//!
//! # fn main() -> Result<(), metafield::MetafieldError> {
//! let engine = LineageEngine::new(LineageConfig::new("./analysis"))?;
//! for record in engine.verify("train", None)? {
//!     println!("{} {}", record.status, record.path);
//! }
//! # Ok(())
//! # }
//! ```

mod engine;
pub mod graph;
pub mod render;
pub mod verify;


pub use engine::LineageEngine;
pub use graph::{LineageGraph, LineageNode, LineageSnapshot, NodeKind};
pub use render::RenderFormat;
pub use verify::{VerifyRecord, VerifyStatus};
