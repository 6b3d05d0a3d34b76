//! # metafield
//!
//! Data lineage for notebook collections.
//!
//! ## Overview
//!
//! Notebooks record the data they read and write by printing `sha1sum`-style listings
//! (`<40-hex fingerprint>  <path>`) from designated cells. metafield scans every notebook
//! under a root directory, pulls those listings out, and assembles a directed graph:
//!
//! - **artifact -> notebook** when the notebook reads the artifact,
//! - **notebook -> artifact** when the notebook writes it.
//!
//! Artifacts are keyed by the first seven characters of their fingerprint; notebooks by
//! their file stem.
//!
//! ## Architecture
//!
//! - **[`codec`]**: notebook discovery and reading, data-cell selection, reference parsing,
//!   graph building
//! - **[`lineage`]**: the graph, bounded subgraph queries, fingerprint verification,
//!   Graphviz rendering, and the [`lineage::LineageEngine`] front end
//! - **[`history`]**: co-change "friends" from git history
//! - **[`config`]**: [`config::LineageConfig`], loadable from TOML
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use metafield::{config::LineageConfig, lineage::{LineageEngine, VerifyStatus}};
//!
//! fn main() -> Result<(), metafield::MetafieldError> {
//!     let engine = LineageEngine::new(LineageConfig::new("./analysis"))?;
//!
//!     // Everything within two hops of the notebook `train`
//!     let sub = engine.subgraph("train", Some(2))?;
//!     println!("{sub}");
//!
//!     // Which of those artifacts drifted since they were recorded?
//!     for record in engine.verify("train", Some(2))? {
//!         if record.status != VerifyStatus::Ok {
//!             println!("{} {}", record.status, record.path);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **default**: library only
//! - **bin**: the `metafield` command line tool

pub mod codec;
pub mod config;
pub mod error;
pub mod history;
pub mod lineage;
#[cfg(test)]
mod tests;

pub use error::*;
