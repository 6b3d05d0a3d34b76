//! Turning notebooks on disk into lineage.
//!
//! ## Key Components
//!
//! - [`NotebookCompiler`] - walks a root directory and feeds every notebook to the builder
//! - [`notebook::Notebook`] - the cell/metadata/output slice of the `.ipynb` format
//! - [`selector`] - finds the cells recording inputs (`indata`) and outputs (`outdata`),
//!   by tag or by markdown section
//! - [`reference`] - parses `hash  path` listings into [`Reference`]s
//! - [`GraphBuilder`] - inserts one notebook's references into the shared graph
//!
//! ## Recording lineage in a notebook
//!
//! A notebook declares its data by printing `sha1sum`-style listings from a cell that is
//! either tagged or sits under a matching heading:
//!
//! ```text
//! ## Data                      <- markdown heading containing "data"
//! !sha1sum ../raw/*.csv        <- code cell; its stream output is read
//! 3f786850e387550fdab836ed7e6dc881de23001b  ../raw/sales.csv
//! ```
//!
//! Lines without a 40-character hex token are ignored.

pub mod builder;
pub mod compiler;
pub mod notebook;
pub mod reference;
pub mod selector;

pub use builder::{GraphBuilder, NotebookSummary};
pub use compiler::{CompileStats, NotebookCompiler};
pub use notebook::{Cell, CellOutput, Notebook};
pub use reference::{parse_references, Fingerprint, Reference};
pub use selector::{select, SelectedBy, Selection};
