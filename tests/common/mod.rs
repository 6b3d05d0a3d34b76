//! Shared test utilities for integration tests.
//!
//! Import from integration test files as:
//! ```ignore
//! mod common;
//! ```

use metafield::codec::notebook::{Cell, CellOutput, Notebook};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Initialize tracing for tests, respecting RUST_LOG env var.
///
/// Safe to call multiple times: subsequent calls are no-ops.
#[allow(dead_code)]
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

#[allow(dead_code)]
pub fn fp(fill: char) -> String {
    fill.to_string().repeat(40)
}

/// A code cell tagged `tag` whose stdout is `text`.
#[allow(dead_code)]
pub fn tagged_cell(tag: &str, text: &str) -> Cell {
    Cell::code(vec![CellOutput::stream(text)]).with_tag(tag)
}

/// Serialize `notebook` as nbformat-4 JSON at `root/relative`.
#[allow(dead_code)]
pub fn write_notebook(root: &Path, relative: &str, notebook: &Notebook) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let mut json = serde_json::to_value(notebook).unwrap();
    json["nbformat"] = 4.into();
    json["nbformat_minor"] = 5.into();
    std::fs::write(&path, serde_json::to_string_pretty(&json).unwrap()).unwrap();
    path
}

/// Two notebooks sharing one artifact: `A` writes `data/x.csv`, `B` reads it.
///
/// The artifact's recorded fingerprint is forty `a`s, which matches no real content.
#[allow(dead_code)]
pub fn create_two_notebook_root(temp_dir: &TempDir) -> PathBuf {
    let root = temp_dir.path().join("project");
    let line = format!("{}  data/x.csv\n", fp('a'));
    write_notebook(
        &root,
        "A.ipynb",
        &Notebook::new(vec![tagged_cell("outdata", &line)]),
    );
    write_notebook(
        &root,
        "B.ipynb",
        &Notebook::new(vec![tagged_cell("indata", &line)]),
    );
    root
}
