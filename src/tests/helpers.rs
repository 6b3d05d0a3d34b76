//! Shared test utilities for lineage testing

use crate::{
    codec::{
        builder::GraphBuilder,
        notebook::{Cell, CellOutput, Notebook},
    },
    config::{INPUT_TAG, OUTPUT_TAG},
    lineage::LineageGraph,
};
use std::path::{Path, PathBuf};

/// Initialize logging for tests
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// A fingerprint made of one repeated hex digit, e.g. `fp('a')` is forty `a`s.
pub fn fp(fill: char) -> String {
    fill.to_string().repeat(40)
}

/// One `sha1sum` listing line.
pub fn listing(fill: char, path: &str) -> String {
    format!("{}  {}\n", fp(fill), path)
}

/// A notebook with an `indata` cell listing `inputs` and an `outdata` cell listing `outputs`.
/// Empty slices produce no tagged cell for that direction.
pub fn tagged_notebook(inputs: &[(char, &str)], outputs: &[(char, &str)]) -> Notebook {
    let mut cells = vec![Cell::markdown("# Analysis")];
    for (tag, refs) in [(INPUT_TAG, inputs), (OUTPUT_TAG, outputs)] {
        if refs.is_empty() {
            continue;
        }
        let text: String = refs.iter().map(|(c, p)| listing(*c, p)).collect();
        cells.push(Cell::code(vec![CellOutput::stream(text)]).with_tag(tag));
    }
    Notebook::new(cells)
}

pub fn write_notebook(root: &Path, relative: &str, notebook: &Notebook) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, serde_json::to_string_pretty(notebook).unwrap()).unwrap();
    path
}

/// Chain `raw -> prep -> clean -> train -> model -> report`, plus a side input `extra -> train`.
///
/// Artifact ids: raw = `1111111`, clean = `2222222`, model = `3333333`, extra = `4444444`.
pub fn create_pipeline_graph() -> LineageGraph {
    init_logging();
    let mut builder = GraphBuilder::new("/repo");
    builder.add_texts("prep", &[listing('1', "raw.csv")], &[listing('2', "clean.csv")]);
    builder.add_texts(
        "train",
        &[listing('2', "clean.csv") + &listing('4', "extra.csv")],
        &[listing('3', "model.pkl")],
    );
    builder.add_texts("report", &[listing('3', "model.pkl")], &[]);
    builder.into_graph()
}
