//! Performance benchmarks for lineage graph construction and queries
//!
//! A synthetic corpus of chained notebooks is written to a temp directory:
//! notebook `stage_i` reads the artifact produced by `stage_{i-1}` and writes its own.
//!
//! Run with: cargo bench

use criterion::{criterion_group, criterion_main, Criterion};
use metafield::{codec::Fingerprint, config::LineageConfig, lineage::LineageEngine};
use serde_json::json;
use std::path::PathBuf;
use tempfile::TempDir;

const STAGES: usize = 200;

fn listing(stage: usize) -> String {
    let fingerprint = Fingerprint::of_bytes(format!("artifact {stage}").as_bytes());
    format!("{fingerprint}  ../data/stage_{stage}.parquet\n")
}

fn tagged_cell(tag: &str, text: String) -> serde_json::Value {
    json!({
        "cell_type": "code",
        "metadata": { "tags": [tag] },
        "source": [],
        "outputs": [{ "output_type": "stream", "name": "stdout", "text": [text] }]
    })
}

fn setup_chain() -> Result<(TempDir, PathBuf), Box<dyn std::error::Error>> {
    let tempdir = TempDir::new()?;
    let root = tempdir.path().to_path_buf();
    std::fs::create_dir_all(root.join("notebooks"))?;

    for stage in 0..STAGES {
        let mut cells = vec![json!({
            "cell_type": "markdown",
            "metadata": {},
            "source": [format!("# Stage {stage}")]
        })];
        if stage > 0 {
            cells.push(tagged_cell("indata", listing(stage - 1)));
        }
        cells.push(tagged_cell("outdata", listing(stage)));
        let notebook = json!({ "cells": cells, "metadata": {}, "nbformat": 4, "nbformat_minor": 5 });
        std::fs::write(
            root.join(format!("notebooks/stage_{stage}.ipynb")),
            serde_json::to_string(&notebook)?,
        )?;
    }
    Ok((tempdir, root))
}

// Benchmark: discovery, parsing and graph assembly
fn bench_build_graph(c: &mut Criterion) {
    let (_tempdir, root) = setup_chain().unwrap();

    c.bench_function("build_lineage_graph", |b| {
        b.iter(|| {
            let engine = LineageEngine::new(LineageConfig::new(&root)).unwrap();
            engine.graph().node_count()
        });
    });
}

// Benchmark: bounded and unbounded subgraph extraction from the middle of the chain
fn bench_subgraph_queries(c: &mut Criterion) {
    let (_tempdir, root) = setup_chain().unwrap();
    let engine = LineageEngine::new(LineageConfig::new(&root)).unwrap();
    let target = format!("stage_{}", STAGES / 2);

    c.bench_function("subgraph_depth_4", |b| {
        b.iter(|| engine.subgraph(&target, Some(4)).unwrap().edge_count());
    });

    c.bench_function("subgraph_unbounded", |b| {
        b.iter(|| engine.subgraph(&target, None).unwrap().edge_count());
    });

    c.bench_function("search_all", |b| {
        b.iter(|| engine.search("stage", false).len());
    });
}

criterion_group!(benches, bench_build_graph, bench_subgraph_queries);
criterion_main!(benches);
