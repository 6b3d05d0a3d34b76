use std::path::PathBuf;

use crate::{
    codec::compiler::NotebookCompiler,
    config::LineageConfig,
    error::MetafieldError,
    lineage::{
        graph::LineageGraph,
        render::{render, RenderFormat},
        verify::{verify_graph, VerifyRecord},
    },
};

/// Query front end over a lineage graph built once from every notebook under a root.
///
/// Construction scans eagerly; afterwards every operation is read-only. Only
/// [`subgraph`](Self::subgraph) and [`verify`](Self::verify) can fail, and only when the
/// target matches no node.
#[derive(Debug, Clone)]
pub struct LineageEngine {
    config: LineageConfig,
    graph: LineageGraph,
}

impl LineageEngine {
    pub fn new(config: LineageConfig) -> Result<Self, MetafieldError> {
        let mut compiler = NotebookCompiler::new(config.clone())?;
        let graph = compiler.compile()?;
        let stats = compiler.stats();
        tracing::info!(
            "Lineage graph for {:?}: {} nodes, {} edges ({} notebooks read, {} with lineage, {} failed)",
            graph.root(),
            graph.node_count(),
            graph.edge_count(),
            stats.discovered,
            stats.included,
            stats.failed
        );
        Ok(LineageEngine { config, graph })
    }

    /// Wrap an already assembled graph.
    pub fn from_graph(config: LineageConfig, graph: LineageGraph) -> Self {
        LineageEngine { config, graph }
    }

    pub fn config(&self) -> &LineageConfig {
        &self.config
    }

    pub fn graph(&self) -> &LineageGraph {
        &self.graph
    }

    pub fn search(&self, query: &str, first_only: bool) -> Vec<&str> {
        self.graph.search(query, first_only)
    }

    pub fn subgraph(
        &self,
        target: &str,
        depth_limit: Option<usize>,
    ) -> Result<LineageGraph, MetafieldError> {
        self.graph.subgraph(target, depth_limit)
    }

    pub fn verify(
        &self,
        target: &str,
        depth_limit: Option<usize>,
    ) -> Result<Vec<VerifyRecord>, MetafieldError> {
        let subgraph = self.subgraph(target, depth_limit)?;
        Ok(verify_graph(&subgraph))
    }

    pub fn render(
        &self,
        subgraph: &LineageGraph,
        show_labels: bool,
        format: RenderFormat,
    ) -> Result<PathBuf, MetafieldError> {
        render(subgraph, show_labels, format)
    }

    /// Text listing of the subgraph around `target`.
    pub fn data_deps(
        &self,
        target: &str,
        depth_limit: Option<usize>,
    ) -> Result<String, MetafieldError> {
        Ok(self.subgraph(target, depth_limit)?.to_string())
    }
}
