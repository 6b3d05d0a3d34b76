use std::path::PathBuf;

use crate::{
    codec::{
        notebook::Notebook,
        reference::{parse_references, Reference},
        selector::select,
    },
    config::LineageConfig,
    lineage::LineageGraph,
};

/// What one notebook contributed to the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotebookSummary {
    pub name: String,
    pub inputs: usize,
    pub outputs: usize,
}

impl NotebookSummary {
    /// Notebooks without any reference are left out of the graph.
    pub fn included(&self) -> bool {
        self.inputs > 0 || self.outputs > 0
    }
}

/// Accumulates notebooks into one shared [`LineageGraph`].
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    graph: LineageGraph,
}

impl GraphBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        GraphBuilder {
            graph: LineageGraph::new(root),
        }
    }

    pub fn graph(&self) -> &LineageGraph {
        &self.graph
    }

    pub fn into_graph(self) -> LineageGraph {
        self.graph
    }

    /// Select the data cells of `notebook` per `config` and add its lineage under `name`.
    pub fn add_notebook(
        &mut self,
        name: &str,
        notebook: &Notebook,
        config: &LineageConfig,
    ) -> NotebookSummary {
        let inputs = select(&notebook.cells, &config.inputs);
        let outputs = select(&notebook.cells, &config.outputs);
        tracing::debug!(
            "[GraphBuilder] {}: inputs by {:?} ({} blocks), outputs by {:?} ({} blocks)",
            name,
            inputs.by,
            inputs.texts.len(),
            outputs.by,
            outputs.texts.len()
        );
        self.add_texts(name, &inputs.texts, &outputs.texts)
    }

    /// Add lineage for `name` from already selected input and output text blocks.
    pub fn add_texts(
        &mut self,
        name: &str,
        input_texts: &[String],
        output_texts: &[String],
    ) -> NotebookSummary {
        let inputs: Vec<Reference> = input_texts
            .iter()
            .flat_map(|text| parse_references(text))
            .collect();
        let outputs: Vec<Reference> = output_texts
            .iter()
            .flat_map(|text| parse_references(text))
            .collect();
        let summary = NotebookSummary {
            name: name.to_string(),
            inputs: inputs.len(),
            outputs: outputs.len(),
        };
        if !summary.included() {
            tracing::debug!("[GraphBuilder] {} records no lineage, skipping", name);
            return summary;
        }

        let notebook = self.graph.add_notebook(name);
        for reference in &inputs {
            let artifact = self.graph.add_artifact(reference);
            self.graph.add_edge(artifact, notebook);
        }
        for reference in &outputs {
            let artifact = self.graph.add_artifact(reference);
            self.graph.add_edge(notebook, artifact);
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::notebook::{Cell, CellOutput};

    fn listing(fill: char, path: &str) -> String {
        format!("{}  {}\n", fill.to_string().repeat(40), path)
    }

    #[test]
    fn inputs_point_at_notebook_and_outputs_away() {
        let mut builder = GraphBuilder::new("/repo");
        let summary = builder.add_texts(
            "prep",
            &[listing('a', "raw/in.csv")],
            &[listing('b', "clean/out.csv")],
        );
        assert_eq!(summary.inputs, 1);
        assert_eq!(summary.outputs, 1);

        let graph = builder.graph();
        assert!(graph.contains_edge("aaaaaaa", "prep"));
        assert!(graph.contains_edge("prep", "bbbbbbb"));
        assert!(!graph.contains_edge("prep", "aaaaaaa"));
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn notebook_without_references_is_excluded() {
        let mut builder = GraphBuilder::new("/repo");
        let summary = builder.add_texts("scratch", &["no hashes here".to_string()], &[]);
        assert!(!summary.included());
        assert!(builder.graph().is_empty());
    }

    #[test]
    fn repeated_reference_keeps_one_node_and_edge() {
        let mut builder = GraphBuilder::new("/repo");
        let text = listing('c', "x.csv");
        builder.add_texts("nb", &[text.clone(), text.replace("x.csv", "renamed.csv")], &[]);
        let graph = builder.graph();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        match graph.get("ccccccc") {
            Some(crate::lineage::LineageNode::Artifact { path, .. }) => assert_eq!(path, "x.csv"),
            other => panic!("expected artifact, got {other:?}"),
        }
    }

    #[test]
    fn add_notebook_uses_configured_markers() {
        let notebook = Notebook::new(vec![
            Cell::code(vec![CellOutput::stream(listing('d', "in.csv"))]).with_tag("indata"),
            Cell::markdown("# Export"),
            Cell::code(vec![CellOutput::stream(listing('e', "out.csv"))]),
        ]);
        let mut builder = GraphBuilder::new("/repo");
        let summary = builder.add_notebook("model", &notebook, &LineageConfig::default());
        assert_eq!((summary.inputs, summary.outputs), (1, 1));
        assert!(builder.graph().contains_edge("ddddddd", "model"));
        assert!(builder.graph().contains_edge("model", "eeeeeee"));
    }
}
