//! Graphviz output for lineage graphs.
//!
//! Notebooks are drawn as red ellipses and artifacts as blue boxes. The DOT text is always
//! produced in-process; PNG output shells out to the Graphviz `dot` executable.

use std::{
    fmt::Write as _,
    io::Write as _,
    path::{Path, PathBuf},
    process::Command,
};

use crate::{
    error::MetafieldError,
    lineage::graph::{LineageGraph, NodeKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderFormat {
    Dot,
    #[default]
    Png,
}

impl RenderFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            RenderFormat::Dot => ".dot",
            RenderFormat::Png => ".png",
        }
    }
}

fn quote(id: &str) -> String {
    format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\""))
}

/// DOT source for `graph`. With `show_labels == false` every node label is blanked.
pub fn to_dot(graph: &LineageGraph, show_labels: bool) -> Result<String, MetafieldError> {
    let mut dot = String::new();
    writeln!(dot, "digraph lineage {{")?;
    writeln!(dot, "    edge [arrowsize=0.2];")?;
    for node in graph.nodes() {
        let (color, shape) = match node.kind() {
            NodeKind::Notebook => ("red", "ellipse"),
            NodeKind::Artifact => ("blue", "box"),
        };
        write!(dot, "    {} [color={color}, shape={shape}", quote(node.id()))?;
        if !show_labels {
            write!(dot, ", label=\"\"")?;
        }
        writeln!(dot, "];")?;
    }
    for (source, sink) in graph.edges() {
        writeln!(dot, "    {} -> {};", quote(source), quote(sink))?;
    }
    writeln!(dot, "}}")?;
    Ok(dot)
}

fn persist_temp(suffix: &str, bytes: &[u8]) -> Result<PathBuf, MetafieldError> {
    let mut file = tempfile::Builder::new()
        .prefix("metafield-")
        .suffix(suffix)
        .tempfile()?;
    file.write_all(bytes)?;
    let (_, path) = file.keep()?;
    Ok(path)
}

fn run_graphviz(dot_path: &Path, png_path: &Path) -> Result<(), MetafieldError> {
    let output = Command::new("dot")
        .arg("-Tpng")
        .arg(dot_path)
        .arg("-o")
        .arg(png_path)
        .output()
        .map_err(|e| MetafieldError::Command(format!("could not run graphviz `dot`: {e}")))?;
    if !output.status.success() {
        return Err(MetafieldError::Command(format!(
            "graphviz `dot` exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(())
}

/// Write `graph` to a temporary file in `format` and return its path. The file is left on
/// disk for the caller.
pub fn render(
    graph: &LineageGraph,
    show_labels: bool,
    format: RenderFormat,
) -> Result<PathBuf, MetafieldError> {
    let dot = to_dot(graph, show_labels)?;
    let dot_path = persist_temp(RenderFormat::Dot.extension(), dot.as_bytes())?;
    match format {
        RenderFormat::Dot => Ok(dot_path),
        RenderFormat::Png => {
            let png_path = persist_temp(RenderFormat::Png.extension(), &[])?;
            let result = run_graphviz(&dot_path, &png_path);
            std::fs::remove_file(&dot_path).ok();
            if result.is_err() {
                std::fs::remove_file(&png_path).ok();
            }
            result?;
            tracing::debug!("Rendered lineage graph to {:?}", png_path);
            Ok(png_path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::reference::Reference;

    fn sample() -> LineageGraph {
        let mut graph = LineageGraph::new("/repo");
        let nb = graph.add_notebook("clean \"v2\"");
        let reference = Reference::from_line(&format!("{}  out.csv", "e".repeat(40))).unwrap();
        let art = graph.add_artifact(&reference);
        graph.add_edge(nb, art);
        graph
    }

    #[test]
    fn dot_styles_nodes_by_kind() {
        let dot = to_dot(&sample(), true).unwrap();
        assert!(dot.starts_with("digraph lineage {"));
        assert!(dot.contains(r#""clean \"v2\"" [color=red, shape=ellipse];"#));
        assert!(dot.contains(r#""eeeeeee" [color=blue, shape=box];"#));
        assert!(dot.contains(r#""clean \"v2\"" -> "eeeeeee";"#));
    }

    #[test]
    fn hidden_labels_are_blanked() {
        let dot = to_dot(&sample(), false).unwrap();
        assert_eq!(dot.matches("label=\"\"").count(), 2);
    }

    #[test]
    fn dot_render_leaves_file_behind() {
        let path = render(&sample(), true, RenderFormat::Dot).unwrap();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("dot"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("eeeeeee"));
        std::fs::remove_file(path).unwrap();
    }
}
