//! Graph data structures for notebook lineage.
//!
//! - [`LineageNode`]: tagged node variant (notebook or artifact)
//! - [`LineageGraph`]: node table keyed by identifier over a petgraph adjacency structure
//! - [`LineageSnapshot`]: flat, serializable view used for JSON output

use petgraph::{
    graph::{Graph, NodeIndex},
    visit::EdgeRef,
    Direction,
};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, BTreeSet, VecDeque},
    fmt,
    path::{Path, PathBuf},
};

use crate::{
    codec::reference::{Fingerprint, Reference},
    error::MetafieldError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Notebook,
    Artifact,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Notebook => write!(f, "notebook"),
            NodeKind::Artifact => write!(f, "artifact"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LineageNode {
    Notebook {
        name: String,
    },
    /// A versioned data file. Its identifier is the fingerprint's short form.
    Artifact {
        path: String,
        fingerprint: Fingerprint,
    },
}

impl LineageNode {
    pub fn notebook(name: impl Into<String>) -> Self {
        LineageNode::Notebook { name: name.into() }
    }

    pub fn artifact(reference: &Reference) -> Self {
        LineageNode::Artifact {
            path: reference.path.clone(),
            fingerprint: reference.fingerprint.clone(),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            LineageNode::Notebook { name } => name,
            LineageNode::Artifact { fingerprint, .. } => fingerprint.short(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            LineageNode::Notebook { .. } => NodeKind::Notebook,
            LineageNode::Artifact { .. } => NodeKind::Artifact,
        }
    }
}

impl fmt::Display for LineageNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineageNode::Notebook { name } => write!(f, "{name} (notebook)"),
            LineageNode::Artifact { path, fingerprint } => {
                write!(f, "{} (artifact: {})", fingerprint.short(), path)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageSnapshot {
    pub root: PathBuf,
    pub nodes: Vec<LineageNode>,
    pub edges: Vec<(String, String)>,
}

/// Directed lineage graph: artifact -> notebook for inputs, notebook -> artifact for outputs.
///
/// Node identifiers are unique keys. Nodes iterate in insertion order, which is also the
/// order `search` and `find` scan in.
#[derive(Debug, Clone, Default)]
pub struct LineageGraph {
    root: PathBuf,
    graph: Graph<LineageNode, ()>,
    index: BTreeMap<String, NodeIndex>,
}

impl LineageGraph {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LineageGraph {
            root: root.into(),
            ..Default::default()
        }
    }

    /// Directory that recorded artifact paths are relative to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn nodes(&self) -> impl Iterator<Item = &LineageNode> {
        self.graph.node_weights()
    }

    pub fn artifacts(&self) -> impl Iterator<Item = (&str, &Fingerprint)> {
        self.nodes().filter_map(|node| match node {
            LineageNode::Artifact { path, fingerprint } => Some((path.as_str(), fingerprint)),
            LineageNode::Notebook { .. } => None,
        })
    }

    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.graph
            .edge_references()
            .map(|e| (self.graph[e.source()].id(), self.graph[e.target()].id()))
    }

    pub fn get(&self, id: &str) -> Option<&LineageNode> {
        self.index.get(id).map(|idx| &self.graph[*idx])
    }

    pub fn contains_edge(&self, source: &str, sink: &str) -> bool {
        match (self.index.get(source), self.index.get(sink)) {
            (Some(s), Some(t)) => self.graph.contains_edge(*s, *t),
            _ => false,
        }
    }

    /// Insert a notebook node, or turn an existing node with this identifier into one.
    pub fn add_notebook(&mut self, name: &str) -> NodeIndex {
        let node = LineageNode::notebook(name);
        match self.index.get(name) {
            Some(idx) => {
                self.graph[*idx] = node;
                *idx
            }
            None => self.insert(node),
        }
    }

    /// Insert the artifact named by `reference` unless one with its short id already exists.
    ///
    /// The same fingerprint seen again keeps the first recorded path. A different fingerprint
    /// sharing the short id replaces the stored attributes.
    pub fn add_artifact(&mut self, reference: &Reference) -> NodeIndex {
        let id = reference.fingerprint.short();
        let Some(idx) = self.index.get(id).copied() else {
            return self.insert(LineageNode::artifact(reference));
        };
        let replace = match &self.graph[idx] {
            LineageNode::Artifact { fingerprint, .. } if fingerprint == &reference.fingerprint => {
                false
            }
            LineageNode::Artifact { fingerprint, path } => {
                tracing::warn!(
                    "Artifact id {} collides: {} ({}) replaced by {} ({})",
                    id,
                    fingerprint,
                    path,
                    reference.fingerprint,
                    reference.path
                );
                true
            }
            LineageNode::Notebook { name } => {
                tracing::warn!(
                    "Artifact id {} matches notebook {}; keeping the notebook node",
                    id,
                    name
                );
                false
            }
        };
        if replace {
            self.graph[idx] = LineageNode::artifact(reference);
        }
        idx
    }

    /// Add `source -> sink`. Repeated pairs collapse into one edge.
    pub fn add_edge(&mut self, source: NodeIndex, sink: NodeIndex) {
        self.graph.update_edge(source, sink, ());
    }

    fn insert(&mut self, node: LineageNode) -> NodeIndex {
        let id = node.id().to_string();
        let idx = self.graph.add_node(node);
        self.index.insert(id, idx);
        idx
    }

    /// Case-insensitive substring search over node identifiers, in insertion order.
    pub fn search(&self, query: &str, first_only: bool) -> Vec<&str> {
        let query = query.to_lowercase();
        let matches = self
            .nodes()
            .map(LineageNode::id)
            .filter(|id| id.to_lowercase().contains(&query));
        if first_only {
            matches.take(1).collect()
        } else {
            matches.collect()
        }
    }

    /// First node, in insertion order, whose identifier contains `target` (case-sensitive).
    pub fn find(&self, target: &str) -> Option<NodeIndex> {
        self.graph
            .node_indices()
            .find(|idx| self.graph[*idx].id().contains(target))
    }

    /// Edges met by a breadth-first walk from `start` along `direction`.
    ///
    /// Every edge leaving a node at distance `< depth_limit` is kept, including edges back to
    /// nodes already seen, so the result does not depend on neighbor order. Edges come back
    /// in graph orientation (`source`, `sink`) for both directions.
    pub fn reachable_edges(
        &self,
        start: NodeIndex,
        direction: Direction,
        depth_limit: Option<usize>,
    ) -> BTreeSet<(NodeIndex, NodeIndex)> {
        let mut edges = BTreeSet::new();
        let mut seen = BTreeSet::from([start]);
        let mut queue = VecDeque::from([(start, 0usize)]);
        while let Some((node, depth)) = queue.pop_front() {
            if depth_limit.is_some_and(|limit| depth >= limit) {
                continue;
            }
            for next in self.graph.neighbors_directed(node, direction) {
                edges.insert(match direction {
                    Direction::Outgoing => (node, next),
                    Direction::Incoming => (next, node),
                });
                if seen.insert(next) {
                    queue.push_back((next, depth + 1));
                }
            }
        }
        edges
    }

    /// Ancestors and descendants of the first node matching `target`, up to `depth_limit`
    /// hops each way.
    pub fn subgraph(
        &self,
        target: &str,
        depth_limit: Option<usize>,
    ) -> Result<LineageGraph, MetafieldError> {
        let start = self
            .find(target)
            .ok_or_else(|| MetafieldError::NotFound(format!("Node {target} not found in graph")))?;
        let mut edges = self.reachable_edges(start, Direction::Incoming, depth_limit);
        edges.extend(self.reachable_edges(start, Direction::Outgoing, depth_limit));
        tracing::debug!(
            "subgraph around {} (depth {:?}): {} edges",
            self.graph[start].id(),
            depth_limit,
            edges.len()
        );
        Ok(self.edge_subgraph(&edges))
    }

    /// The graph induced by `edges`: those edges and the nodes they touch, nothing else.
    pub fn edge_subgraph(&self, edges: &BTreeSet<(NodeIndex, NodeIndex)>) -> LineageGraph {
        let touched: BTreeSet<NodeIndex> = edges.iter().flat_map(|(s, t)| [*s, *t]).collect();
        let mut out = LineageGraph::new(self.root.clone());
        let mut remap = BTreeMap::new();
        for idx in self.graph.node_indices().filter(|idx| touched.contains(idx)) {
            remap.insert(idx, out.insert(self.graph[idx].clone()));
        }
        for edge in self.graph.edge_references() {
            if edges.contains(&(edge.source(), edge.target())) {
                out.add_edge(remap[&edge.source()], remap[&edge.target()]);
            }
        }
        out
    }

    pub fn snapshot(&self) -> LineageSnapshot {
        LineageSnapshot {
            root: self.root.clone(),
            nodes: self.nodes().cloned().collect(),
            edges: self
                .edges()
                .map(|(s, t)| (s.to_string(), t.to_string()))
                .collect(),
        }
    }

    pub(crate) fn kinded_edges(&self) -> impl Iterator<Item = (&LineageNode, &LineageNode)> {
        self.graph
            .edge_references()
            .map(|e| (&self.graph[e.source()], &self.graph[e.target()]))
    }
}

impl fmt::Display for LineageGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source_max_len = self.edges().map(|(s, _)| s.len()).max().unwrap_or_default();
        writeln!(f, "nodes:")?;
        for node in self.nodes() {
            writeln!(f, "- {node}")?;
        }
        writeln!(f, "edges:")?;
        for (source, sink) in self.kinded_edges() {
            let role = match (source.kind(), sink.kind()) {
                (NodeKind::Artifact, _) => "input",
                (_, NodeKind::Artifact) => "output",
                _ => "link",
            };
            writeln!(
                f,
                "- {:>source_max_len$} -> {}: {}",
                source.id(),
                sink.id(),
                role
            )?;
        }
        Ok(())
    }
}
