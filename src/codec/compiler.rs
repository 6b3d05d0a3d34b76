use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::{
    codec::{builder::GraphBuilder, notebook::Notebook},
    config::LineageConfig,
    error::MetafieldError,
    lineage::LineageGraph,
};

/// Counters from the last [`NotebookCompiler::compile`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileStats {
    pub discovered: usize,
    pub included: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Discovers notebooks under a root directory and feeds each one to a [`GraphBuilder`].
///
/// A notebook that cannot be read or parsed is logged and skipped; one bad file never aborts
/// the build. The root itself must exist.
pub struct NotebookCompiler {
    config: LineageConfig,
    root: PathBuf,
    stats: CompileStats,
}

impl NotebookCompiler {
    pub fn new(config: LineageConfig) -> Result<Self, MetafieldError> {
        let root = config.root.canonicalize().map_err(|e| {
            MetafieldError::NotFound(format!("lineage root {:?}: {e}", config.root))
        })?;
        if !root.is_dir() {
            return Err(MetafieldError::Config(format!(
                "lineage root {root:?} is not a directory"
            )));
        }
        Ok(NotebookCompiler {
            config,
            root,
            stats: CompileStats::default(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn stats(&self) -> CompileStats {
        self.stats
    }

    /// Notebook files under the root, sorted by path so builds are reproducible.
    pub fn discover(&self) -> Vec<PathBuf> {
        fn is_hidden(entry: &DirEntry) -> bool {
            entry
                .file_name()
                .to_str()
                .map(|s| s.starts_with('.'))
                .unwrap_or(false)
        }
        let include_hidden = self.config.include_hidden;
        let extension = self.config.extension.as_str();
        let mut notebooks = WalkDir::new(&self.root)
            .into_iter()
            .filter_entry(|e| include_hidden || !is_hidden(e) || e.path() == self.root)
            .filter_map(|e| match e {
                Ok(entry) => Some(entry.into_path()),
                Err(err) => {
                    tracing::warn!("[NotebookCompiler] skipping unreadable entry: {}", err);
                    None
                }
            })
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == extension))
            .collect::<Vec<PathBuf>>();
        notebooks.sort_by(|a, b| a.components().cmp(b.components()));
        notebooks
    }

    /// Build the full lineage graph from scratch.
    pub fn compile(&mut self) -> Result<LineageGraph, MetafieldError> {
        let mut builder = GraphBuilder::new(self.root.clone());
        let mut stats = CompileStats::default();
        for path in self.discover() {
            stats.discovered += 1;
            let relative = path.strip_prefix(&self.root)?;
            let Some(name) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            let notebook = match Notebook::read(&path) {
                Ok(notebook) => notebook,
                Err(e) => {
                    tracing::warn!("[NotebookCompiler] Failed to read {:?}: {}", relative, e);
                    stats.failed += 1;
                    continue;
                }
            };
            let summary = builder.add_notebook(&name, &notebook, &self.config);
            if summary.included() {
                tracing::debug!(
                    "[NotebookCompiler] {:?}: {} inputs, {} outputs",
                    relative,
                    summary.inputs,
                    summary.outputs
                );
                stats.included += 1;
            } else {
                stats.skipped += 1;
            }
        }
        self.stats = stats;
        Ok(builder.into_graph())
    }
}
