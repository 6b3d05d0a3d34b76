//! The slice of the Jupyter notebook format that lineage extraction reads.
//!
//! Only nbformat 4 is understood: a top-level `cells` array whose entries carry a
//! `cell_type`, `metadata.tags`, a `source`, and (for code cells) `outputs`. Every other
//! field is ignored. Multiline strings may be stored either as one string or as a list of
//! line strings; both are joined back into a single `String`.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

use crate::error::MetafieldError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    Code,
    Markdown,
    Raw,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    Stream,
    ExecuteResult,
    DisplayData,
    Error,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellMetadata {
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellOutput {
    pub output_type: OutputKind,
    #[serde(default, deserialize_with = "multiline")]
    pub text: String,
}

impl CellOutput {
    pub fn stream(text: impl Into<String>) -> Self {
        CellOutput {
            output_type: OutputKind::Stream,
            text: text.into(),
        }
    }

    pub fn is_stream(&self) -> bool {
        self.output_type == OutputKind::Stream
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub cell_type: CellKind,
    #[serde(default)]
    pub metadata: CellMetadata,
    #[serde(default, deserialize_with = "multiline")]
    pub source: String,
    #[serde(default)]
    pub outputs: Vec<CellOutput>,
}

impl Cell {
    pub fn markdown(source: impl Into<String>) -> Self {
        Cell {
            cell_type: CellKind::Markdown,
            metadata: CellMetadata::default(),
            source: source.into(),
            outputs: Vec::new(),
        }
    }

    pub fn code(outputs: Vec<CellOutput>) -> Self {
        Cell {
            cell_type: CellKind::Code,
            metadata: CellMetadata::default(),
            source: String::new(),
            outputs,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.metadata.tags.push(tag.into());
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.metadata.tags.iter().any(|t| t == tag)
    }

    /// Markdown cells whose source starts with `#` delimit sections.
    pub fn is_heading(&self) -> bool {
        self.cell_type == CellKind::Markdown && self.source.starts_with('#')
    }

    pub fn stream_texts(&self) -> impl Iterator<Item = &str> {
        self.outputs
            .iter()
            .filter(|o| o.is_stream())
            .map(|o| o.text.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notebook {
    #[serde(default)]
    pub cells: Vec<Cell>,
}

impl Notebook {
    pub fn new(cells: Vec<Cell>) -> Self {
        Notebook { cells }
    }

    pub fn from_json(content: &str) -> Result<Self, MetafieldError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, MetafieldError> {
        tracing::debug!("Reading notebook {:?}", path.as_ref());
        let content = std::fs::read_to_string(path)?;
        Notebook::from_json(&content)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MultilineText {
    Joined(String),
    Lines(Vec<String>),
}

fn multiline<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match MultilineText::deserialize(deserializer)? {
        MultilineText::Joined(text) => text,
        MultilineText::Lines(lines) => lines.concat(),
    })
}
