use crate::error::MetafieldError;
use serde::{Deserialize, Deserializer, Serialize};
use std::{
    fs::{read_to_string, write},
    path::{Path, PathBuf},
};

pub const DEFAULT_EXTENSION: &str = "ipynb";
pub const INPUT_TAG: &str = "indata";
pub const OUTPUT_TAG: &str = "outdata";
pub const INPUT_SECTION: &str = "data";
pub const OUTPUT_SECTION: &str = "export";

/// How one direction of lineage (inputs or outputs) is located inside a notebook.
///
/// `tag` is matched against cell `metadata.tags`; `section` is a case-insensitive keyword
/// looked for in markdown headings when no cell carries the tag. An empty `tag` or `section`
/// turns that strategy off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellMarker {
    pub tag: String,
    pub section: String,
}

impl CellMarker {
    pub fn new(tag: impl Into<String>, section: impl Into<String>) -> Self {
        CellMarker {
            tag: tag.into(),
            section: section.into(),
        }
    }

    pub fn inputs() -> Self {
        CellMarker::new(INPUT_TAG, INPUT_SECTION)
    }

    pub fn outputs() -> Self {
        CellMarker::new(OUTPUT_TAG, OUTPUT_SECTION)
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

fn default_inputs() -> CellMarker {
    CellMarker::inputs()
}

fn default_outputs() -> CellMarker {
    CellMarker::outputs()
}

/// A marker table as written in TOML, where either key may be left out.
#[derive(Deserialize)]
struct PartialMarker {
    tag: Option<String>,
    section: Option<String>,
}

impl PartialMarker {
    fn or(self, fallback: CellMarker) -> CellMarker {
        CellMarker {
            tag: self.tag.unwrap_or(fallback.tag),
            section: self.section.unwrap_or(fallback.section),
        }
    }
}

fn partial_inputs<'de, D: Deserializer<'de>>(deserializer: D) -> Result<CellMarker, D::Error> {
    Ok(PartialMarker::deserialize(deserializer)?.or(CellMarker::inputs()))
}

fn partial_outputs<'de, D: Deserializer<'de>>(deserializer: D) -> Result<CellMarker, D::Error> {
    Ok(PartialMarker::deserialize(deserializer)?.or(CellMarker::outputs()))
}

/// Everything needed to build a lineage graph. The root directory is always explicit; the
/// engine never probes the environment for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageConfig {
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default)]
    pub include_hidden: bool,
    #[serde(default = "default_inputs", deserialize_with = "partial_inputs")]
    pub inputs: CellMarker,
    #[serde(default = "default_outputs", deserialize_with = "partial_outputs")]
    pub outputs: CellMarker,
}

impl Default for LineageConfig {
    fn default() -> Self {
        LineageConfig {
            root: default_root(),
            extension: default_extension(),
            include_hidden: false,
            inputs: default_inputs(),
            outputs: default_outputs(),
        }
    }
}

impl LineageConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LineageConfig {
            root: root.into(),
            ..Default::default()
        }
    }

    /// Read a TOML config file. A relative `root` is taken relative to the file's directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MetafieldError> {
        let path = path.as_ref();
        tracing::debug!("Reading lineage config from: {:?}", path);
        let content = read_to_string(path)?;
        let mut config = LineageConfig::from_toml(&content)?;
        if config.root.is_relative() {
            if let Some(parent) = path.parent() {
                config.root = parent.join(&config.root);
            }
        }
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, MetafieldError> {
        let config: LineageConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, MetafieldError> {
        Ok(toml::to_string(self)?)
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), MetafieldError> {
        tracing::debug!("Writing lineage config to: {:?}", path.as_ref());
        write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    fn validate(&self) -> Result<(), MetafieldError> {
        if self.extension.is_empty() || self.extension.starts_with('.') {
            return Err(MetafieldError::Config(format!(
                "extension must be non-empty and given without a leading dot, got {:?}",
                self.extension
            )));
        }
        for (direction, marker) in [("inputs", &self.inputs), ("outputs", &self.outputs)] {
            if marker.tag.is_empty() && marker.section.is_empty() {
                return Err(MetafieldError::Config(format!(
                    "{direction} needs a tag or a section keyword"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = LineageConfig::from_toml("").unwrap();
        assert_eq!(config, LineageConfig::default());
        assert_eq!(config.inputs.tag, "indata");
        assert_eq!(config.outputs.section, "export");
    }

    #[test]
    fn toml_overrides_markers() {
        let config = LineageConfig::from_toml(
            r#"
root = "/srv/notebooks"
include_hidden = true

[outputs]
tag = "products"
section = "results"
"#,
        )
        .unwrap();
        assert_eq!(config.root, PathBuf::from("/srv/notebooks"));
        assert!(config.include_hidden);
        assert_eq!(config.inputs, CellMarker::inputs());
        assert_eq!(config.outputs, CellMarker::new("products", "results"));
    }

    #[test]
    fn partial_marker_table_keeps_direction_defaults() {
        let config = LineageConfig::from_toml("[inputs]\ntag = \"sources\"\n").unwrap();
        assert_eq!(config.inputs, CellMarker::new("sources", "data"));
        assert_eq!(config.outputs, CellMarker::outputs());

        let config = LineageConfig::from_toml("[outputs]\nsection = \"results\"\n").unwrap();
        assert_eq!(config.inputs, CellMarker::inputs());
        assert_eq!(config.outputs, CellMarker::new("outdata", "results"));
    }

    #[test]
    fn marker_with_both_strategies_off_is_rejected() {
        let err =
            LineageConfig::from_toml("[inputs]\ntag = \"\"\nsection = \"\"\n").unwrap_err();
        assert!(matches!(err, MetafieldError::Config(_)));
    }

    #[test]
    fn dotted_extension_is_rejected() {
        let err = LineageConfig::from_toml("extension = \".ipynb\"").unwrap_err();
        assert!(matches!(err, MetafieldError::Config(_)));
    }

    #[test]
    fn relative_root_resolves_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metafield.toml");
        LineageConfig::new("notebooks").write(&path).unwrap();

        let config = LineageConfig::from_file(&path).unwrap();
        assert_eq!(config.root, dir.path().join("notebooks"));
    }
}
