use std::{fmt, io, path::StripPrefixError};

use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum MetafieldError {
    #[error("Notebook codec error: {0}")]
    Codec(String),
    #[error("External command failed: {0}")]
    Command(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("File System error: {0}")]
    Io(String),
    #[error("Item Not Found: {0}")]
    NotFound(String),
    #[error("You do not have permission to access this resource")]
    PermissionDenied,
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
}

impl MetafieldError {
    /// True for the one failure a lineage query can produce: the target matched no node.
    pub fn is_not_found(&self) -> bool {
        matches!(self, MetafieldError::NotFound(_))
    }
}

impl From<StripPrefixError> for MetafieldError {
    fn from(src: StripPrefixError) -> MetafieldError {
        MetafieldError::NotFound(format!("Strip prefix failed for path. Error: {src}"))
    }
}

impl From<toml::de::Error> for MetafieldError {
    fn from(src: toml::de::Error) -> MetafieldError {
        MetafieldError::Config(format!("Toml deserialization error: {src}"))
    }
}

impl From<toml::ser::Error> for MetafieldError {
    fn from(src: toml::ser::Error) -> MetafieldError {
        MetafieldError::Serialization(format!("Toml serialization error: {src}"))
    }
}

impl From<JsonError> for MetafieldError {
    fn from(src: JsonError) -> MetafieldError {
        MetafieldError::Serialization(format!("JSON (de)serialization error: {src}"))
    }
}

impl From<io::Error> for MetafieldError {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => MetafieldError::NotFound(format!("{x}")),
            io::ErrorKind::PermissionDenied => MetafieldError::PermissionDenied,
            _ => MetafieldError::Io(format!("IOError: {}", x.kind())),
        }
    }
}

impl From<tempfile::PersistError> for MetafieldError {
    fn from(x: tempfile::PersistError) -> Self {
        MetafieldError::from(x.error)
    }
}

impl From<fmt::Error> for MetafieldError {
    fn from(x: fmt::Error) -> Self {
        MetafieldError::Codec(format!("{x}"))
    }
}
