//! Checking recorded artifact fingerprints against the files on disk.

use serde::{Deserialize, Serialize};
use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::{codec::reference::Fingerprint, lineage::graph::LineageGraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VerifyStatus {
    /// File present and its fingerprint matches the recorded one.
    Ok,
    /// No file at the resolved path.
    Miss,
    /// File present with different content.
    Diff,
}

impl fmt::Display for VerifyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VerifyStatus::Ok => "OK",
            VerifyStatus::Miss => "MISS",
            VerifyStatus::Diff => "DIFF",
        };
        // Honor width/alignment so callers can center the label.
        f.pad(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyRecord {
    pub status: VerifyStatus,
    /// Recorded path after `../` stripping, as resolved against the root.
    pub path: String,
    /// Fingerprint of the file found on disk; `None` when missing.
    pub observed: Option<Fingerprint>,
}

impl VerifyRecord {
    /// Observed fingerprint, or an empty string for missing files.
    pub fn observed_str(&self) -> &str {
        self.observed.as_ref().map(Fingerprint::as_str).unwrap_or("")
    }

    pub fn is_ok(&self) -> bool {
        self.status == VerifyStatus::Ok
    }
}

/// Strip leading `../` segments from a recorded path and join it onto `root`.
///
/// Recorded paths are usually relative to the notebook that printed them, which may sit a
/// level below the root. This is a containment heuristic only: it does not normalize the
/// rest of the path.
pub fn resolve_artifact_path(root: &Path, recorded: &str) -> (String, PathBuf) {
    let stripped = recorded.trim_start_matches("../").to_string();
    let resolved = root.join(&stripped);
    (stripped, resolved)
}

/// Classify one artifact. File-level problems become `Miss` rows, never errors.
pub fn verify_artifact(root: &Path, recorded_path: &str, expected: &Fingerprint) -> VerifyRecord {
    let (path, resolved) = resolve_artifact_path(root, recorded_path);
    if !resolved.exists() {
        tracing::debug!("{:?} missing", resolved);
        return VerifyRecord {
            status: VerifyStatus::Miss,
            path,
            observed: None,
        };
    }
    match Fingerprint::of_file(&resolved) {
        Ok(observed) => VerifyRecord {
            status: if &observed == expected {
                VerifyStatus::Ok
            } else {
                VerifyStatus::Diff
            },
            path,
            observed: Some(observed),
        },
        Err(e) => {
            tracing::warn!("Could not read {:?} for verification: {}", resolved, e);
            VerifyRecord {
                status: VerifyStatus::Miss,
                path,
                observed: None,
            }
        }
    }
}

/// One record per artifact node of `graph`, in node order.
pub fn verify_graph(graph: &LineageGraph) -> Vec<VerifyRecord> {
    graph
        .artifacts()
        .map(|(path, fingerprint)| verify_artifact(graph.root(), path, fingerprint))
        .collect()
}
