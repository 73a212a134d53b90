//! Source entries as they flow through the pipeline.
//!
//! `DiscoveredSource` is the discovery stage's heuristic claim about a file;
//! `LoadedSource` is the immutable parsed document every later stage reads.
//! Nothing downstream ever mutates `json`; derivation and fix suggestion
//! build new value trees from deep copies.

use crate::record::{SourceKind, SourceShape};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

/// A discovered catalog file with its heuristic classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveredSource {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: SourceKind,
}

/// A successfully loaded source with its record shape resolved once.
#[derive(Debug, Clone)]
pub struct LoadedSource {
    /// The path as discovered (repo-relative unless it arrived absolute).
    pub source: String,
    pub abs_path: PathBuf,
    pub kind: SourceKind,
    pub shape: SourceShape,
    pub json: Value,
}

impl LoadedSource {
    /// The records this source exposes under its resolved shape.
    pub fn records(&self) -> &[Value] {
        self.shape.records(&self.json)
    }

    /// Best-available path for attribution and derived-output naming.
    pub fn display_path(&self) -> &str {
        if self.source.is_empty() {
            self.abs_path.to_str().unwrap_or_default()
        } else {
            &self.source
        }
    }
}
