//! Artifact writers.
//!
//! Reports and derived files are always written, even when errors exist, so
//! operators can inspect everything in one run. Derived output mirrors each
//! source path under `<out>/derived/`, collapsing a single-record list back
//! to a bare object.

use catalint_kernel::{DerivedOutput, DiscoveredSource, FileFixes, Finding};
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

pub const REPORT_JSON: &str = "lint-report.json";
pub const REPORT_MD: &str = "lint-report.md";
pub const FIXES_JSON: &str = "fixes.json";
pub const DERIVED_DIR: &str = "derived";

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to serialize {what}: {source}")]
    Serialize {
        what: String,
        source: serde_json::Error,
    },
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| OutputError::Io {
            path: parent.display().to_string(),
            source,
        })?;
    }
    fs::write(path, bytes).map_err(|source| OutputError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T, what: &str) -> Result<(), OutputError> {
    let bytes = serde_json::to_vec_pretty(value).map_err(|source| OutputError::Serialize {
        what: what.to_string(),
        source,
    })?;
    write_bytes(path, &bytes)
}

/// Write the combined findings+sources JSON document and the Markdown report.
pub fn write_reports(
    out_root: &Path,
    findings: &[Finding],
    sources: &[DiscoveredSource],
    markdown: &str,
) -> Result<(), OutputError> {
    write_json(
        &out_root.join(REPORT_JSON),
        &json!({ "findings": findings, "sources": sources }),
        "lint report",
    )?;
    write_bytes(&out_root.join(REPORT_MD), markdown.as_bytes())
}

/// Mirror one derived output under the derived tree.
fn derived_dest(repo_root: &Path, out_root: &Path, source_file: &str) -> PathBuf {
    let source = Path::new(source_file);
    let rel = source
        .strip_prefix(repo_root)
        .ok()
        .filter(|_| source.is_absolute())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| {
            if source.is_absolute() {
                // Foreign absolute path: fall back to the file name.
                PathBuf::from(source.file_name().unwrap_or_default())
            } else {
                source.to_path_buf()
            }
        });
    out_root.join(DERIVED_DIR).join(rel)
}

pub fn write_derived(
    repo_root: &Path,
    out_root: &Path,
    outputs: &[DerivedOutput],
) -> Result<(), OutputError> {
    for output in outputs {
        if output.source_file.is_empty() {
            continue;
        }
        let dest = derived_dest(repo_root, out_root, &output.source_file);
        if output.records.len() == 1 {
            write_json(&dest, &output.records[0], "derived record")?;
        } else {
            write_json(&dest, &output.records, "derived records")?;
        }
    }
    Ok(())
}

pub fn write_fixes(out_root: &Path, fixes: &[FileFixes]) -> Result<(), OutputError> {
    write_json(&out_root.join(FIXES_JSON), &fixes, "fix suggestions")
}
