//! Fault-isolated JSON loading.
//!
//! Every discovered source is loaded independently; a failure becomes one
//! `LOAD_FAILED` finding and the run continues. Loaded JSON is immutable
//! from here on; downstream stages read it and build their own values.

use catalint_kernel::{
    DiscoveredSource, Finding, FindingContext, LoadedSource, SourceShape, codes,
};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// Absolute paths pass through unchanged; relative paths join the repo root.
pub fn resolve_path(repo_root: &Path, source: &str) -> PathBuf {
    let path = Path::new(source);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        repo_root.join(path)
    }
}

/// Read and parse one source file, stripping a UTF-8 BOM if present.
pub fn read_source(repo_root: &Path, source: &str) -> Result<Value, LoadError> {
    let abs = resolve_path(repo_root, source);
    let raw = fs::read_to_string(&abs).map_err(|e| LoadError::Read {
        path: abs.display().to_string(),
        source: e,
    })?;
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(&raw);
    serde_json::from_str(raw).map_err(|e| LoadError::Parse {
        path: abs.display().to_string(),
        source: e,
    })
}

/// Load all discovered sources. Failures are isolated per source and
/// reported as findings, never as errors.
pub fn load_all(
    repo_root: &Path,
    sources: &[DiscoveredSource],
) -> (Vec<LoadedSource>, Vec<Finding>) {
    let mut loaded = Vec::new();
    let mut findings = Vec::new();

    for item in sources {
        let abs_path = resolve_path(repo_root, &item.path);
        match read_source(repo_root, &item.path) {
            Ok(json) => {
                let shape = SourceShape::resolve(&json);
                loaded.push(LoadedSource {
                    source: item.path.clone(),
                    abs_path,
                    kind: item.kind,
                    shape,
                    json,
                });
            }
            Err(err) => {
                let ctx = FindingContext::for_source(abs_path.display().to_string());
                findings.push(Finding::error(codes::LOAD_FAILED, err.to_string(), &ctx));
            }
        }
    }

    (loaded, findings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalint_kernel::{Severity, SourceKind};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_root(prefix: &str) -> PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let root = std::env::temp_dir().join(format!(
            "catalint-load-{prefix}-{}-{unique}",
            std::process::id()
        ));
        fs::create_dir_all(&root).expect("temp root should be created");
        root
    }

    fn source(path: &str, kind: SourceKind) -> DiscoveredSource {
        DiscoveredSource {
            path: path.to_string(),
            kind,
        }
    }

    #[test]
    fn strips_utf8_bom_and_resolves_shape() {
        let root = temp_root("bom");
        fs::write(root.join("kits.json"), "\u{feff}{\"kits\": [{\"sku\": \"HV-1\"}]}")
            .expect("fixture should write");

        let (loaded, findings) =
            load_all(&root, &[source("kits.json", SourceKind::SetRecords)]);
        assert!(findings.is_empty());
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].shape, SourceShape::KitsContainer);
        assert_eq!(loaded[0].records().len(), 1);
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn failures_are_isolated_per_source() {
        let root = temp_root("isolated");
        fs::write(root.join("broken.json"), "{not json").expect("fixture should write");
        fs::write(root.join("ok.json"), "[]").expect("fixture should write");

        let (loaded, findings) = load_all(
            &root,
            &[
                source("missing.json", SourceKind::PageRecords),
                source("broken.json", SourceKind::PageRecords),
                source("ok.json", SourceKind::PageRecords),
            ],
        );
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].source, "ok.json");
        assert_eq!(findings.len(), 2);
        for finding in &findings {
            assert_eq!(finding.severity, Severity::Error);
            assert_eq!(finding.code, codes::LOAD_FAILED);
        }
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn absolute_paths_pass_through_unchanged() {
        let root = temp_root("abs");
        let other = temp_root("abs-other");
        let target = other.join("pages.json");
        fs::write(&target, "[{\"slug\": \"p\"}]").expect("fixture should write");

        let abs = target.to_string_lossy().into_owned();
        let (loaded, findings) = load_all(&root, &[source(&abs, SourceKind::PageRecords)]);
        assert!(findings.is_empty());
        assert_eq!(loaded[0].abs_path, target);
        let _ = fs::remove_dir_all(&root);
        let _ = fs::remove_dir_all(&other);
    }
}
