//! Source discovery: find catalog JSON under the conventional data roots.
//!
//! Discovery is read-only and never fails the pipeline: a missing root is
//! silently skipped, and an empty result is handled downstream. Paths are
//! reported repo-root-relative with forward slashes so reports are stable
//! across machines.

use catalint_kernel::{DiscoveredSource, SourceKind};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Candidate relative roots, scanned in order.
const DEFAULT_ROOTS: &[&str] = &[
    "wwwroot/data",
    "wwwroot/assets/data",
    "wwwroot/assets/json",
    "data",
    "public/data",
    "assets/data",
    "assets/json",
    "public/json",
];

/// Broad fallback when no candidate root yields files.
const FALLBACK_ROOT: &str = "wwwroot";

/// Directory names that never hold catalog data.
const IGNORED_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    ".next",
    "dist",
    "build",
    "out",
    ".cache",
    "target",
];

/// Repo-relative prefix of our own output tree; reruns must not lint it.
pub const OUT_ROOT: &str = "tools/catalint/out";

/// Classify a file by naming heuristic: `set`/`kit`/`sku` anywhere in the
/// path means set records.
fn guess_kind(path: &str) -> SourceKind {
    let lower = path.to_lowercase();
    if lower.contains("set") || lower.contains("kit") || lower.contains("sku") {
        SourceKind::SetRecords
    } else {
        SourceKind::PageRecords
    }
}

fn is_excluded(rel_path: &str) -> bool {
    let lower = rel_path.to_lowercase();
    lower.contains("/fitments/")
        || lower.ends_with("build-info.json")
        || lower.starts_with(OUT_ROOT)
}

/// Recursive walk collecting `.json` files, skipping ignored and dotfile
/// entries. Entries are visited in name order for deterministic output.
fn walk(dir: &Path, root: &Path, files: &mut Vec<String>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    let mut entries: Vec<_> = entries.filter_map(Result::ok).collect();
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        let full = entry.path();
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(_) => continue,
        };
        if file_type.is_dir() {
            if IGNORED_DIRS.contains(&name.as_str()) {
                continue;
            }
            walk(&full, root, files);
        } else if file_type.is_file() && name.to_lowercase().ends_with(".json") {
            let rel = full
                .strip_prefix(root)
                .unwrap_or(&full)
                .to_string_lossy()
                .replace('\\', "/");
            files.push(rel);
        }
    }
}

/// Walk the candidate roots under `repo_root` and classify what they hold.
pub fn discover_sources(repo_root: &Path) -> Vec<DiscoveredSource> {
    let mut sources = Vec::new();
    let mut seen = BTreeSet::new();

    for candidate in DEFAULT_ROOTS {
        let root = repo_root.join(candidate);
        if !root.is_dir() {
            continue;
        }
        let mut files = Vec::new();
        walk(&root, repo_root, &mut files);
        for file in files {
            if !seen.insert(file.clone()) || is_excluded(&file) {
                continue;
            }
            sources.push(DiscoveredSource {
                kind: guess_kind(&file),
                path: file,
            });
        }
    }

    // Fallback: unrestricted scan of the top-level asset directory.
    if sources.is_empty() {
        let fallback = repo_root.join(FALLBACK_ROOT);
        if fallback.is_dir() {
            let mut files = Vec::new();
            walk(&fallback, repo_root, &mut files);
            for file in files {
                if !seen.insert(file.clone()) || is_excluded(&file) {
                    continue;
                }
                sources.push(DiscoveredSource {
                    kind: guess_kind(&file),
                    path: file,
                });
            }
        }
    }

    sources
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    struct TempRepo {
        root: PathBuf,
    }

    impl TempRepo {
        fn new(prefix: &str) -> Self {
            let unique = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock should be after unix epoch")
                .as_nanos();
            let root = std::env::temp_dir().join(format!(
                "catalint-discover-{prefix}-{}-{unique}",
                std::process::id()
            ));
            fs::create_dir_all(&root).expect("temp repo should be created");
            Self { root }
        }

        fn write(&self, rel: &str, contents: &str) {
            let path = self.root.join(rel);
            fs::create_dir_all(path.parent().expect("rel path has a parent"))
                .expect("fixture dirs should be created");
            fs::write(path, contents).expect("fixture should write");
        }
    }

    impl Drop for TempRepo {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.root);
        }
    }

    #[test]
    fn discovers_classifies_and_excludes() {
        let repo = TempRepo::new("basic");
        repo.write("wwwroot/data/hv-kits.json", "{}");
        repo.write("wwwroot/data/pages/steden.json", "[]");
        repo.write("wwwroot/data/fitments/ford.json", "{}");
        repo.write("wwwroot/data/build-info.json", "{}");
        repo.write("wwwroot/data/.hidden.json", "{}");
        repo.write("wwwroot/data/notes.txt", "x");
        repo.write("wwwroot/data/node_modules/pkg/x.json", "{}");

        let sources = discover_sources(&repo.root);
        let paths: Vec<&str> = sources.iter().map(|s| s.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["wwwroot/data/hv-kits.json", "wwwroot/data/pages/steden.json"]
        );
        assert_eq!(sources[0].kind, SourceKind::SetRecords);
        assert_eq!(sources[1].kind, SourceKind::PageRecords);
    }

    #[test]
    fn missing_roots_are_silently_skipped() {
        let repo = TempRepo::new("empty");
        assert!(discover_sources(&repo.root).is_empty());
    }

    #[test]
    fn falls_back_to_unrestricted_asset_scan() {
        let repo = TempRepo::new("fallback");
        repo.write("wwwroot/misc/skus.json", "[]");
        let sources = discover_sources(&repo.root);
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].path, "wwwroot/misc/skus.json");
        assert_eq!(sources[0].kind, SourceKind::SetRecords);
    }

    #[test]
    fn deduplicates_across_overlapping_roots() {
        let repo = TempRepo::new("dedupe");
        // wwwroot/data and wwwroot/assets/data both resolve under wwwroot;
        // the same file must not be reported twice via the fallback.
        repo.write("data/kits.json", "[]");
        let sources = discover_sources(&repo.root);
        assert_eq!(sources.len(), 1);
    }
}
