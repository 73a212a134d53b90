//! Shared CLI plumbing: run-context construction and exit helpers.

use catalint_kernel::RuleConfig;
use catalint_pipeline::{OUT_ROOT, SchemaSet};
use std::path::{Path, PathBuf};

/// Everything a pipeline command needs, resolved once from the global flags.
pub struct RunContext {
    pub repo_root: PathBuf,
    pub out_root: PathBuf,
    pub config: RuleConfig,
    pub schemas: SchemaSet,
}

pub fn build_context(root: &str, out: Option<&str>, config_dir: Option<&str>) -> RunContext {
    let repo_root = PathBuf::from(root);
    let out_root = out
        .map(PathBuf::from)
        .unwrap_or_else(|| repo_root.join(OUT_ROOT));

    let config = match config_dir {
        Some(dir) => {
            RuleConfig::load(Path::new(dir)).unwrap_or_else(|e| exit_with(&e.to_string()))
        }
        None => RuleConfig::embedded(),
    };
    let schemas = match config_dir {
        Some(dir) => SchemaSet::load(Path::new(dir)),
        None => SchemaSet::embedded(),
    }
    .unwrap_or_else(|e| exit_with(&e.to_string()));

    RunContext {
        repo_root,
        out_root,
        config,
        schemas,
    }
}

/// Setup failures (unreadable config, broken schema, unwritable output) are
/// process-level, unlike per-source findings.
pub fn exit_with(message: &str) -> ! {
    eprintln!("error: {message}");
    std::process::exit(2);
}
