//! # Catalint Pipeline
//!
//! The outer stages of the data-quality run: source discovery, fault-isolated
//! JSON loading, black-box schema validation, Markdown report rendering, and
//! artifact writing. The domain rules themselves live in `catalint-rules`.
//!
//! The pipeline is single-threaded and synchronous: each stage fully consumes
//! its input before the next begins, and every per-file failure becomes a
//! finding rather than an abort.

pub mod discover;
pub mod load;
pub mod output;
pub mod report;
pub mod schema;

pub use discover::{OUT_ROOT, discover_sources};
pub use load::{LoadError, load_all, read_source, resolve_path};
pub use output::{OutputError, write_derived, write_fixes, write_reports};
pub use report::render_report_md;
pub use schema::{SchemaError, SchemaSet};
