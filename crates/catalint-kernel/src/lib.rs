//! # Catalint Kernel
//!
//! The domain model for the catalog data-quality pipeline: the finding
//! taxonomy, duck-typed record classification, MAD suffix semantics, the
//! keyword classifier seam, and rule configuration.
//!
//! Everything here is pure value manipulation. Stages downstream
//! (discovery, loading, validation, derivation) live in `catalint-pipeline`
//! and `catalint-rules`; this crate gives them a shared vocabulary.

pub mod artifact;
pub mod config;
pub mod finding;
pub mod record;
pub mod source;
pub mod suffix;
pub mod text;

pub use artifact::{DerivedOutput, FileFixes, FixEdit};
pub use config::{ConfigError, ENUM_FIELDS, RuleConfig};
pub use finding::{Finding, FindingContext, Severity, codes, has_error};
pub use record::{RecordKind, SourceKind, SourceShape, axle_active, record_id, set_code, set_refs, str_field};
pub use source::{DiscoveredSource, LoadedSource};
pub use suffix::{
    SuffixDerivation, SuffixMap, SuffixStats, derive_from_suffix, has_hv_prefix, has_sd_prefix,
    is_mad_style, mapped_application, rightmost_digit,
};
pub use text::{KeywordClassifier, RegexKeywordClassifier, TextSignals, copy_text, spring_from_text};
