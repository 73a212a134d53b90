//! The finding taxonomy shared by every pipeline stage.
//!
//! Findings are append-only and never deduplicated; their order is
//! stage-then-record encounter order, which the report renderer relies on
//! for its stable tie-breaking.

use serde::{Deserialize, Serialize};

/// Severity of a finding.
///
/// `Info` is part of the severity space but unused by the current rules.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Warn,
    Error,
}

/// Finding codes emitted by the pipeline.
///
/// The `L0xx` range covers structural/page rules, `L1xx` the MAD domain
/// rules, and the unprefixed codes the load/schema stages.
pub mod codes {
    pub const LOAD_FAILED: &str = "LOAD_FAILED";
    pub const UNSUPPORTED_SOURCE_SHAPE: &str = "UNSUPPORTED_SOURCE_SHAPE";
    pub const SCHEMA_INVALID: &str = "SCHEMA_INVALID";

    pub const L001_AXLECONFIG_BOTH_INCOMPLETE: &str = "L001_AXLECONFIG_BOTH_INCOMPLETE";
    pub const L002_AXLECONFIG_MISMATCH: &str = "L002_AXLECONFIG_MISMATCH";
    pub const L003_MULTISET_NO_DIFFERENTIATORS: &str = "L003_MULTISET_NO_DIFFERENTIATORS";
    pub const L004_UNKNOWN_ENUM: &str = "L004_UNKNOWN_ENUM";
    pub const L005_DUPLICATE_SET_CONFLICT: &str = "L005_DUPLICATE_SET_CONFLICT";
    pub const L006_MISSING_SET_CODE: &str = "L006_MISSING_SET_CODE";
    pub const L007_BROKEN_INTERNAL_LINKS: &str = "L007_BROKEN_INTERNAL_LINKS";

    pub const L100_MAD_SUFFIX_UNPARSEABLE: &str = "L100_MAD_SUFFIX_UNPARSEABLE";
    pub const L101_MAD_SUFFIX_APPLICATION_CONTRADICTION: &str =
        "L101_MAD_SUFFIX_APPLICATION_CONTRADICTION";
    pub const L102_SD_INCLUDESFSD_CONTRADICTION: &str = "L102_SD_INCLUDESFSD_CONTRADICTION";

    pub const L110_REPLACEMENT_COPY_SAYS_ASSIST: &str = "L110_REPLACEMENT_COPY_SAYS_ASSIST";
    pub const L111_ASSIST_COPY_SAYS_REPLACEMENT: &str = "L111_ASSIST_COPY_SAYS_REPLACEMENT";
}

/// Source/record attribution carried by every finding emitted for a record.
///
/// Built once per record and cloned into each finding, so rule functions
/// only decide severity, code, and message.
#[derive(Debug, Clone, Default)]
pub struct FindingContext {
    pub source_file: String,
    pub record_id: Option<String>,
    pub set_code: Option<String>,
    pub path: String,
}

impl FindingContext {
    pub fn for_source(source_file: impl Into<String>) -> Self {
        Self {
            source_file: source_file.into(),
            ..Self::default()
        }
    }

    /// Same attribution with a different JSON path.
    pub fn at_path(&self, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..self.clone()
        }
    }
}

/// One validation result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub severity: Severity,
    pub code: String,
    pub message: String,
    pub source_file: String,
    pub record_id: Option<String>,
    pub set_code: Option<String>,
    pub path: String,
}

impl Finding {
    pub fn new(
        severity: Severity,
        code: &str,
        message: impl Into<String>,
        ctx: &FindingContext,
    ) -> Self {
        Self {
            severity,
            code: code.to_string(),
            message: message.into(),
            source_file: ctx.source_file.clone(),
            record_id: ctx.record_id.clone(),
            set_code: ctx.set_code.clone(),
            path: ctx.path.clone(),
        }
    }

    pub fn error(code: &str, message: impl Into<String>, ctx: &FindingContext) -> Self {
        Self::new(Severity::Error, code, message, ctx)
    }

    pub fn warn(code: &str, message: impl Into<String>, ctx: &FindingContext) -> Self {
        Self::new(Severity::Warn, code, message, ctx)
    }
}

/// True when at least one finding is an `ERROR` (drives the exit code).
pub fn has_error(findings: &[Finding]) -> bool {
    findings.iter().any(|f| f.severity == Severity::Error)
}
