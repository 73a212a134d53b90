//! Structural validation against the two record schemas.
//!
//! The schema engine is a black box: compile once, validate each record,
//! collect structured errors. Schema choice is duck-typed per record (a
//! string `setCode` selects the set schema), matching the record
//! classification done everywhere else.

use catalint_kernel::{
    Finding, FindingContext, LoadedSource, RecordKind, SourceShape, codes, record_id, str_field,
};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::fs;
use std::path::Path;

const DEFAULT_SET_SCHEMA: &str = include_str!("../schema/set-record.schema.json");
const DEFAULT_PAGE_SCHEMA: &str = include_str!("../schema/page-record.schema.json");

pub const SET_SCHEMA_FILE: &str = "set-record.schema.json";
pub const PAGE_SCHEMA_FILE: &str = "page-record.schema.json";

/// Schema messages are capped so one pathological record cannot flood the
/// report.
const MESSAGE_LIMIT: usize = 2000;

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("failed to read schema {file}: {source}")]
    Read {
        file: String,
        source: std::io::Error,
    },
    #[error("failed to parse schema {file}: {source}")]
    Parse {
        file: String,
        source: serde_json::Error,
    },
    #[error("failed to compile schema {file}: {message}")]
    Compile { file: String, message: String },
}

pub struct SchemaSet {
    set: JSONSchema,
    page: JSONSchema,
}

impl SchemaSet {
    /// Compile the embedded schemas.
    pub fn embedded() -> Result<Self, SchemaError> {
        Ok(Self {
            set: compile(DEFAULT_SET_SCHEMA, "<embedded set>")?,
            page: compile(DEFAULT_PAGE_SCHEMA, "<embedded page>")?,
        })
    }

    /// Embedded schemas with per-file overrides from `dir`.
    pub fn load(dir: &Path) -> Result<Self, SchemaError> {
        Ok(Self {
            set: compile_file_or(dir.join(SET_SCHEMA_FILE), DEFAULT_SET_SCHEMA)?,
            page: compile_file_or(dir.join(PAGE_SCHEMA_FILE), DEFAULT_PAGE_SCHEMA)?,
        })
    }

    /// Validate every record of every loaded source.
    pub fn validate(&self, loaded: &[LoadedSource]) -> Vec<Finding> {
        let mut findings = Vec::new();
        for src in loaded {
            self.validate_source(src, &mut findings);
        }
        findings
    }

    fn validate_source(&self, src: &LoadedSource, findings: &mut Vec<Finding>) {
        // Symmetric with discovery's exclusion, defense in depth: generated
        // artifacts may still arrive via explicit paths.
        let file = src.abs_path.to_string_lossy().to_lowercase();
        if file.contains("/fitments/") || file.ends_with("build-info.json") {
            return;
        }

        let ctx = FindingContext::for_source(src.display_path());
        if src.shape == SourceShape::Opaque {
            findings.push(Finding::warn(
                codes::UNSUPPORTED_SOURCE_SHAPE,
                "Could not extract a record list from this source; skipped schema validation.",
                &ctx,
            ));
            return;
        }

        for (idx, record) in src.records().iter().enumerate() {
            let (kind_name, schema) = match RecordKind::classify(record) {
                RecordKind::Set => ("set", &self.set),
                RecordKind::Page => ("page", &self.page),
            };
            let Err(errors) = schema.validate(record) else {
                continue;
            };

            let mut first_pointer = String::new();
            let details: Vec<String> = errors
                .enumerate()
                .map(|(err_idx, err)| {
                    let pointer = err.instance_path.to_string();
                    if err_idx == 0 {
                        first_pointer = pointer.clone();
                    }
                    let shown = if pointer.is_empty() { "/" } else { &pointer };
                    format!("{shown} {err}")
                })
                .collect();

            let message = truncate(
                &format!(
                    "{kind_name}-record schema failed at index {idx}: {}",
                    details.join("; ")
                ),
                MESSAGE_LIMIT,
            );
            findings.push(Finding {
                record_id: Some(record_id(record, idx)),
                set_code: str_field(record, "setCode").map(str::to_string),
                path: first_pointer,
                ..Finding::error(codes::SCHEMA_INVALID, message, &ctx)
            });
        }
    }
}

fn compile(raw: &str, file: &str) -> Result<JSONSchema, SchemaError> {
    let value: Value = serde_json::from_str(raw).map_err(|source| SchemaError::Parse {
        file: file.to_string(),
        source,
    })?;
    JSONSchema::compile(&value).map_err(|err| SchemaError::Compile {
        file: file.to_string(),
        message: err.to_string(),
    })
}

fn compile_file_or(path: std::path::PathBuf, fallback: &str) -> Result<JSONSchema, SchemaError> {
    if !path.is_file() {
        return compile(fallback, "<embedded>");
    }
    let raw = fs::read_to_string(&path).map_err(|source| SchemaError::Read {
        file: path.display().to_string(),
        source,
    })?;
    compile(&raw, &path.display().to_string())
}

fn truncate(message: &str, limit: usize) -> String {
    if message.chars().count() <= limit {
        message.to_string()
    } else {
        message.chars().take(limit).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalint_kernel::SourceKind;
    use serde_json::json;

    fn loaded(path: &str, kind: SourceKind, json: Value) -> LoadedSource {
        LoadedSource {
            source: path.to_string(),
            abs_path: Path::new("/repo").join(path),
            kind,
            shape: SourceShape::resolve(&json),
            json,
        }
    }

    #[test]
    fn valid_records_produce_no_findings() {
        let schemas = SchemaSet::embedded().expect("embedded schemas compile");
        let src = loaded(
            "data/kits.json",
            SourceKind::SetRecords,
            json!([{"setCode": "HV-133375", "includesFSD": false}]),
        );
        assert!(schemas.validate(&[src]).is_empty());
    }

    #[test]
    fn type_violation_is_schema_invalid_with_pointer() {
        let schemas = SchemaSet::embedded().expect("embedded schemas compile");
        let src = loaded(
            "data/kits.json",
            SourceKind::SetRecords,
            json!([{"setCode": "HV-133375", "includesFSD": "yes"}]),
        );
        let findings = schemas.validate(&[src]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].code, codes::SCHEMA_INVALID);
        assert!(findings[0].message.starts_with("set-record schema failed at index 0:"));
        assert_eq!(findings[0].path, "/includesFSD");
        assert_eq!(findings[0].record_id.as_deref(), Some("idx:0"));
        assert_eq!(findings[0].set_code.as_deref(), Some("HV-133375"));
    }

    #[test]
    fn records_without_set_code_use_the_page_schema() {
        let schemas = SchemaSet::embedded().expect("embedded schemas compile");
        let src = loaded(
            "data/pages.json",
            SourceKind::PageRecords,
            json!([{"slug": "p", "sets": "not-an-array"}]),
        );
        let findings = schemas.validate(&[src]);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.starts_with("page-record schema failed"));
        assert_eq!(findings[0].record_id.as_deref(), Some("p"));
    }

    #[test]
    fn opaque_source_warns_and_is_skipped() {
        let schemas = SchemaSet::embedded().expect("embedded schemas compile");
        let src = loaded("data/odd.json", SourceKind::PageRecords, json!("scalar"));
        let findings = schemas.validate(&[src]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].code, codes::UNSUPPORTED_SOURCE_SHAPE);
    }

    #[test]
    fn fitments_and_build_info_are_skipped() {
        let schemas = SchemaSet::embedded().expect("embedded schemas compile");
        let fitment = loaded(
            "data/fitments/ford.json",
            SourceKind::PageRecords,
            json!("scalar"),
        );
        let build_info = loaded(
            "data/build-info.json",
            SourceKind::PageRecords,
            json!("scalar"),
        );
        assert!(schemas.validate(&[fitment, build_info]).is_empty());
    }
}
