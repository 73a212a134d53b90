//! Source and record classification.
//!
//! Catalog records are duck-typed JSON: nothing in the data tags a record as
//! a set or a page. The classification and the source-shape resolution both
//! happen exactly once (at load time) and are carried as explicit tags from
//! then on, so downstream stages never re-guess.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Heuristic classification of a source file, not ground truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    #[serde(rename = "setRecords")]
    SetRecords,
    #[serde(rename = "pageRecords")]
    PageRecords,
}

/// How a source document carries its records.
///
/// Resolved once from the parsed JSON; `Opaque` means no record list could
/// be extracted (reported as `UNSUPPORTED_SOURCE_SHAPE`, never fatal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceShape {
    /// An object wrapping a `kits` array; the wrapper fields must survive
    /// derivation untouched.
    KitsContainer,
    /// The document itself is the record array.
    BareArray,
    /// An object with a `records` array.
    RecordsField,
    /// A single record object, treated as a one-element list.
    SingleObject,
    Opaque,
}

impl SourceShape {
    pub fn resolve(json: &Value) -> Self {
        match json {
            Value::Array(_) => Self::BareArray,
            Value::Object(map) => {
                if map.get("kits").is_some_and(Value::is_array) {
                    Self::KitsContainer
                } else if map.get("records").is_some_and(Value::is_array) {
                    Self::RecordsField
                } else {
                    Self::SingleObject
                }
            }
            _ => Self::Opaque,
        }
    }

    /// The record list this shape exposes. `Opaque` sources have none.
    pub fn records<'a>(&self, json: &'a Value) -> &'a [Value] {
        match self {
            Self::BareArray => json.as_array().map(Vec::as_slice).unwrap_or(&[]),
            Self::KitsContainer => json
                .get("kits")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
            Self::RecordsField => json
                .get("records")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
            Self::SingleObject => std::slice::from_ref(json),
            Self::Opaque => &[],
        }
    }

    /// JSON Pointer prefix addressing record `idx` inside the source document.
    pub fn record_pointer(&self, idx: usize) -> String {
        match self {
            Self::BareArray => format!("/{idx}"),
            Self::KitsContainer => format!("/kits/{idx}"),
            Self::RecordsField => format!("/records/{idx}"),
            Self::SingleObject | Self::Opaque => String::new(),
        }
    }
}

/// Duck-typed record kind: a set record carries a string `setCode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Set,
    Page,
}

impl RecordKind {
    pub fn classify(record: &Value) -> Self {
        if record.get("setCode").is_some_and(Value::is_string) {
            Self::Set
        } else {
            Self::Page
        }
    }
}

/// Non-empty string field accessor.
pub fn str_field<'a>(record: &'a Value, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// A set record's identifier: `setCode`, or legacy `sku`.
pub fn set_code(record: &Value) -> Option<&str> {
    str_field(record, "setCode").or_else(|| str_field(record, "sku"))
}

/// Record attribution for findings: explicit `id`/`slug`, else `idx:<n>`.
pub fn record_id(record: &Value, idx: usize) -> String {
    str_field(record, "id")
        .or_else(|| str_field(record, "slug"))
        .map(str::to_string)
        .unwrap_or_else(|| format!("idx:{idx}"))
}

/// Structured axle flag: `axles.<side>.active` is truthy.
pub fn axle_active(record: &Value, side: &str) -> bool {
    record
        .get("axles")
        .and_then(|axles| axles.get(side))
        .and_then(|axle| axle.get("active"))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// The page's embedded set references (`sets` array), or empty.
pub fn set_refs(record: &Value) -> &[Value] {
    record
        .get("sets")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
