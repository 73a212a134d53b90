//! Output artifact types: derived-field overlays and fix suggestions.
//!
//! Both are produced on deep copies of loaded records. Nothing here aliases
//! or mutates source JSON, and a fix edit is always an addition: `old` is
//! null by construction because the suggester never proposes overwriting a
//! present value.

use crate::record::SourceKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One source's records with their non-destructively merged `derived`
/// sub-objects. For kits-container sources, `records` holds the single
/// re-wrapped container object so the original shape round-trips.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedOutput {
    pub source_file: String,
    #[serde(rename = "type")]
    pub kind: SourceKind,
    pub records: Vec<Value>,
}

/// An additive edit proposal, addressed by JSON Pointer into the source
/// document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixEdit {
    pub json_pointer: String,
    pub old: Option<Value>,
    pub new: Value,
}

impl FixEdit {
    pub fn addition(json_pointer: impl Into<String>, new: impl Into<Value>) -> Self {
        Self {
            json_pointer: json_pointer.into(),
            old: None,
            new: new.into(),
        }
    }
}

/// All proposed edits for one source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileFixes {
    pub file: String,
    pub edits: Vec<FixEdit>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fix_edit_is_always_an_addition() {
        let edit = FixEdit::addition("/kits/0/includesFSD", true);
        let value = serde_json::to_value(&edit).unwrap();
        assert_eq!(value["jsonPointer"], "/kits/0/includesFSD");
        assert!(value["old"].is_null());
        assert_eq!(value["new"], true);
    }
}
