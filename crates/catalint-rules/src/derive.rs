//! Field derivation.
//!
//! Produces a `derived` overlay per record from the same suffix and text
//! heuristics the logic rules use. Non-destructive by construction: every
//! output record is a deep copy, original fields are never touched, and a
//! kits-container source keeps its container shape so unaffected fields
//! round-trip in their original order.

use catalint_kernel::{
    DerivedOutput, KeywordClassifier, LoadedSource, RuleConfig, SourceKind, SourceShape,
    axle_active, derive_from_suffix, set_code, set_refs, spring_from_text, str_field,
};
use serde_json::{Map, Value};

/// Derive every loaded source. Inputs are read-only; each output record is
/// a new value tree.
pub fn apply_derivations(
    loaded: &[LoadedSource],
    config: &RuleConfig,
    classifier: &dyn KeywordClassifier,
) -> Vec<DerivedOutput> {
    loaded
        .iter()
        .map(|src| derive_source(src, config, classifier))
        .collect()
}

fn derive_source(
    src: &LoadedSource,
    config: &RuleConfig,
    classifier: &dyn KeywordClassifier,
) -> DerivedOutput {
    // Kits containers are re-wrapped so the container fields survive in
    // their original order.
    if src.kind == SourceKind::SetRecords && src.shape == SourceShape::KitsContainer {
        let derived_kits: Vec<Value> = src
            .records()
            .iter()
            .map(|record| derive_set_record(record, config, classifier))
            .collect();
        let mut container = src.json.clone();
        if let Some(map) = container.as_object_mut() {
            map.insert("kits".to_string(), Value::Array(derived_kits));
        }
        return DerivedOutput {
            source_file: src.display_path().to_string(),
            kind: src.kind,
            records: vec![container],
        };
    }

    let records: Vec<Value> = src
        .records()
        .iter()
        .map(|record| match src.kind {
            SourceKind::SetRecords => derive_set_record(record, config, classifier),
            SourceKind::PageRecords => derive_page_record(record, classifier),
        })
        .collect();

    DerivedOutput {
        source_file: src.display_path().to_string(),
        kind: src.kind,
        records,
    }
}

/// Deep copy plus a (possibly pre-existing) `derived` object to merge into.
fn clone_with_derived(record: &Value) -> (Value, Map<String, Value>) {
    let clone = record.clone();
    let derived = clone
        .get("derived")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    (clone, derived)
}

fn attach_derived(mut clone: Value, derived: Map<String, Value>) -> Value {
    if let Some(map) = clone.as_object_mut() {
        map.insert("derived".to_string(), Value::Object(derived));
    }
    clone
}

fn derive_set_record(
    record: &Value,
    config: &RuleConfig,
    classifier: &dyn KeywordClassifier,
) -> Value {
    let (clone, mut derived) = clone_with_derived(record);
    let code = set_code(record).unwrap_or_default();

    if let Some(suffix) = derive_from_suffix(code, &config.suffix_map) {
        derived.insert(
            "springApplication".to_string(),
            Value::String(suffix.application),
        );
        derived.insert(
            "solutionLevel".to_string(),
            Value::String(suffix.solution_level),
        );
        if suffix.includes_fsd {
            derived.insert("includesFSD".to_string(), Value::Bool(true));
        }
        derived.insert(
            "madSuffix".to_string(),
            Value::String(suffix.digit.to_string()),
        );
    } else if let Some(spring) = spring_from_text(classifier, record) {
        // Text fallback cannot infer a solution level.
        derived.insert(
            "springApplication".to_string(),
            Value::String(spring.to_string()),
        );
    }

    attach_derived(clone, derived)
}

/// Structured axle flags win over set-reference tags; both axles active
/// means `both`.
pub fn derive_axle_config(record: &Value) -> Option<&'static str> {
    let front = axle_active(record, "front");
    let rear = axle_active(record, "rear");
    match (front, rear) {
        (true, true) => return Some("both"),
        (true, false) => return Some("front"),
        (false, true) => return Some("rear"),
        (false, false) => {}
    }

    let refs = set_refs(record);
    let has_front = refs.iter().any(|s| str_field(s, "axle") == Some("front"));
    let has_rear = refs.iter().any(|s| str_field(s, "axle") == Some("rear"));
    match (has_front, has_rear) {
        (true, true) => Some("both"),
        (true, false) => Some("front"),
        (false, true) => Some("rear"),
        (false, false) => None,
    }
}

fn derive_page_record(record: &Value, classifier: &dyn KeywordClassifier) -> Value {
    let (clone, mut derived) = clone_with_derived(record);

    if let Some(axle_config) = derive_axle_config(record) {
        derived.insert(
            "axleConfig".to_string(),
            Value::String(axle_config.to_string()),
        );
    }

    if let Some(explicit) = str_field(record, "springApplication") {
        derived.insert(
            "springApplication".to_string(),
            Value::String(explicit.to_string()),
        );
    } else if let Some(spring) = spring_from_text(classifier, record) {
        derived.insert(
            "springApplication".to_string(),
            Value::String(spring.to_string()),
        );
    }

    attach_derived(clone, derived)
}
