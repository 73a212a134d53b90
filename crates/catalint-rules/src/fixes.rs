//! Fix suggestions.
//!
//! Proposes additive edits for set records whose codes carry the MAD prefix
//! conventions. Suggestions never overwrite: a field already present in the
//! record, whatever its value, is left alone and the contradiction (if any)
//! is the logic rules' business.

use catalint_kernel::{
    FileFixes, FixEdit, LoadedSource, RuleConfig, SourceKind, has_hv_prefix, has_sd_prefix,
    mapped_application, set_code,
};
use serde_json::Value;

/// Suggest edits for every loaded set-record source. Sources without any
/// applicable edit are omitted from the result.
pub fn suggest_fixes(loaded: &[LoadedSource], config: &RuleConfig) -> Vec<FileFixes> {
    loaded
        .iter()
        .filter(|src| src.kind == SourceKind::SetRecords)
        .filter_map(|src| {
            let edits = source_edits(src, config);
            (!edits.is_empty()).then(|| FileFixes {
                file: src.display_path().to_string(),
                edits,
            })
        })
        .collect()
}

fn source_edits(src: &LoadedSource, config: &RuleConfig) -> Vec<FixEdit> {
    let mut edits = Vec::new();
    for (idx, record) in src.records().iter().enumerate() {
        let Some(code) = set_code(record) else {
            continue;
        };
        if !has_hv_prefix(code) && !has_sd_prefix(code) {
            continue;
        }
        let base = src.shape.record_pointer(idx);

        if has_sd_prefix(code) {
            if record.get("includesFSD").is_none() {
                edits.push(FixEdit::addition(format!("{base}/includesFSD"), true));
            }
            if record.get("solutionLevel").is_none() {
                edits.push(FixEdit::addition(
                    format!("{base}/solutionLevel"),
                    "special_duty",
                ));
            }
        }

        if record.get("springApplication").is_none()
            && let Some((_, application)) = mapped_application(code, &config.suffix_map)
        {
            edits.push(FixEdit::addition(
                format!("{base}/springApplication"),
                Value::String(application.to_string()),
            ));
        }
    }
    edits
}
