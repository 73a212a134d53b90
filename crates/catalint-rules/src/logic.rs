//! The logic rule engine.
//!
//! Operates per record, branching by source type. Every rule appends
//! findings in encounter order; the suffix statistics are folded through the
//! pass and returned as a value, so the engine stays side-effect-free.

use catalint_kernel::{
    ENUM_FIELDS, Finding, FindingContext, KeywordClassifier, LoadedSource, RuleConfig, SourceKind,
    SuffixStats, axle_active, codes, copy_text, is_mad_style, mapped_application, record_id,
    set_code, set_refs, str_field,
};
use serde_json::Value;
use std::collections::BTreeMap;

/// Result of one logic pass.
#[derive(Debug)]
pub struct LogicOutcome {
    pub findings: Vec<Finding>,
    pub stats: SuffixStats,
}

/// Fields that make two references to the same set conflicting when they
/// disagree.
const CONFLICT_FIELDS: &[&str] = &["axle", "solutionLevel", "springApplication", "includesFSD"];

/// Fields that justify a page listing more than one set.
const DIFFERENTIATOR_FIELDS: &[&str] = &[
    "axle",
    "solutionLevel",
    "springApplication",
    "includesFSD",
    "useCase",
    "tags",
];

/// Run every logic rule over the loaded set.
pub fn validate_logic(
    loaded: &[LoadedSource],
    config: &RuleConfig,
    classifier: &dyn KeywordClassifier,
) -> LogicOutcome {
    let mut findings = Vec::new();
    let mut stats = SuffixStats::for_map(&config.suffix_map);

    for src in loaded {
        match src.kind {
            SourceKind::SetRecords => {
                validate_set_source(src, config, classifier, &mut findings, &mut stats);
            }
            SourceKind::PageRecords => {
                validate_page_source(src, config, classifier, &mut findings);
            }
        }
    }

    LogicOutcome { findings, stats }
}

fn validate_set_source(
    src: &LoadedSource,
    config: &RuleConfig,
    classifier: &dyn KeywordClassifier,
    findings: &mut Vec<Finding>,
    stats: &mut SuffixStats,
) {
    for (idx, record) in src.records().iter().enumerate() {
        let code = set_code(record).map(str::to_string);
        let ctx = FindingContext {
            source_file: src.display_path().to_string(),
            record_id: Some(code.clone().unwrap_or_else(|| format!("idx:{idx}"))),
            set_code: code.clone(),
            path: String::new(),
        };

        check_enums(record, config, &ctx, findings);
        check_mad_rules(record, config, &ctx, findings);
        check_copy(record, classifier, &ctx, findings);

        // Statistics deliberately include legacy codes: any record whose
        // rightmost digit maps counts toward the distribution.
        if let Some(code) = &code
            && let Some((digit, _)) = mapped_application(code, &config.suffix_map)
        {
            stats.record(code, digit);
        }
    }
}

fn validate_page_source(
    src: &LoadedSource,
    config: &RuleConfig,
    classifier: &dyn KeywordClassifier,
    findings: &mut Vec<Finding>,
) {
    for (idx, record) in src.records().iter().enumerate() {
        let ctx = FindingContext {
            source_file: src.display_path().to_string(),
            record_id: Some(record_id(record, idx)),
            set_code: None,
            path: String::new(),
        };

        check_enums(record, config, &ctx, findings);
        check_set_refs(record, config, &ctx, findings);
        check_axle_config(record, &ctx, findings);
        check_internal_links(record, &ctx, findings);
        check_copy(record, classifier, &ctx, findings);
    }
}

/// Enum rule: a configured allow-list plus a non-empty value not in it is an
/// error, whatever the value's type. Unconfigured fields are open-world;
/// null, `false`, zero, and the empty string count as absent.
fn check_enums(
    record: &Value,
    config: &RuleConfig,
    ctx: &FindingContext,
    findings: &mut Vec<Finding>,
) {
    for field in ENUM_FIELDS {
        let Some(allowed) = config.allowed_values(field) else {
            continue;
        };
        let Some(value) = record.get(field) else {
            continue;
        };
        let shown = match value {
            Value::Null | Value::Bool(false) => continue,
            Value::Number(n) if n.as_f64() == Some(0.0) => continue,
            Value::String(s) if s.is_empty() => continue,
            Value::String(s) => {
                if allowed.iter().any(|a| a == s) {
                    continue;
                }
                s.clone()
            }
            other => serde_json::to_string(other).unwrap_or_default(),
        };
        findings.push(Finding::error(
            codes::L004_UNKNOWN_ENUM,
            format!("Unknown {field}: {shown}"),
            ctx,
        ));
    }
}

/// MAD suffix rules, enforced only on strict MAD-style codes so legacy
/// identifiers never produce false positives.
fn check_mad_rules(
    record: &Value,
    config: &RuleConfig,
    ctx: &FindingContext,
    findings: &mut Vec<Finding>,
) {
    let Some(code) = set_code(record) else {
        return;
    };
    if !is_mad_style(code) {
        return;
    }

    let Some((_, mapped)) = mapped_application(code, &config.suffix_map) else {
        findings.push(Finding::error(
            codes::L100_MAD_SUFFIX_UNPARSEABLE,
            format!("Suffix not parseable for {code}"),
            ctx,
        ));
        return;
    };

    if let Some(declared) = str_field(record, "springApplication")
        && declared != mapped
    {
        findings.push(Finding::error(
            codes::L101_MAD_SUFFIX_APPLICATION_CONTRADICTION,
            format!("springApplication={declared} contradicts MAD suffix {mapped}"),
            ctx,
        ));
    }

    // SD-family members include FSD by definition; an explicit false is a
    // logical impossibility, not a style issue.
    if catalint_kernel::has_sd_prefix(code)
        && record.get("includesFSD").and_then(Value::as_bool) == Some(false)
    {
        findings.push(Finding::error(
            codes::L102_SD_INCLUDESFSD_CONTRADICTION,
            "SD set must include FSD",
            ctx,
        ));
    }
}

/// Copy-contradiction rule. WARN only: free text is not authoritative.
fn check_copy(
    record: &Value,
    classifier: &dyn KeywordClassifier,
    ctx: &FindingContext,
    findings: &mut Vec<Finding>,
) {
    let Some(spring) = str_field(record, "springApplication") else {
        return;
    };
    let text = copy_text(record, true);
    if text.is_empty() {
        return;
    }
    let signals = classifier.signals(&text);
    if spring == "replacement" && signals.assist {
        findings.push(Finding::warn(
            codes::L110_REPLACEMENT_COPY_SAYS_ASSIST,
            "Copy hints assist while springApplication=replacement",
            ctx,
        ));
    }
    if spring == "assist" && signals.replacement {
        findings.push(Finding::warn(
            codes::L111_ASSIST_COPY_SAYS_REPLACEMENT,
            "Copy hints replacement while springApplication=assist",
            ctx,
        ));
    }
}

fn stringified(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "\"\"".to_string(),
        Some(v) => serde_json::to_string(v).unwrap_or_default(),
    }
}

fn check_set_refs(
    page: &Value,
    config: &RuleConfig,
    ctx_base: &FindingContext,
    findings: &mut Vec<Finding>,
) {
    let refs = set_refs(page);
    let mut seen: BTreeMap<&str, &Value> = BTreeMap::new();

    for (idx, set_ref) in refs.iter().enumerate() {
        let mut ctx = ctx_base.at_path(format!("/sets/{idx}"));
        ctx.set_code = str_field(set_ref, "setCode").map(str::to_string);

        let Some(code) = str_field(set_ref, "setCode") else {
            findings.push(Finding::error(
                codes::L006_MISSING_SET_CODE,
                "Set reference missing setCode",
                &ctx,
            ));
            continue;
        };
        check_enums(set_ref, config, &ctx, findings);

        match seen.get(code) {
            Some(prev) => {
                let conflict = CONFLICT_FIELDS.iter().any(|field| {
                    match (prev.get(*field), set_ref.get(*field)) {
                        (Some(a), Some(b)) => {
                            !a.is_null() && !b.is_null() && a != b
                        }
                        _ => false,
                    }
                });
                if conflict {
                    findings.push(Finding::error(
                        codes::L005_DUPLICATE_SET_CONFLICT,
                        format!("Conflicting data for setCode {code}"),
                        &ctx,
                    ));
                }
            }
            None => {
                seen.insert(code, set_ref);
            }
        }
    }

    if refs.len() > 1 {
        let keys: Vec<String> = refs
            .iter()
            .map(|set_ref| {
                DIFFERENTIATOR_FIELDS
                    .iter()
                    .map(|field| stringified(set_ref.get(*field)))
                    .collect::<Vec<_>>()
                    .join("|")
            })
            .collect();
        if keys.iter().all(|key| key == &keys[0]) {
            findings.push(Finding::warn(
                codes::L003_MULTISET_NO_DIFFERENTIATORS,
                "Multiple sets but no differentiators (axle/useCase/tags).",
                ctx_base,
            ));
        }
    }
}

/// Axle-configuration consistency: the declared `axleConfig` against the
/// structured flags and the set-reference axle tags.
fn check_axle_config(page: &Value, ctx: &FindingContext, findings: &mut Vec<Finding>) {
    let refs = set_refs(page);
    let has_front_set = refs.iter().any(|s| str_field(s, "axle") == Some("front"));
    let has_rear_set = refs.iter().any(|s| str_field(s, "axle") == Some("rear"));
    let front_active = axle_active(page, "front");
    let rear_active = axle_active(page, "rear");

    let front_signal = front_active || has_front_set;
    let rear_signal = rear_active || has_rear_set;

    match str_field(page, "axleConfig") {
        Some("both") if !(front_signal && rear_signal) => {
            findings.push(Finding::error(
                codes::L001_AXLECONFIG_BOTH_INCOMPLETE,
                "axleConfig=both but only one axle active/present",
                ctx,
            ));
        }
        Some("front") if rear_signal => {
            findings.push(Finding::warn(
                codes::L002_AXLECONFIG_MISMATCH,
                "axleConfig=front but rear data present",
                ctx,
            ));
        }
        Some("rear") if front_signal => {
            findings.push(Finding::warn(
                codes::L002_AXLECONFIG_MISMATCH,
                "axleConfig=rear but front data present",
                ctx,
            ));
        }
        _ => {}
    }
}

/// Internal link sanity: a bare string normalizes to a one-element list.
fn check_internal_links(page: &Value, ctx: &FindingContext, findings: &mut Vec<Finding>) {
    let Some(links) = page.get("internalLinks") else {
        return;
    };
    let normalized: Vec<&Value> = match links {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };
    for (idx, link) in normalized.iter().enumerate() {
        let broken = match link {
            Value::String(s) => s.trim().is_empty(),
            _ => true,
        };
        if broken {
            findings.push(Finding::warn(
                codes::L007_BROKEN_INTERNAL_LINKS,
                "Internal link is empty/non-string",
                &ctx.at_path(format!("/internalLinks/{idx}")),
            ));
        }
    }
}
