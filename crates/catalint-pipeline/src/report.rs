//! Markdown report rendering. Pure: findings, sources, and suffix stats in,
//! one document out.

use catalint_kernel::{DiscoveredSource, Finding, Severity, SourceKind, SuffixStats, codes};

const ERROR_LIMIT: usize = 20;
const CODE_LIMIT: usize = 10;

fn severity_counts(findings: &[Finding]) -> (usize, usize, usize) {
    let mut info = 0;
    let mut warn = 0;
    let mut error = 0;
    for finding in findings {
        match finding.severity {
            Severity::Info => info += 1,
            Severity::Warn => warn += 1,
            Severity::Error => error += 1,
        }
    }
    (info, warn, error)
}

/// Finding codes by frequency, descending; ties keep first-seen order.
fn most_common_codes(findings: &[Finding], limit: usize) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for finding in findings {
        match counts.iter_mut().find(|(code, _)| *code == finding.code) {
            Some((_, count)) => *count += 1,
            None => counts.push((finding.code.clone(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1)); // stable: first-seen wins ties
    counts.truncate(limit);
    counts
}

pub fn render_report_md(
    findings: &[Finding],
    sources: &[DiscoveredSource],
    stats: &SuffixStats,
) -> String {
    let (info, warn, error) = severity_counts(findings);
    let errors: Vec<&Finding> = findings
        .iter()
        .filter(|f| f.severity == Severity::Error)
        .take(ERROR_LIMIT)
        .collect();
    let common = most_common_codes(findings, CODE_LIMIT);
    let contradictions: Vec<&Finding> = findings
        .iter()
        .filter(|f| {
            f.code == codes::L101_MAD_SUFFIX_APPLICATION_CONTRADICTION
                || f.code == codes::L102_SD_INCLUDESFSD_CONTRADICTION
        })
        .collect();

    let mut lines: Vec<String> = Vec::new();
    lines.push("# Data quality report".to_string());
    lines.push(String::new());
    lines.push(format!("- INFO: {info}"));
    lines.push(format!("- WARN: {warn}"));
    lines.push(format!("- ERROR: {error}"));
    lines.push(String::new());

    lines.push("## Top ERROR findings".to_string());
    if errors.is_empty() {
        lines.push("No ERROR findings.".to_string());
    } else {
        for f in &errors {
            let record = f
                .record_id
                .as_deref()
                .map(|id| format!(", record: {id}"))
                .unwrap_or_default();
            lines.push(format!(
                "- [{}] {} (source: {}{record})",
                f.code, f.message, f.source_file
            ));
        }
    }
    lines.push(String::new());

    lines.push("## Most common codes".to_string());
    for (code, count) in &common {
        lines.push(format!("- {code}: {count}"));
    }
    lines.push(String::new());

    lines.push("## Discovered sources".to_string());
    for source in sources {
        let kind = match source.kind {
            SourceKind::SetRecords => "setRecords",
            SourceKind::PageRecords => "pageRecords",
        };
        lines.push(format!("- {kind} — {}", source.path));
    }
    lines.push(String::new());

    lines.push("## MAD suffix compliance".to_string());
    lines.push(format!("- Total HV/SD parsed: {}", stats.total));
    lines.push(format!("  - HV: {}, SD: {}", stats.hv, stats.sd));
    let distribution: Vec<String> = stats
        .counts
        .iter()
        .map(|(digit, count)| format!("{digit}:{count}"))
        .collect();
    lines.push(format!("  - Suffix distribution: {}", distribution.join(", ")));
    if contradictions.is_empty() {
        lines.push("- No MAD conflicts.".to_string());
    } else {
        lines.push("- Conflicts:".to_string());
        for f in &contradictions {
            lines.push(format!(
                "  - {} ({}): {}",
                f.record_id.as_deref().unwrap_or_default(),
                f.source_file,
                f.message
            ));
        }
    }
    lines.push(String::new());

    lines.push("## Next actions".to_string());
    lines.push("- Fix ERROR findings first; WARN findings are non-blocking but worth picking up.".to_string());
    lines.push("- Review the derived fields under `out/derived` before adopting them.".to_string());

    lines.join("\n")
}
