use crate::support::{self, RunContext};
use catalint_kernel::{RegexKeywordClassifier, Severity, has_error};
use catalint_pipeline::{
    discover_sources, load_all, render_report_md, write_derived, write_fixes, write_reports,
};
use catalint_rules::{apply_derivations, suggest_fixes, validate_logic};
use serde_json::json;

/// Optional pipeline stages selected by the sub-command.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stages {
    pub derive: bool,
    pub fix: bool,
}

pub fn run(label: &str, ctx: &RunContext, stages: Stages, json_output: bool) {
    let sources = discover_sources(&ctx.repo_root);
    let (loaded, mut findings) = load_all(&ctx.repo_root, &sources);
    findings.extend(ctx.schemas.validate(&loaded));

    let classifier = RegexKeywordClassifier::default();
    let outcome = validate_logic(&loaded, &ctx.config, &classifier);
    findings.extend(outcome.findings);
    let stats = outcome.stats;

    // Reports are written unconditionally, even when errors exist.
    let markdown = render_report_md(&findings, &sources, &stats);
    write_reports(&ctx.out_root, &findings, &sources, &markdown)
        .unwrap_or_else(|e| support::exit_with(&e.to_string()));

    let mut derived_count = 0;
    if stages.derive {
        let outputs = apply_derivations(&loaded, &ctx.config, &classifier);
        derived_count = outputs.len();
        write_derived(&ctx.repo_root, &ctx.out_root, &outputs)
            .unwrap_or_else(|e| support::exit_with(&e.to_string()));
    }

    let mut fix_file_count = 0;
    if stages.fix {
        let fixes = suggest_fixes(&loaded, &ctx.config);
        fix_file_count = fixes.len();
        write_fixes(&ctx.out_root, &fixes)
            .unwrap_or_else(|e| support::exit_with(&e.to_string()));
    }

    let errors = count(&findings, Severity::Error);
    let warnings = count(&findings, Severity::Warn);
    let failed = has_error(&findings);

    if json_output {
        let shapes: Vec<_> = loaded
            .iter()
            .map(|src| {
                json!({
                    "path": src.display_path(),
                    "type": src.kind,
                    "shape": src.shape,
                })
            })
            .collect();
        let payload = json!({
            "command": label,
            "result": if failed { "rejected" } else { "accepted" },
            "sources": sources,
            "loaded": shapes,
            "findings": findings,
            "suffixStats": stats,
            "outDir": ctx.out_root.display().to_string(),
        });
        let rendered = serde_json::to_string_pretty(&payload)
            .unwrap_or_else(|e| support::exit_with(&format!("failed to render payload: {e}")));
        println!("{rendered}");
    } else {
        let verdict = if failed { "FAIL" } else { "OK" };
        println!(
            "[{label}] {verdict} (sources={}, findings={}, errors={errors}, warnings={warnings})",
            sources.len(),
            findings.len()
        );
        if stages.derive {
            println!("[{label}] derived output written for {derived_count} sources");
        }
        if stages.fix {
            println!("[{label}] fix suggestions written for {fix_file_count} files");
        }
        println!("[{label}] reports under {}", ctx.out_root.display());
    }

    if failed {
        std::process::exit(2);
    }
}

fn count(findings: &[catalint_kernel::Finding], severity: Severity) -> usize {
    findings.iter().filter(|f| f.severity == severity).count()
}
