use catalint_kernel::{RuleConfig, SuffixMap, has_sd_prefix, mapped_application, str_field};
use catalint_pipeline::read_source;
use serde_json::{Value, json};
use std::path::PathBuf;

const FIXTURE: &str = "wwwroot/data/hv-kits.json";
const SAMPLE_CODES: [&str; 2] = ["HV-133375", "HV-138158"];

const REPLACEMENT_INTRO: &str = "vervangingsveren vervangen de originele";
const ASSIST_INTRO: &str = "hulpveren ondersteunen de bestaande";

struct KitDerivation {
    spring_application: String,
    solution_level: String,
    includes_fsd: bool,
}

/// A kit's own `derived` block wins; otherwise derive from the sku, with
/// unmapped digits defaulting to `assist`.
fn derivation_for(kit: &Value, map: &SuffixMap) -> KitDerivation {
    if let Some(block) = kit.get("derived").and_then(Value::as_object) {
        let text = |key: &str| {
            block
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        return KitDerivation {
            spring_application: text("springApplication"),
            solution_level: text("solutionLevel"),
            includes_fsd: block
                .get("includesFSD")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        };
    }

    let sku = str_field(kit, "sku").unwrap_or_default();
    let spring_application = mapped_application(sku, map)
        .map(|(_, app)| app.to_string())
        .unwrap_or_else(|| "assist".to_string());
    let includes_fsd = has_sd_prefix(sku);
    KitDerivation {
        spring_application,
        solution_level: if includes_fsd {
            "special_duty"
        } else {
            "standard"
        }
        .to_string(),
        includes_fsd,
    }
}

fn intro_for(application: &str) -> &'static str {
    if application == "replacement" || application == "full_replacement" {
        REPLACEMENT_INTRO
    } else {
        ASSIST_INTRO
    }
}

fn find_kit<'a>(kits: &'a [Value], sku: &str) -> Option<&'a Value> {
    kits.iter()
        .find(|kit| str_field(kit, "sku").is_some_and(|s| s.eq_ignore_ascii_case(sku)))
}

pub fn run(root: &str, json_output: bool) {
    let repo_root = PathBuf::from(root);
    let doc = read_source(&repo_root, FIXTURE).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });
    let kits = doc
        .get("kits")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    let map = RuleConfig::embedded().suffix_map;

    let mut sample_skus: Vec<String> = SAMPLE_CODES.iter().map(|s| s.to_string()).collect();
    if let Some(sd) = kits
        .iter()
        .find_map(|kit| str_field(kit, "sku").filter(|s| has_sd_prefix(s)))
    {
        sample_skus.push(sd.to_string());
    }

    let mut rows = Vec::new();
    let mut failures: Vec<String> = Vec::new();
    for sku in &sample_skus {
        let Some(kit) = find_kit(kits, sku) else {
            failures.push(format!("missing kit {sku}"));
            continue;
        };
        let derived = derivation_for(kit, &map);
        let intro = intro_for(&derived.spring_application);

        if derived.spring_application == "replacement" && intro.contains("hulpveer") {
            failures.push(format!("replacement intro mentions hulpveer for {sku}"));
        }
        if derived.spring_application == "assist" && intro.contains("vervang") {
            failures.push(format!("assist intro mentions vervang for {sku}"));
        }
        if has_sd_prefix(sku) && derived.solution_level != "special_duty" {
            failures.push(format!("SD kit {sku} missing special_duty"));
        }

        rows.push(json!({
            "sku": sku,
            "springApplication": derived.spring_application,
            "solutionLevel": derived.solution_level,
            "includesFSD": derived.includes_fsd,
            "intro": intro,
        }));
    }

    let failed = !failures.is_empty();
    if json_output {
        let payload = json!({
            "result": if failed { "rejected" } else { "accepted" },
            "fixture": FIXTURE,
            "samples": rows,
            "failures": failures,
        });
        let rendered = serde_json::to_string_pretty(&payload).unwrap_or_else(|e| {
            eprintln!("error: failed to render smoke payload: {e}");
            std::process::exit(1);
        });
        println!("{rendered}");
    } else {
        for row in &rows {
            println!(
                "{}: spring={}, SD={}, FSD={}",
                row["sku"].as_str().unwrap_or_default(),
                row["springApplication"].as_str().unwrap_or_default(),
                row["solutionLevel"].as_str().unwrap_or_default(),
                row["includesFSD"]
            );
        }
        for failure in &failures {
            eprintln!("error: {failure}");
        }
    }

    if failed {
        std::process::exit(1);
    }
}
