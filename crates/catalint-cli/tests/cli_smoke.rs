use serde_json::{Value, json};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

struct TempDirGuard {
    path: PathBuf,
}

impl TempDirGuard {
    fn new(prefix: &str) -> Self {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "catalint-cli-{prefix}-{}-{unique}",
            std::process::id()
        ));
        fs::create_dir_all(&path).expect("temp dir should be created");
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, rel: &str, value: &Value) {
        let dest = self.path.join(rel);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).expect("fixture dir should be created");
        }
        fs::write(
            dest,
            serde_json::to_string_pretty(value).expect("fixture should serialize"),
        )
        .expect("fixture should be written");
    }
}

impl Drop for TempDirGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn run_catalint<I, S>(args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = env!("CARGO_BIN_EXE_catalint");
    Command::new(bin)
        .args(args)
        .output()
        .expect("catalint command should execute")
}

fn stdout_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn parse_json_stdout(output: &Output) -> Value {
    serde_json::from_slice::<Value>(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "expected valid JSON stdout, got error: {e}\nstdout:\n{}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

fn root_arg(repo: &TempDirGuard) -> String {
    repo.path().display().to_string()
}

#[test]
fn lint_clean_repo_exits_zero() {
    let repo = TempDirGuard::new("lint-clean");
    repo.write(
        "wwwroot/data/hv-kits.json",
        &json!({"brand": "mad", "kits": [{"sku": "HV-133375", "includesFSD": false}]}),
    );

    let output = run_catalint(["lint", "--root", &root_arg(&repo)]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout_text(&output).contains("[lint] OK"));
    assert!(repo
        .path()
        .join("tools/catalint/out/lint-report.json")
        .is_file());
    assert!(repo
        .path()
        .join("tools/catalint/out/lint-report.md")
        .is_file());
}

#[test]
fn lint_contradiction_exits_two_and_still_writes_reports() {
    let repo = TempDirGuard::new("lint-error");
    repo.write(
        "data/kits.json",
        &json!([{"setCode": "HV-133378", "springApplication": "assist"}]),
    );

    let output = run_catalint(["lint", "--root", &root_arg(&repo)]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stdout_text(&output).contains("[lint] FAIL"));

    let raw = fs::read_to_string(repo.path().join("tools/catalint/out/lint-report.json"))
        .expect("report should be written even on failure");
    let report: Value = serde_json::from_str(&raw).expect("report is JSON");
    let codes: Vec<&str> = report["findings"]
        .as_array()
        .expect("findings array")
        .iter()
        .filter_map(|f| f["code"].as_str())
        .collect();
    assert!(codes.contains(&"L101_MAD_SUFFIX_APPLICATION_CONTRADICTION"));
}

#[test]
fn lint_json_payload_exposes_resolved_shapes() {
    let repo = TempDirGuard::new("lint-json");
    repo.write(
        "wwwroot/data/hv-kits.json",
        &json!({"brand": "mad", "kits": [{"sku": "HV-133375"}]}),
    );

    let output = run_catalint(["lint", "--root", &root_arg(&repo), "--json"]);
    assert_eq!(output.status.code(), Some(0));
    let payload = parse_json_stdout(&output);
    assert_eq!(payload["result"], "accepted");
    assert_eq!(payload["loaded"][0]["type"], "setRecords");
    assert_eq!(payload["loaded"][0]["shape"], "kitsContainer");
    assert_eq!(payload["suffixStats"]["total"], 1);
}

#[test]
fn derive_collapses_single_container_and_keeps_wrapper_fields() {
    let repo = TempDirGuard::new("derive");
    repo.write(
        "wwwroot/data/hv-kits.json",
        &json!({"brand": "mad", "kits": [{"sku": "HV-133375"}]}),
    );

    let output = run_catalint(["derive", "--root", &root_arg(&repo)]);
    assert_eq!(output.status.code(), Some(0));

    let raw = fs::read_to_string(
        repo.path()
            .join("tools/catalint/out/derived/wwwroot/data/hv-kits.json"),
    )
    .expect("derived file should exist");
    let derived: Value = serde_json::from_str(&raw).expect("derived is JSON");
    assert!(derived.is_object());
    assert_eq!(derived["brand"], "mad");
    assert_eq!(derived["kits"][0]["derived"]["springApplication"], "assist");
    assert_eq!(derived["kits"][0]["derived"]["solutionLevel"], "standard");
}

#[test]
fn fix_writes_additive_edits_even_when_lint_fails() {
    let repo = TempDirGuard::new("fix");
    repo.write("data/sd-kits.json", &json!([{"setCode": "SD-123456"}]));

    // Digit 6 is unmapped, so the run itself reports an error...
    let output = run_catalint(["fix", "--root", &root_arg(&repo)]);
    assert_eq!(output.status.code(), Some(2));

    // ...but the fix document is still written, with the two family edits.
    let raw = fs::read_to_string(repo.path().join("tools/catalint/out/fixes.json"))
        .expect("fixes should be written");
    let fixes: Value = serde_json::from_str(&raw).expect("fixes are JSON");
    let edits = fixes[0]["edits"].as_array().expect("edits array");
    let pointers: Vec<&str> = edits
        .iter()
        .filter_map(|e| e["jsonPointer"].as_str())
        .collect();
    assert_eq!(pointers, vec!["/0/includesFSD", "/0/solutionLevel"]);
    assert!(edits.iter().all(|e| e["old"].is_null()));
}

#[test]
fn smoke_passes_on_consistent_fixture() {
    let repo = TempDirGuard::new("smoke-ok");
    repo.write(
        "wwwroot/data/hv-kits.json",
        &json!({"kits": [
            {"sku": "HV-133375"},
            {"sku": "HV-138158"},
            {"sku": "SD-123458"}
        ]}),
    );

    let output = run_catalint(["smoke", "--root", &root_arg(&repo)]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let text = stdout_text(&output);
    assert!(text.contains("HV-133375: spring=assist"));
    assert!(text.contains("SD-123458: spring=replacement, SD=special_duty, FSD=true"));
}

#[test]
fn smoke_fails_on_sd_kit_without_special_duty() {
    let repo = TempDirGuard::new("smoke-fail");
    repo.write(
        "wwwroot/data/hv-kits.json",
        &json!({"kits": [
            {"sku": "HV-133375"},
            {"sku": "HV-138158"},
            {"sku": "SD-123458", "derived": {
                "springApplication": "replacement",
                "solutionLevel": "standard",
                "includesFSD": true
            }}
        ]}),
    );

    let output = run_catalint(["smoke", "--root", &root_arg(&repo)]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("special_duty"));
}

#[test]
fn smoke_fails_when_fixture_is_missing() {
    let repo = TempDirGuard::new("smoke-missing");
    let output = run_catalint(["smoke", "--root", &root_arg(&repo)]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn rerun_never_lints_its_own_artifacts() {
    let repo = TempDirGuard::new("rerun");
    repo.write(
        "wwwroot/data/hv-kits.json",
        &json!({"kits": [{"sku": "HV-133375"}]}),
    );

    let first = run_catalint(["derive", "--root", &root_arg(&repo), "--json"]);
    assert_eq!(first.status.code(), Some(0));
    let first_sources = parse_json_stdout(&first)["sources"]
        .as_array()
        .expect("sources array")
        .len();

    let second = run_catalint(["derive", "--root", &root_arg(&repo), "--json"]);
    assert_eq!(second.status.code(), Some(0));
    let second_sources = parse_json_stdout(&second)["sources"]
        .as_array()
        .expect("sources array")
        .len();
    assert_eq!(first_sources, second_sources);
}
