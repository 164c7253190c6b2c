//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data
//! directory and checks the JSON it prints.

use std::path::Path;
use std::process::Command;

/// Run a CLI command against `data_dir` and return (stdout, stderr, code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_fighting-demons"))
        .args(args)
        .env("FIGHTING_DEMONS_DATA_DIR", data_dir)
        .env_remove("FIGHTING_DEMONS_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(data_dir: &Path, args: &[&str]) -> serde_json::Value {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_faceoff_requires_profile() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["faceoff", "complete", "dawn"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"), "stderr: {stderr}");
}

#[test]
fn test_profile_and_faceoff_flow() {
    let dir = tempfile::tempdir().unwrap();
    let profile = run_json(dir.path(), &["profile", "create", "Ana"]);
    assert_eq!(profile["name"], "Ana");
    assert_eq!(profile["last_evolution_stage"], "ember");

    let outcome = run_json(
        dir.path(),
        &[
            "faceoff",
            "complete",
            "dawn",
            "--mile",
            "--at",
            "2024-05-01T06:30:00+02:00",
        ],
    );
    assert_eq!(outcome["points_awarded"], 10);
    assert_eq!(outcome["already_completed"], false);
    assert_eq!(outcome["new_achievements"][0], "first_light");

    let again = run_json(
        dir.path(),
        &["faceoff", "complete", "dawn", "--at", "2024-05-01T07:00:00+02:00"],
    );
    assert_eq!(again["already_completed"], true);
    assert_eq!(again["points_awarded"], 0);

    let progress = run_json(dir.path(), &["progress", "show"]);
    assert_eq!(progress["total_points"], 10);
    assert_eq!(progress["spirit_guide"]["current"]["id"], "ember");

    let lifetime = run_json(dir.path(), &["stats", "lifetime"]);
    assert_eq!(lifetime["total_miles"], 1);
    assert_eq!(lifetime["total_face_offs"], 1);
}

#[test]
fn test_defer_and_status() {
    let dir = tempfile::tempdir().unwrap();
    run_json(dir.path(), &["profile", "create", "Ana"]);

    let entry = run_json(
        dir.path(),
        &[
            "faceoff",
            "defer",
            "noon",
            "--minutes",
            "30",
            "--reason",
            "meeting",
            "--at",
            "2024-05-01T12:00:00+00:00",
        ],
    );
    assert_eq!(entry["deferral_count"], 1);
    assert_eq!(entry["deferral_reason"], "meeting");

    let status = run_json(
        dir.path(),
        &["faceoff", "status", "--at", "2024-05-01T12:10:00+00:00"],
    );
    assert_eq!(status[1]["slot"], "noon");
    assert_eq!(status[1]["state"], "deferred");
    assert_eq!(status[0]["state"], "pending");
}

#[test]
fn test_progress_preview_rejects_negative_total() {
    let dir = tempfile::tempdir().unwrap();
    let preview = run_json(dir.path(), &["progress", "preview", "150"]);
    assert_eq!(preview["spirit_guide"]["current"]["id"], "specter");
    assert_eq!(preview["user_title"]["current"]["id"], "warrior");

    let (_, stderr, code) = run_cli(dir.path(), &["progress", "preview", "-5"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("non-negative"), "stderr: {stderr}");
}

#[test]
fn test_config_get_set() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "points.dawn"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "10");

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "points.dawn", "12"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "points.dawn"]);
    assert_eq!(stdout.trim(), "12");

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "points.sunrise", "1"]);
    assert_eq!(code, 1);
}

#[test]
fn test_export_import_roundtrip() {
    let source = tempfile::tempdir().unwrap();
    run_json(source.path(), &["profile", "create", "Ana"]);
    run_json(
        source.path(),
        &["faceoff", "complete", "noon", "--pushups", "30", "--at", "2024-05-02T12:00:00+00:00"],
    );

    let file = source.path().join("snapshot.json");
    let file_arg = file.to_str().unwrap();
    let (_, _, code) = run_cli(source.path(), &["data", "export", "--output", file_arg]);
    assert_eq!(code, 0);

    let target = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(target.path(), &["data", "import", file_arg]);
    assert_eq!(code, 0, "import failed: {stderr}");

    let profile = run_json(target.path(), &["profile", "show"]);
    assert_eq!(profile["total_points"], 6);
    assert_eq!(profile["personal_records"]["pushups"], 30);

    let (_, _, code) = run_cli(target.path(), &["data", "reset"]);
    assert_eq!(code, 1);
    let (_, _, code) = run_cli(target.path(), &["data", "reset", "--yes"]);
    assert_eq!(code, 0);
    let (_, _, code) = run_cli(target.path(), &["profile", "show"]);
    assert_eq!(code, 1);
}

#[test]
fn test_completions() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("fighting-demons"));
}
