#![forbid(unsafe_code)]

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_explorer-demo"))
        .args(args)
        .current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir)
        .env_remove("RUST_LOG")
        .env_remove("EXPLORER_SAMPLES_PATH")
        .env_remove("EXPLORER_LOOKUP_FIXTURES")
        .env_remove("EXPLORER_DEFAULT_COLLECTIONS")
        .output()
        .expect("failed to spawn explorer-demo")
}

fn stdout_json(out: &Output) -> Value {
    assert!(
        out.status.success(),
        "status={:?}\nstderr:\n{}",
        out.status.code(),
        String::from_utf8_lossy(&out.stderr)
    );
    serde_json::from_slice(&out.stdout).expect("stdout is JSON")
}

#[test]
fn normalize_prints_descriptors() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(
        dir.path(),
        &["--today", "2017-03-15", "normalize", r#"[{"index":0,"q":"climate"}]"#],
    );
    let json = stdout_json(&out);
    assert_eq!(json[0]["label"], "climate");
    assert_eq!(json[0]["color"], "#1f77b4");
    assert_eq!(json[0]["sources"], serde_json::json!([]));
}

#[test]
fn malformed_url_fails_with_notice() {
    let dir = tempfile::tempdir().unwrap();
    let fixtures = dir.path().join("fixtures.json");
    fs::write(&fixtures, "{}").unwrap();
    let out = run(
        dir.path(),
        &[
            "resolve",
            "/queries/demo/search/not-json",
            "--fixtures",
            fixtures.to_str().unwrap(),
        ],
    );
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert_eq!(stderr.matches("[error]").count(), 1, "stderr:\n{stderr}");
    assert!(out.stdout.is_empty());
}

#[test]
fn resolve_reads_env_file_fixtures() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("fixtures.json"),
        r#"{"collections": [{"tags_id": 9, "label": "Example Collection"}]}"#,
    )
    .unwrap();
    fs::write(dir.path().join(".env"), "EXPLORER_LOOKUP_FIXTURES=fixtures.json\n").unwrap();

    let out = run(
        dir.path(),
        &[
            "resolve",
            "/queries/demo/search/%5B%7B%22q%22%3A%22b%22%2C%22collections%22%3A%5B9%5D%7D%5D",
        ],
    );
    let json = stdout_json(&out);
    assert_eq!(json["status"], "succeeded");
    assert_eq!(json["queries"][0]["collections"][0]["label"], "Example Collection");
}

#[test]
fn unknown_subcommand_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(dir.path(), &["frobnicate"]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn missing_sample_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(dir.path(), &["sample", "3"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("not found"));
}

#[test]
fn word_sizes_scale_between_bounds() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(
        dir.path(),
        &[
            "word-sizes",
            r#"[{"term":"a","tfnorm":0.1},{"term":"b","tfnorm":0.5}]"#,
            "--min",
            "12",
            "--max",
            "24",
        ],
    );
    let json = stdout_json(&out);
    assert_eq!(json[0]["font_size"], 12.0);
    assert_eq!(json[1]["font_size"], 24.0);
}
