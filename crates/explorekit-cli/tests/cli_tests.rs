//! End-to-end tests for the explorekit binary.

use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn explorekit(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_explorekit"))
        .args(args)
        .env_remove("EXPLOREKIT_LOG")
        .output()
        .unwrap()
}

fn write(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

fn before() -> Value {
    json!({
        "structure": {"roots": [
            {"id": "c", "name": "C:", "type": "folder", "children": [
                {"id": "docs", "name": "Docs", "type": "folder", "children": [
                    {"id": "a", "name": "a.txt", "type": "file"}
                ]}
            ]}
        ]},
        "recycleBin": []
    })
}

fn after() -> Value {
    json!({
        "structure": {"roots": [
            {"id": "c", "name": "C:", "type": "folder", "children": [
                {"id": "docs", "name": "Docs", "type": "folder", "children": [
                    {"id": "a", "name": "b.txt", "type": "file"}
                ]},
                {"id": "p", "name": "Photos", "type": "folder", "children": []}
            ]}
        ]},
        "recycleBin": []
    })
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn diff_prints_records() {
    let dir = TempDir::new().unwrap();
    let b = write(dir.path(), "before.json", &before());
    let a = write(dir.path(), "after.json", &after());

    let records = stdout_json(&explorekit(&["diff", b.to_str().unwrap(), a.to_str().unwrap()]));
    assert_eq!(
        records,
        json!([
            {"kind": "added-folder", "path": "C:\\Photos", "name": "Photos"},
            {"kind": "renamed-file", "from": "C:\\Docs\\a.txt", "to": "C:\\Docs\\b.txt", "name": "b.txt"}
        ])
    );
}

#[test]
fn author_then_check() {
    let dir = TempDir::new().unwrap();
    let b = write(dir.path(), "before.json", &before());
    let a = write(dir.path(), "after.json", &after());
    let exercise = dir.path().join("exercise.json");

    let output = explorekit(&[
        "author",
        b.to_str().unwrap(),
        a.to_str().unwrap(),
        "--title",
        "Rename and organize",
        "-o",
        exercise.to_str().unwrap(),
    ]);
    assert!(output.status.success());

    let written: Value = serde_json::from_str(&std::fs::read_to_string(&exercise).unwrap()).unwrap();
    assert_eq!(written["meta"]["title"], "Rename and organize");
    assert_eq!(written["tasks"].as_array().unwrap().len(), 2);

    let validate = explorekit(&["validate", exercise.to_str().unwrap()]);
    assert!(validate.status.success());

    let start = stdout_json(&explorekit(&["check", exercise.to_str().unwrap(), b.to_str().unwrap()]));
    assert_eq!(start["score"], 0);

    let done = stdout_json(&explorekit(&["check", exercise.to_str().unwrap(), a.to_str().unwrap()]));
    assert_eq!(done["score"], 100);
    assert_eq!(done["completed"], 2);
}

#[test]
fn strict_check_fails_incomplete_work() {
    let dir = TempDir::new().unwrap();
    let b = write(dir.path(), "before.json", &before());
    let a = write(dir.path(), "after.json", &after());
    let exercise = dir.path().join("exercise.json");
    explorekit(&["author", b.to_str().unwrap(), a.to_str().unwrap(), "-o", exercise.to_str().unwrap()]);

    let output = explorekit(&["check", "--strict", exercise.to_str().unwrap(), b.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn author_without_changes_fails() {
    let dir = TempDir::new().unwrap();
    let b = write(dir.path(), "before.json", &before());

    let output = explorekit(&["author", b.to_str().unwrap(), b.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to export exercise"));
}

#[test]
fn validate_reports_errors() {
    let dir = TempDir::new().unwrap();
    let config = write(
        dir.path(),
        "bad.json",
        &json!({
            "initialStructure": {"roots": []},
            "tasks": [{"type": "move", "subjectId": "n1", "fromPath": "C:\\a.txt"}]
        }),
    );

    let output = explorekit(&["validate", config.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("tasks[0].toPath is required for type \"move\""));
}

#[test]
fn missing_file_has_context() {
    let output = explorekit(&["diff", "/nonexistent/before.json", "/nonexistent/after.json"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read snapshot"));
}
