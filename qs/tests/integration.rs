//! Integration tests for qs CLI.

use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

fn qs_cmd(root: &std::path::Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_qs"));
    cmd.env("EDGEQ_ROOT", root);
    cmd.env_remove("EDGEQ_LOG");
    cmd
}

fn init_root(root: &std::path::Path) {
    let output = qs_cmd(root)
        .args(["init"])
        .output()
        .expect("failed to run qs init");
    assert!(output.status.success(), "qs init failed: {:?}", output);
}

fn run(root: &std::path::Path, args: &[&str]) -> Output {
    qs_cmd(root).args(args).output().expect("failed to run qs")
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_init() {
    let tmp = TempDir::new().unwrap();
    init_root(tmp.path());

    assert!(tmp.path().join("config.toml").exists());
    assert!(tmp.path().join("schema.toml").exists());
}

#[test]
fn test_init_twice_requires_force() {
    let tmp = TempDir::new().unwrap();
    init_root(tmp.path());

    let output = run(tmp.path(), &["init"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Error: 500 edgeq already initialized"));

    let output = run(tmp.path(), &["init", "--force"]);
    assert!(output.status.success());
}

#[test]
fn test_parse_json() {
    let tmp = TempDir::new().unwrap();
    init_root(tmp.path());

    let output = run(
        tmp.path(),
        &["parse", "users", "?fields=id,name&embed=profile&sort=-age&page=2&limit=5&where[gte][age]=18"],
    );
    assert!(output.status.success(), "{}", stderr(&output));

    let ctx = stdout_json(&output);
    assert_eq!(ctx["fields"], serde_json::json!(["id", "name"]));
    assert_eq!(ctx["expansions"], serde_json::json!(["users.profile"]));
    assert_eq!(ctx["sort"][0]["field"], "age");
    assert_eq!(ctx["sort"][0]["ascending"], false);
    assert_eq!(ctx["pagination"]["skip"], 5);
    assert_eq!(ctx["pagination"]["limit"], 5);
    assert_eq!(ctx["filters"][0]["field"], "age");
    assert_eq!(ctx["filters"][0]["op"], "GreaterThanOrEquals");
    assert_eq!(ctx["filters"][0]["value"], "18");
}

#[test]
fn test_parse_text() {
    let tmp = TempDir::new().unwrap();
    init_root(tmp.path());

    let output = run(tmp.path(), &["parse", "users", "status=active&limit=3", "-o", "text"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("skip=0 limit=3"));
    assert!(stdout.contains("status = active"));
}

#[test]
fn test_parse_uses_configured_default_limit() {
    let tmp = TempDir::new().unwrap();
    init_root(tmp.path());
    std::fs::write(tmp.path().join("config.toml"), "default_limit = 25\n").unwrap();

    let output = run(tmp.path(), &["parse", "users", "skip=7"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let ctx = stdout_json(&output);
    assert_eq!(ctx["pagination"]["skip"], 7);
    assert_eq!(ctx["pagination"]["limit"], 25);
}

#[test]
fn test_parse_invalid_field() {
    let tmp = TempDir::new().unwrap();
    init_root(tmp.path());

    let output = run(tmp.path(), &["parse", "users", "fields=password"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Error: 400 Invalid Field: password"));
}

#[test]
fn test_parse_invalid_related_field() {
    let tmp = TempDir::new().unwrap();
    init_root(tmp.path());

    let output = run(tmp.path(), &["parse", "users", "embed=posts"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("400 Invalid Related Field: posts"));
}

#[test]
fn test_parse_unknown_edge() {
    let tmp = TempDir::new().unwrap();
    init_root(tmp.path());

    let output = run(tmp.path(), &["parse", "widgets", ""]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Error: 404 Not Found: /widgets"));
}

#[test]
fn test_parse_without_schema() {
    let tmp = TempDir::new().unwrap();

    let output = run(tmp.path(), &["parse", "users", "limit=1"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Error: 500 Schema file not found"));
}

#[test]
fn test_route_json() {
    let tmp = TempDir::new().unwrap();
    init_root(tmp.path());

    let output = run(tmp.path(), &["route", "PATCH", "/v1/posts/12?where[ne][title]=draft"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let req = stdout_json(&output);
    assert_eq!(req["api_version"], "1");
    assert_eq!(req["edge"], "posts");
    assert_eq!(req["id"], "12");
    assert_eq!(req["request_type"], "Patch");
    assert_eq!(req["context"]["filters"][0]["op"], "NotEquals");
}

#[test]
fn test_route_unsupported_version() {
    let tmp = TempDir::new().unwrap();
    init_root(tmp.path());

    let output = run(tmp.path(), &["route", "GET", "/v9/users"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("400 Unsupported API version: 9"));
}

#[test]
fn test_route_bad_where_clause() {
    let tmp = TempDir::new().unwrap();
    init_root(tmp.path());

    let output = run(tmp.path(), &["route", "GET", "/api/users?where[age=1"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("400 Invalid Where Clause"));
}

#[test]
fn test_edges_lists_sample_schema() {
    let tmp = TempDir::new().unwrap();
    init_root(tmp.path());

    let output = run(tmp.path(), &["edges"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("API v1"));
    assert!(stdout.contains("users"));
    assert!(stdout.contains("relation: profile (one-to-one) -> users.profile"));
}
