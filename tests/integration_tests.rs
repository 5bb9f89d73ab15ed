use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to create a temporary file with the given name
fn create_temp_file(name: &str, content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join(name);
    let mut file = fs::File::create(&file_path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    (temp_dir, file_path)
}

#[test]
fn test_cli_help_flag() {
    cargo_bin_cmd!("jpq")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("JSONPath"));
}

#[test]
fn test_cli_version_flag() {
    cargo_bin_cmd!("jpq")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("jpq"));
}

#[test]
fn test_cli_query_file() {
    let (_temp_dir, path) = create_temp_file("data.json", r#"{"a":[1,2,3]}"#);

    cargo_bin_cmd!("jpq")
        .arg("$.a[*]")
        .arg(&path)
        .assert()
        .success()
        .stdout("[\n  1,\n  2,\n  3\n]\n");
}

#[test]
fn test_cli_query_stdin() {
    cargo_bin_cmd!("jpq")
        .arg("$.name")
        .write_stdin(r#"{"name": "Alice"}"#)
        .assert()
        .success()
        .stdout("[\n  \"Alice\"\n]\n");
}

#[test]
fn test_cli_no_match_prints_empty_document() {
    cargo_bin_cmd!("jpq")
        .arg("$.missing")
        .write_stdin("{}")
        .assert()
        .success()
        .stdout("[]\n");
}

#[test]
fn test_cli_nodes_mode() {
    cargo_bin_cmd!("jpq")
        .args(["--nodes", "$.a[0]"])
        .write_stdin(r#"{"a": [true]}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""path": "$['a'][0]""#))
        .stdout(predicate::str::contains(r#""value": true"#));
}

#[test]
fn test_cli_locator_output() {
    cargo_bin_cmd!("jpq")
        .args(["--locator", "$.a"])
        .write_stdin(r#"{"a": 1}"#)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("jpq:results-1.json?"));
}

#[test]
fn test_cli_invalid_expression() {
    cargo_bin_cmd!("jpq")
        .arg("$.[invalid")
        .write_stdin(r#"{"a": 1}"#)
        .assert()
        .code(1)
        .stderr("Please make sure your JSON path expression is valid!\n");
}

#[test]
fn test_cli_deeply_nested_expression_is_rejected() {
    let deep = format!("$[?{}@.a{}]", "(".repeat(5_000), ")".repeat(5_000));

    cargo_bin_cmd!("jpq")
        .arg(deep)
        .write_stdin(r#"[{"a": 1}]"#)
        .assert()
        .code(1)
        .stderr("Please make sure your JSON path expression is valid!\n");
}

#[test]
fn test_cli_rejects_non_json_extension() {
    let (_temp_dir, path) = create_temp_file("data.txt", r#"{"a": 1}"#);

    cargo_bin_cmd!("jpq")
        .arg("$.a")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("file is not json"));
}

#[test]
fn test_cli_with_invalid_json_file() {
    let (_temp_dir, path) = create_temp_file("broken.json", r#"{"name": "test", invalid}"#);

    cargo_bin_cmd!("jpq")
        .arg("$")
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("Error parsing JSON"))
        .stderr(predicate::function(|err: &str| err.lines().count() == 1));
}

#[test]
fn test_cli_with_nonexistent_file() {
    cargo_bin_cmd!("jpq")
        .arg("$")
        .arg("nonexistent.json")
        .assert()
        .failure();
}

#[test]
fn test_cli_large_file_warns_and_runs() {
    let padding = "x".repeat(4_000_000);
    let (_temp_dir, path) = create_temp_file("big.json", &format!(r#"{{"n": 7, "pad": "{}"}}"#, padding));

    cargo_bin_cmd!("jpq")
        .arg("$.n")
        .arg(&path)
        .assert()
        .success()
        .stderr(predicate::str::contains("this is a large file"))
        .stdout("[\n  7\n]\n");
}

#[test]
fn test_cli_blank_query_does_nothing() {
    cargo_bin_cmd!("jpq")
        .arg("   ")
        .write_stdin("{}")
        .assert()
        .success()
        .stdout("");
}
