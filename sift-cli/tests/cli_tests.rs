//! Black-box tests of the `sift` binary.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

fn sift() -> Command {
    Command::cargo_bin("sift").expect("binary builds")
}

fn context_file(json: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(json.as_bytes()).expect("write context");
    file
}

#[test]
fn run_evaluates_an_expression() {
    sift()
        .args(["run", "1 + 2"])
        .assert()
        .success()
        .stdout("3\n");
}

#[test]
fn run_with_context_file() {
    let file = context_file(r#"{ "price": 5, "tag": "widget" }"#);
    sift()
        .args(["run", "tag + ': ' + price * 2"])
        .args(["--context", &file.path().to_string_lossy()])
        .assert()
        .success()
        .stdout("widget: 10\n");
}

#[test]
fn run_prints_containers_as_json() {
    sift()
        .args(["run", "[1, 2, 3].length"])
        .assert()
        .success()
        .stdout("3\n");
    sift()
        .args(["run", "{ a: 1 }"])
        .assert()
        .success()
        .stdout("{\"a\":1}\n");
}

#[test]
fn run_in_path_mode() {
    let file = context_file(r#"{ "price": 5 }"#);
    sift()
        .args(["run", "@.price < 10", "--path"])
        .args(["--context", &file.path().to_string_lossy()])
        .assert()
        .success()
        .stdout("true\n");
}

#[test]
fn compile_prints_the_instruction_dump() {
    sift()
        .args(["compile", "current.price < 10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("IDENT current"))
        .stdout(predicate::str::contains("BINARY <"));
}

#[test]
fn check_reports_ok() {
    sift()
        .args(["check", "a && b"])
        .assert()
        .success()
        .stdout("ok\n");
}

#[test]
fn parse_errors_exit_with_one() {
    sift()
        .args(["run", "1 +"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error"));
}

#[test]
fn unsupported_forms_exit_with_one() {
    sift()
        .args(["run", "x = 5"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("assignment"));
}

#[test]
fn runtime_errors_exit_with_three() {
    sift()
        .args(["run", "missing + 1"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("missing is not defined"));
}

#[test]
fn bad_context_file_exits_with_one() {
    let file = context_file("[1, 2]");
    sift()
        .args(["run", "1"])
        .args(["--context", &file.path().to_string_lossy()])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("JSON object"));
}

#[test]
fn missing_command_prints_usage() {
    sift()
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("usage: sift"));
}
