use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn bootc() -> Command {
    let mut cmd = Command::cargo_bin("bootc-cli").expect("binary exists");
    cmd.env_remove("RUST_LOG")
        .env_remove("BOOTC_DEBUG_TOKENIZER")
        .env_remove("BOOTC_DEBUG_ASM");
    cmd
}

#[test]
fn prints_token_tree_of_a_file() {
    let dir = tempdir().expect("tempdir");
    let input_path = dir.path().join("main.boot");
    fs::write(&input_path, "ge (1 2)\n").expect("write input");

    bootc()
        .arg("--input")
        .arg(&input_path)
        .assert()
        .success()
        .stdout(predicate::str::contains(": block file"))
        .stdout(predicate::str::contains(":1:1: word ge"))
        .stdout(predicate::str::contains("  - "));
}

#[test]
fn writes_tree_to_output_file() {
    let dir = tempdir().expect("tempdir");
    let input_path = dir.path().join("main.boot");
    fs::write(&input_path, "\"hello\"").expect("write input");
    let output_path = dir.path().join("out/tree.txt");

    bootc()
        .arg("--input")
        .arg(&input_path)
        .arg("--output")
        .arg(&output_path)
        .assert()
        .success();

    let tree = fs::read_to_string(&output_path).expect("read tree");
    assert!(tree.contains(":1:1: string hello"));
}

#[test]
fn reads_source_from_stdin() {
    bootc()
        .write_stdin("// comment\n42")
        .assert()
        .success()
        .stdout(predicate::str::diff(
            "<stdin>:1:1: block file\n- <stdin>:2:1: number 42\n",
        ));
}

#[test]
fn lexes_every_source_in_a_directory() {
    let dir = tempdir().expect("tempdir");
    let nested = dir.path().join("nested");
    fs::create_dir_all(&nested).expect("create nested dir");
    fs::write(dir.path().join("a.boot"), "first").expect("write a");
    fs::write(nested.join("b.boot"), "second").expect("write b");
    fs::write(dir.path().join("notes.txt"), "(").expect("write notes");

    let output = bootc()
        .arg("--input")
        .arg(dir.path())
        .output()
        .expect("run cli");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let first = stdout.find("word first").expect("a.boot lexed");
    let second = stdout.find("word second").expect("nested/b.boot lexed");
    assert!(first < second);
}

#[test]
fn reports_mismatched_brackets() {
    bootc()
        .write_stdin("(]")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not correctly closed"));
}

#[test]
fn reports_unclosed_blocks() {
    let dir = tempdir().expect("tempdir");
    let input_path = dir.path().join("main.boot");
    fs::write(&input_path, "{ x").expect("write input");

    bootc()
        .arg("--input")
        .arg(&input_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("reached end of input"));
}

#[test]
fn dump_flag_logs_tree_to_stderr() {
    bootc()
        .arg("--dump-tokens")
        .write_stdin("x")
        .assert()
        .success()
        .stderr(predicate::str::contains("word x"));
}

#[test]
fn reports_missing_input() {
    let dir = tempdir().expect("tempdir");
    bootc()
        .arg("--input")
        .arg(dir.path().join("missing.boot"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read source"));
}

#[test]
fn env_flag_logs_tree_to_stderr() {
    bootc()
        .env("BOOTC_DEBUG_TOKENIZER", "1")
        .write_stdin("x")
        .assert()
        .success()
        .stderr(predicate::str::contains("word x"));
}

#[test]
fn no_dump_without_flags() {
    bootc()
        .write_stdin("x")
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}
