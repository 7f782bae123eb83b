//! CLI smoke tests for bootstrap.
//!
//! These tests run the binary against throwaway project trees and check exit
//! codes and the files it leaves behind.

use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a Command for the bootstrap binary.
fn bootstrap_cmd() -> Command {
  cargo_bin_cmd!("bootstrap")
}

/// Create a project with the three source roots and the given files.
fn temp_project(files: &[&str]) -> TempDir {
  let temp = TempDir::new().unwrap();
  for dir in ["src", "test", "examples"] {
    std::fs::create_dir_all(temp.path().join(dir)).unwrap();
  }
  for file in files {
    std::fs::write(temp.path().join(file), "int main() {}\n").unwrap();
  }
  temp
}

fn read(path: &Path) -> String {
  std::fs::read_to_string(path).unwrap()
}

/// Join ` $` continuation lines so long commands can be searched as one line.
fn unwrapped(text: &str) -> String {
  text
    .split(" $\n")
    .map(str::trim_start)
    .collect::<Vec<_>>()
    .join(" ")
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_works() {
  bootstrap_cmd()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage"))
    .stdout(predicate::str::contains("--boost-dir"));
}

#[test]
fn version_flag_works() {
  bootstrap_cmd()
    .arg("--version")
    .assert()
    .success()
    .stdout(predicate::str::contains("bootstrap"));
}

#[test]
fn unknown_flag_is_rejected() {
  bootstrap_cmd()
    .arg("--frobnicate")
    .assert()
    .failure()
    .stderr(predicate::str::contains("unexpected argument"));
}

// =============================================================================
// ninja output
// =============================================================================

#[test]
fn writes_build_file_into_root() {
  let temp = temp_project(&["src/a.c++", "examples/bench.c++"]);

  bootstrap_cmd()
    .arg("--root")
    .arg(temp.path())
    .assert()
    .success()
    .stdout(predicate::str::contains("Wrote"));

  let text = read(&temp.path().join("build.ninja"));
  assert!(text.contains("build obj/src/a.o: cxx src/a.c++\n"));
  assert!(text.contains("build bench: phony bin/examples/bench\n"));
  assert!(text.ends_with("default examples\n"));
}

#[test]
fn flags_reach_the_build_file() {
  let temp = temp_project(&[]);

  bootstrap_cmd()
    .args(["--cxx", "clang++", "--debug", "--define", "NONIUS_X=1", "--output", "debug.ninja"])
    .arg("--root")
    .arg(temp.path())
    .assert()
    .success();

  let text = unwrapped(&read(&temp.path().join("debug.ninja")));
  assert!(text.contains("clang++"));
  assert!(text.contains("-g"));
  assert!(text.contains("-DNONIUS_X=1"));
  assert!(!text.contains("-flto"));
  assert!(text.contains("--debug --define NONIUS_X=1 --output debug.ninja"));
}

#[test]
fn rerun_is_byte_identical() {
  let temp = temp_project(&["src/a.c++", "test/t.c++"]);

  bootstrap_cmd().arg("--root").arg(temp.path()).assert().success();
  let first = read(&temp.path().join("build.ninja"));
  bootstrap_cmd().arg("--root").arg(temp.path()).assert().success();
  let second = read(&temp.path().join("build.ninja"));

  assert_eq!(first, second);
}

#[test]
fn missing_root_fails_without_output() {
  let temp = TempDir::new().unwrap();
  let root = temp.path().join("nowhere");

  bootstrap_cmd()
    .arg("--root")
    .arg(&root)
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to generate build file"));

  assert!(!root.join("build.ninja").exists());
}

// =============================================================================
// json output
// =============================================================================

#[test]
fn json_format_prints_graph_and_writes_nothing() {
  let temp = temp_project(&["src/a.c++"]);

  bootstrap_cmd()
    .args(["--format", "json"])
    .arg("--root")
    .arg(temp.path())
    .assert()
    .success()
    .stdout(predicate::str::contains("\"nodes\""))
    .stdout(predicate::str::contains("ar rcs bin/libnonius.a obj/src/a.o"));

  assert!(!temp.path().join("build.ninja").exists());
}

#[test]
fn verbose_logs_to_stderr() {
  let temp = temp_project(&[]);

  bootstrap_cmd()
    .arg("--verbose")
    .arg("--root")
    .arg(temp.path())
    .env_remove("RUST_LOG")
    .assert()
    .success()
    .stderr(predicate::str::contains("discovered sources"));
}
