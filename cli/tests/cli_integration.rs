//! Integration tests for the walang compiler CLI.
//!
//! Spawns the compiled `walang` binary and validates its behavior through
//! stdout, stderr, and exit codes, plus the `.wat` file it writes.

use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use predicates::prelude::*;
use std::process::Command;

fn write_source(dir: &assert_fs::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let file = dir.child(name);
    file.write_str(contents).unwrap();
    file.path().to_path_buf()
}

#[test]
fn fails_when_file_missing() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("walang"));
    cmd.arg("this-file-does-not-exist.wl");
    cmd.assert().failure();
}

#[test]
fn compiles_to_default_wat_path() {
    let temp = assert_fs::TempDir::new().unwrap();
    let source = write_source(&temp, "good.wl", "let a : u32 = 3 >> 4;");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("walang"));
    cmd.arg(&source);
    cmd.assert().success();

    let expected = temp.child("good.wat");
    expected.assert(predicate::path::exists());
    expected.assert(predicate::str::contains("i32.shr_u"));
}

#[test]
fn compiles_to_explicit_output_path() {
    let temp = assert_fs::TempDir::new().unwrap();
    let source = write_source(&temp, "good.wl", "let a : u32 = 1;");
    let out = temp.child("custom.wat");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("walang"));
    cmd.arg(&source).arg("-o").arg(out.path());
    cmd.assert().success();

    out.assert(predicate::path::exists());
}

#[test]
fn rejects_repeated_output_flag() {
    let temp = assert_fs::TempDir::new().unwrap();
    let source = write_source(&temp, "good.wl", "let a : u32 = 1;");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("walang"));
    cmd.arg(&source).arg("-o").arg("a.wat").arg("-o").arg("b.wat");
    cmd.assert().failure();
}

#[test]
fn reports_type_error_with_source_range() {
    let temp = assert_fs::TempDir::new().unwrap();
    let source = write_source(&temp, "bad.wl", "let a:f32=0; not a;");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("walang"));
    cmd.arg(&source);
    cmd.assert().failure().stderr(predicate::str::contains("invalid operator"));
}

#[test]
fn shows_version() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("walang"));
    cmd.arg("--version");
    cmd.assert().success().stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
