use std::path::{Path, PathBuf};
use std::process::Output;

use assert_cmd::Command;

include!(concat!(env!("OUT_DIR"), "/test_files.rs"));

/// Runs a script from `tests/data` and compares its stdout with the sibling `.out` file.
fn do_test(filename: &Path) {
    let expected = std::fs::read_to_string(filename.with_extension("out"))
        .unwrap_or_else(|_| panic!("missing expected output for {}", filename.display()));

    let output = run_file(filename, &[]);

    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();

    assert!(output.status.success(), "stdout={}, stderr={}", stdout, stderr);
    assert_eq!(expected.trim_end(), stdout.trim_end(), "stderr={}", stderr);
}

fn run_file(filename: &Path, extra_args: &[&str]) -> Output {
    let mut cmd = Command::cargo_bin("brushscript").unwrap();
    cmd.arg(filename).args(["--seed", "7"]).args(extra_args).output().unwrap()
}

/// A script written to the temp directory for one test, removed again on drop.
struct TempScript(PathBuf);

impl TempScript {
    fn new(name: &str, source: &str) -> Self {
        let path = std::env::temp_dir().join(format!("brushscript-{}-{}.bs", std::process::id(), name));
        std::fs::write(&path, source).unwrap();
        Self(path)
    }
}

impl Drop for TempScript {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

#[test]
fn parse_error_exits_with_65() {
    let script = TempScript::new("parse", "debug(1)\nend\n");
    let output = run_file(&script.0, &[]);

    assert_eq!(output.status.code(), Some(65));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("[line 2]"), "stderr={}", stderr);
}

#[test]
fn stray_break_exits_with_70() {
    let script = TempScript::new("stray", "debug(\"start\")\nbreak\ndebug(\"never\")\n");
    let output = run_file(&script.0, &[]);

    assert_eq!(output.status.code(), Some(70));
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "start\n");
}

#[test]
fn step_limit_cancels_endless_loop() {
    let script = TempScript::new("steps", "let i = 0\nwhile (true)\n    i += 1\nend\n");
    let output = run_file(&script.0, &["--max-steps", "1000"]);

    assert_eq!(output.status.code(), Some(70));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("1000"), "stderr={}", stderr);
}

#[test]
fn runaway_recursion_hits_call_depth() {
    let script = TempScript::new("depth", "function down(n)\n    return down(n + 1)\nend\ndown(0)\n");
    let output = run_file(&script.0, &["--max-call-depth", "32"]);

    assert_eq!(output.status.code(), Some(70));
}

#[test]
fn warnings_go_to_stderr() {
    let script = TempScript::new("warn", "debug(nope)\n");
    let output = run_file(&script.0, &[]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "\n");
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("[line 1] Warning"), "stderr={}", stderr);
}

#[test]
fn temporary_scripts_are_removed() {
    let script = TempScript::new("cleanup", "debug(1)\n");
    let path = script.0.clone();
    assert!(path.exists());

    drop(script);
    assert!(!path.exists());
}

#[test]
fn missing_file_is_an_error() {
    let output = run_file(Path::new("tests/data/does-not-exist.bs"), &[]);

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("failed to read"), "stderr={}", stderr);
}

#[test]
fn usage_error_exits_with_64() {
    let output = Command::cargo_bin("brushscript").unwrap().output().unwrap();
    assert_eq!(output.status.code(), Some(64));
}
