//! Exit status and output of the `syd` binary.

use std::path::Path;
use std::process::{Command, Output};

fn syd(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_syd"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn write(dir: &Path, name: &str, body: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    path.display().to_string()
}

#[test]
fn no_differences_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.yaml", "x: 1\ny: 2\n");
    let b = write(dir.path(), "b.yaml", "y: 2\nx: 1\n");
    let out = syd(&["--set-exit-code", &a, &b]);
    assert_eq!(out.status.code(), Some(0));
    assert!(out.stdout.is_empty());
}

#[test]
fn differences_exit_one_only_when_asked() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.yaml", "x: 1\n");
    let b = write(dir.path(), "b.yaml", "x: 2\n");

    let out = syd(&[&a, &b]);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&out.stdout), "~ x 1 → 2\n");

    let out = syd(&["--set-exit-code", &a, &b]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn fatal_errors_exit_255() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.yaml", "x: 1\n");
    let bad = write(dir.path(), "bad.yaml", "x: [\n");

    assert_eq!(syd(&[&a, &bad]).status.code(), Some(255));
    assert_eq!(syd(&[&a, "/no/such/file.yaml"]).status.code(), Some(255));
    assert_eq!(
        syd(&["--exclude-regexp", "(", &a, &a]).status.code(),
        Some(255)
    );
    assert_eq!(syd(&["--chroot", "missing", &a, &a]).status.code(), Some(255));
}

#[test]
fn json_output_and_go_patch_paths() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.yaml", "spec:\n  ports: [80]\n");
    let b = write(dir.path(), "b.yaml", "spec:\n  ports: [81]\n");

    let out = syd(&["--use-go-patch-style", &a, &b]);
    assert_eq!(String::from_utf8_lossy(&out.stdout), "~ /spec/ports/0 80 → 81 (minor)\n");

    let out = syd(&["--output", "json", &a, &b]);
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["entries"][0]["path"], "spec.ports[0]");
    assert_eq!(json["entries"][0]["kind"]["type"], "modified");
}

#[test]
fn config_file_supplies_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.yaml", "list: [a, b]\n");
    let b = write(dir.path(), "b.yaml", "list: [b, a]\n");
    let config = write(dir.path(), "syd.yaml", "ignore-order-changes: true\n");

    let out = syd(&["--set-exit-code", &a, &b]);
    assert_eq!(out.status.code(), Some(1));
    let out = syd(&["--set-exit-code", "--config", &config, &a, &b]);
    assert_eq!(out.status.code(), Some(0));
}
