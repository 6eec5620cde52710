//! End-to-end tests for the filesorter binary

use std::process::Command;
use tempfile::TempDir;

fn filesorter() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_filesorter"));
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_sorts_tree() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    std::fs::create_dir_all(src.path().join("docs")).unwrap();
    std::fs::write(src.path().join("docs/report.TXT"), b"report").unwrap();
    std::fs::write(src.path().join("image.png"), b"png").unwrap();

    let output = filesorter()
        .arg(src.path())
        .arg(dst.path())
        .args(["--summary", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(std::fs::read(dst.path().join("TXT/report.TXT")).unwrap(), b"report");
    assert_eq!(std::fs::read(dst.path().join("png/image.png")).unwrap(), b"png");

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["files_copied"], 2);

    let logs = String::from_utf8_lossy(&output.stderr);
    assert!(logs.contains("Copy file"));
}

#[test]
fn test_cli_missing_source_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");

    let output = filesorter()
        .arg(dir.path().join("missing"))
        .arg(&out)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(!out.exists());
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
}

#[test]
fn test_cli_requires_both_folders() {
    let output = filesorter().arg("only-one").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}
