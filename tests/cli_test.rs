use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

/// Binary under test, pointed at a config file that does not exist so
/// the user's own settings never leak in.
fn duplink(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("duplink").unwrap();
    cmd.arg("--config").arg(config_dir.join("none.toml"));
    cmd
}

fn scenario_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("dir")).unwrap();
    std::fs::write(dir.path().join("a.txt"), b"XXXXXXXXXX").unwrap();
    std::fs::write(dir.path().join("dir/b.txt"), b"XXXXXXXXXX").unwrap();
    std::fs::write(dir.path().join("c.txt"), b"YYYYYYYYYY").unwrap();
    dir
}

fn is_regular(path: &Path) -> bool {
    std::fs::symlink_metadata(path).unwrap().is_file()
}

// ─── Help & version ──────────────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    let cfg = TempDir::new().unwrap();
    duplink(cfg.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("replace them with links"))
        .stdout(predicate::str::contains("dedupe"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_version_flag() {
    let cfg = TempDir::new().unwrap();
    duplink(cfg.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("duplink"));
}

#[test]
fn test_dedupe_help_lists_flags() {
    let cfg = TempDir::new().unwrap();
    duplink(cfg.path())
        .args(["dedupe", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--exclude-executables"))
        .stdout(predicate::str::contains("--report"));
}

#[test]
fn test_dedupe_requires_path() {
    let cfg = TempDir::new().unwrap();
    duplink(cfg.path()).arg("dedupe").assert().failure();
}

// ─── Dedupe command ──────────────────────────────────────────────────────────

#[test]
fn test_dry_run_json_output() {
    let cfg = TempDir::new().unwrap();
    let tree = scenario_tree();
    duplink(cfg.path())
        .args(["dedupe", "--dry-run", "--format", "json"])
        .arg(tree.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"potential_savings\": 10"))
        .stdout(predicate::str::contains("\"mode\": \"dry_run\""));

    assert!(is_regular(&tree.path().join("dir/b.txt")));
}

#[test]
fn test_dry_run_human_output() {
    let cfg = TempDir::new().unwrap();
    let tree = scenario_tree();
    duplink(cfg.path())
        .args(["dedupe", "--dry-run", "--no-color"])
        .arg(tree.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"));
}

#[test]
fn test_invalid_root_fails() {
    let cfg = TempDir::new().unwrap();
    duplink(cfg.path())
        .args(["dedupe", "/nonexistent/duplink/root"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid directory"));
}

#[test]
fn test_live_run_with_yes() {
    let cfg = TempDir::new().unwrap();
    let tree = scenario_tree();
    duplink(cfg.path())
        .args(["dedupe", "--yes", "--format", "quiet"])
        .arg(tree.path())
        .assert()
        .success();

    // Content still reads the same through the link
    assert_eq!(std::fs::read(tree.path().join("dir/b.txt")).unwrap(), b"XXXXXXXXXX");
    assert!(is_regular(&tree.path().join("a.txt")));
    assert!(is_regular(&tree.path().join("c.txt")));

    #[cfg(unix)]
    assert_eq!(
        std::fs::read_link(tree.path().join("dir/b.txt")).unwrap(),
        Path::new("../a.txt")
    );
}

#[test]
fn test_declined_confirmation_changes_nothing() {
    let cfg = TempDir::new().unwrap();
    let tree = scenario_tree();
    duplink(cfg.path())
        .args(["dedupe", "--no-color"])
        .arg(tree.path())
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled"));

    assert!(is_regular(&tree.path().join("dir/b.txt")));
}

#[test]
fn test_json_confirmation_stays_off_stdout() {
    let cfg = TempDir::new().unwrap();
    let tree = scenario_tree();
    duplink(cfg.path())
        .args(["dedupe", "--format", "json", "--no-color"])
        .arg(tree.path())
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Files to link: 1"))
        .stderr(predicate::str::contains("Proceed with deduplication?"))
        .stderr(predicate::str::contains("Cancelled"));

    assert!(is_regular(&tree.path().join("dir/b.txt")));
}

#[test]
fn test_json_live_run_is_parseable() {
    let cfg = TempDir::new().unwrap();
    let tree = scenario_tree();
    let output = duplink(cfg.path())
        .args(["dedupe", "--format", "json"])
        .arg(tree.path())
        .write_stdin("y\n")
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["stats"]["files_processed"], 1);
}

#[test]
fn test_auto_confirm_alias() {
    let cfg = TempDir::new().unwrap();
    let tree = scenario_tree();
    duplink(cfg.path())
        .args(["dedupe", "--auto-confirm", "--format", "json"])
        .arg(tree.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"files_processed\": 1"));
}

#[test]
fn test_exclude_list_keeps_duplicate() {
    let cfg = TempDir::new().unwrap();
    let tree = scenario_tree();
    duplink(cfg.path())
        .args(["dedupe", "--yes", "--exclude", "1.1", "--format", "json"])
        .arg(tree.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"excluded\": 1"))
        .stdout(predicate::str::contains("\"files_processed\": 0"));

    assert!(is_regular(&tree.path().join("dir/b.txt")));
}

#[test]
fn test_report_written_without_changes() {
    let cfg = TempDir::new().unwrap();
    let tree = scenario_tree();
    let out = TempDir::new().unwrap();
    let report = out.path().join("dupes.txt");

    duplink(cfg.path())
        .args(["dedupe", "--dry-run", "--quiet", "--report"])
        .arg(&report)
        .arg(tree.path())
        .assert()
        .success();

    let text = std::fs::read_to_string(&report).unwrap();
    assert!(text.contains("DUPLICATE FILES REPORT"));
    assert!(text.contains("Total duplicate file groups: 1"));
    assert!(is_regular(&tree.path().join("dir/b.txt")));
}

#[test]
fn test_hard_link_kind_flag() {
    let cfg = TempDir::new().unwrap();
    let tree = scenario_tree();
    duplink(cfg.path())
        .args(["dedupe", "--yes", "--link-kind", "hard", "--format", "json"])
        .arg(tree.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"strategy\": \"hard\""))
        .stdout(predicate::str::contains("\"bytes_saved\": 10"));

    assert!(is_regular(&tree.path().join("dir/b.txt")));
}

// ─── Config command ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_honours_flag() {
    let cfg = TempDir::new().unwrap();
    duplink(cfg.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("none.toml"));
}

#[test]
fn test_config_show_defaults() {
    let cfg = TempDir::new().unwrap();
    duplink(cfg.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("chunk_size = 8192"));
}

#[test]
fn test_config_init_creates_file() {
    let cfg = TempDir::new().unwrap();
    duplink(cfg.path())
        .args(["config", "init"])
        .assert()
        .success();
    assert!(cfg.path().join("none.toml").exists());
}

// ─── Completions ─────────────────────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let cfg = TempDir::new().unwrap();
    duplink(cfg.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("duplink"));
}
