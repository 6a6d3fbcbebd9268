//! End-to-end tests for the compiled `splice` binary.

use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

const CONTROLLER: &str = r#"<?php
class PayablesController
{
    public function index()
    {
        return Inertia::render('Payables', [
            'rows' => $rows,
        ]);
    }
}
"#;

const MARKER: &str = "return Inertia::render('Payables', [";
const DELIMITER: &str = "]);";

fn splice_cmd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_splice"));
    cmd.env("NO_COLOR", "1").env_remove("SPLICE_BACKUP_DIR");
    cmd
}

#[test]
fn test_help_lists_commands() {
    splice_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("apply"))
        .stdout(predicate::str::contains("restore"));
}

#[test]
fn test_version_output() {
    splice_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("splice"));
}

#[test]
fn test_missing_subcommand_fails() {
    splice_cmd().assert().failure();
}

#[test]
fn test_apply_replaces_block() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("doc.txt");
    file.write_str("A<<START>>old<<END>>B").unwrap();

    splice_cmd()
        .args(["apply", "-m", "<<START>>", "-d", "<<END>>", "-r", "N"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("replaced lines 1-1"));

    file.assert("ANB");
}

#[test]
fn test_apply_controller_block() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("PayablesController.php");
    file.write_str(CONTROLLER).unwrap();

    splice_cmd()
        .args(["apply", "-m", MARKER, "-d", DELIMITER, "-r", "return [];"])
        .arg(file.path())
        .assert()
        .success();

    file.assert(predicate::str::contains("        return [];\n    }"));
    file.assert(predicate::str::contains("Inertia").not());
}

#[test]
fn test_apply_missing_marker_exits_one() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("doc.txt");
    file.write_str("no markers here").unwrap();

    splice_cmd()
        .args(["apply", "-m", "<<START>>", "-d", "<<END>>", "-r", "N"])
        .arg(file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error: Start marker not found"));

    file.assert("no markers here");
}

#[test]
fn test_apply_missing_delimiter_exits_one() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("doc.txt");
    file.write_str("A<<START>>old").unwrap();

    splice_cmd()
        .args(["apply", "-m", "<<START>>", "-d", "<<END>>", "-r", "N"])
        .arg(file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("End delimiter"));

    file.assert("A<<START>>old");
}

#[test]
fn test_apply_missing_file_exits_one() {
    let temp = assert_fs::TempDir::new().unwrap();

    splice_cmd()
        .args(["apply", "-m", "a", "-d", "b", "-r", "N"])
        .arg(temp.child("absent.txt").path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error:"));

    temp.child("absent.txt").assert(predicate::path::missing());
}

#[test]
fn test_dry_run_prints_diff() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("PayablesController.php");
    file.write_str(CONTROLLER).unwrap();

    splice_cmd()
        .args(["apply", "--dry-run", "-m", MARKER, "-d", DELIMITER, "-r", "return [];"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("+        return [];"))
        .stdout(predicate::str::contains("would replace lines 6-8"));

    file.assert(CONTROLLER);
}

#[test]
fn test_apply_json_output() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("doc.txt");
    file.write_str("A<<START>>old<<END>>B").unwrap();

    let output = splice_cmd()
        .args(["apply", "--json", "-m", "<<START>>", "-d", "<<END>>", "-r", "N"])
        .arg(file.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["written"], true);
    assert_eq!(value["removed_bytes"], 19);
    assert_eq!(value["inserted_bytes"], 1);
    assert_eq!(value["span"]["start"], 1);
    assert_eq!(value["span"]["end"], 20);
}

#[test]
fn test_check_reports_span() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("doc.txt");
    file.write_str("first\nA<<START>>\nold\n<<END>>B\n").unwrap();

    splice_cmd()
        .args(["check", "-m", "<<START>>", "-d", "<<END>>"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2-4"));

    file.assert("first\nA<<START>>\nold\n<<END>>B\n");
}

#[test]
fn test_run_recipe() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("doc.txt");
    file.write_str("A<<START>>old<<END>>B").unwrap();
    temp.child("payload.txt").write_str("N").unwrap();
    let recipe = temp.child("recipe.yaml");
    recipe
        .write_str(
            "target: doc.txt\n\
             start_marker: \"<<START>>\"\n\
             end_delimiter: \"<<END>>\"\n\
             replacement_file: payload.txt\n",
        )
        .unwrap();

    splice_cmd()
        .arg("run")
        .arg(recipe.path())
        .assert()
        .success();

    file.assert("ANB");
}

#[test]
fn test_backup_then_restore() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("doc.txt");
    file.write_str("A<<START>>old<<END>>B").unwrap();
    let backups = temp.child("bk");

    splice_cmd()
        .args(["apply", "--backup", "-m", "<<START>>", "-d", "<<END>>", "-r", "N"])
        .arg("--backup-dir")
        .arg(backups.path())
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Backup"));

    file.assert("ANB");
    backups.assert(predicate::path::is_dir());

    splice_cmd()
        .arg("restore")
        .arg(file.path())
        .arg("--backup-dir")
        .arg(backups.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("restored"));

    file.assert("A<<START>>old<<END>>B");
}

#[test]
fn test_backup_dir_from_environment_is_shared_by_apply_and_restore() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("doc.txt");
    file.write_str("A<<START>>old<<END>>B").unwrap();
    let backups = temp.child("env-bk");

    splice_cmd()
        .env("SPLICE_BACKUP_DIR", backups.path())
        .args(["apply", "--backup", "-m", "<<START>>", "-d", "<<END>>", "-r", "N"])
        .arg(file.path())
        .assert()
        .success();

    file.assert("ANB");
    backups.assert(predicate::path::is_dir());
    temp.child(".splice-backups").assert(predicate::path::missing());

    splice_cmd()
        .env("SPLICE_BACKUP_DIR", backups.path())
        .arg("restore")
        .arg(file.path())
        .assert()
        .success();

    file.assert("A<<START>>old<<END>>B");
}

#[test]
fn test_restore_without_backup_fails() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("doc.txt");
    file.write_str("content").unwrap();

    splice_cmd()
        .arg("restore")
        .arg(file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error:"));

    file.assert("content");
}
