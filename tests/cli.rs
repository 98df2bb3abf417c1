// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use std::process::Command as StdCommand;

use assert_cmd::Command;
use predicates::prelude::*;

fn gitmit() -> Command {
    let mut cmd = Command::cargo_bin("gitmit").unwrap();
    cmd.env_remove("GITMIT_MODEL")
        .env_remove("GITMIT_COMMIT_MODEL")
        .env_remove("RUST_LOG");
    cmd
}

fn git_available() -> bool {
    StdCommand::new("git")
        .arg("--version")
        .output()
        .is_ok_and(|o| o.status.success())
}

#[test]
fn help_lists_subcommands() {
    gitmit()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("commit"))
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn commit_help_lists_flags() {
    gitmit()
        .args(["commit", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--brief"))
        .stdout(predicate::str::contains("--no-feat"))
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("manual"));
}

#[test]
fn completions_are_generated() {
    gitmit()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gitmit"));
}

#[test]
fn invalid_model_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    gitmit()
        .current_dir(dir.path())
        .args(["--model", "llama3", "analyze"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("service/model"));
}

#[test]
fn analyze_outside_repository_fails() {
    let dir = tempfile::tempdir().unwrap();
    gitmit()
        .current_dir(dir.path())
        .arg("analyze")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a git repository"));
}

#[test]
fn analyze_reports_new_files() {
    if !git_available() {
        eprintln!("git not found, skipping");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let status = StdCommand::new("git")
        .arg("init")
        .arg("--quiet")
        .current_dir(dir.path())
        .status()
        .unwrap();
    assert!(status.success());

    std::fs::write(dir.path().join("foo.py"), "def bar():\n    pass\n").unwrap();
    std::fs::create_dir(dir.path().join("build")).unwrap();
    std::fs::write(dir.path().join("build/out.txt"), "artifact\n").unwrap();
    std::fs::write(dir.path().join(".gitmitignore"), "build/\n.gitmitignore\n").unwrap();

    gitmit()
        .current_dir(dir.path())
        .args(["analyze", "--debug"])
        .assert()
        .success()
        .stdout(predicate::str::contains("NEW_FILES"))
        .stdout(predicate::str::contains("foo.py"))
        .stdout(predicate::str::contains("build/out.txt").not())
        .stdout(predicate::str::contains("1 (1 new, 0 modified)"));
}
