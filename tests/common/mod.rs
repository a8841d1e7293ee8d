#![allow(dead_code)]

use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;

/// Command under test, rooted in the given repository directory.
pub fn vcs(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("vcs").expect("binary under test");
    cmd.current_dir(dir.path());
    cmd
}

/// A fresh initialized repository in a temp directory.
pub fn init_repository() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    vcs(&dir).arg("init").assert().success();
    dir
}

pub fn write_file(dir: &TempDir, name: &str, content: &str) {
    dir.child(name).write_str(content).expect("write file");
}

pub fn read_file(dir: &TempDir, name: &str) -> String {
    std::fs::read_to_string(dir.path().join(name)).expect("read file")
}

pub fn file_exists(dir: &TempDir, name: &str) -> bool {
    dir.path().join(name).is_file()
}

/// Write, stage and commit one file in a single step.
pub fn commit_file(dir: &TempDir, name: &str, content: &str, message: &str) {
    write_file(dir, name, content);
    vcs(dir).args(["add", name]).assert().success();
    vcs(dir).args(["commit", message]).assert().success();
}

/// The commit id a branch file points at.
pub fn branch_tip(dir: &TempDir, branch: &str) -> String {
    std::fs::read_to_string(dir.path().join(".vcs/refs/heads").join(branch))
        .expect("branch file")
        .trim()
        .to_string()
}

/// The commit id of the current branch's tip, resolved through HEAD.
pub fn head_commit_id(dir: &TempDir) -> String {
    let head = std::fs::read_to_string(dir.path().join(".vcs/HEAD")).expect("HEAD file");
    let branch = head
        .trim()
        .strip_prefix("ref: refs/heads/")
        .expect("HEAD is a symbolic ref")
        .to_string();
    branch_tip(dir, &branch)
}
