use predicates::prelude::predicate;

mod common;

#[test]
fn add_then_commit_records_a_new_tip() {
    let dir = common::init_repository();
    let root = common::head_commit_id(&dir);

    common::commit_file(&dir, "a.txt", "one", "add a");

    let tip = common::head_commit_id(&dir);
    assert_ne!(tip, root);
    assert_eq!(tip.len(), 40);

    common::vcs(&dir)
        .arg("log")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("commit {}", tip)))
        .stdout(predicate::str::contains("add a"));
}

#[test]
fn adding_a_missing_file_is_an_error() {
    let dir = common::init_repository();

    common::vcs(&dir)
        .args(["add", "ghost.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("File does not exist."));
}

#[test]
fn committing_with_a_blank_message_is_refused() {
    let dir = common::init_repository();
    common::write_file(&dir, "a.txt", "one");
    common::vcs(&dir).args(["add", "a.txt"]).assert().success();

    common::vcs(&dir)
        .args(["commit", "   "])
        .assert()
        .success()
        .stdout(predicate::str::contains("Please enter a commit message."));

    // the staged file survives the refused commit
    common::vcs(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("a.txt"));
}

#[test]
fn committing_an_empty_index_is_refused() {
    let dir = common::init_repository();
    let tip = common::head_commit_id(&dir);

    common::vcs(&dir)
        .args(["commit", "nothing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No changes added to the commit."));

    assert_eq!(common::head_commit_id(&dir), tip);
}

#[test]
fn readding_the_head_version_unstages_the_file() {
    let dir = common::init_repository();
    common::commit_file(&dir, "a.txt", "one", "add a");

    common::write_file(&dir, "a.txt", "two");
    common::vcs(&dir).args(["add", "a.txt"]).assert().success();
    common::write_file(&dir, "a.txt", "one");
    common::vcs(&dir).args(["add", "a.txt"]).assert().success();

    common::vcs(&dir)
        .args(["commit", "noop"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No changes added to the commit."));
}

#[test]
fn rm_unstages_a_file_that_was_never_committed() {
    let dir = common::init_repository();
    common::write_file(&dir, "a.txt", "one");
    common::vcs(&dir).args(["add", "a.txt"]).assert().success();

    common::vcs(&dir).args(["rm", "a.txt"]).assert().success();

    common::vcs(&dir)
        .args(["commit", "nothing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No changes added to the commit."));
    // the working-tree copy is untouched
    assert!(common::file_exists(&dir, "a.txt"));
}

#[test]
fn rm_deletes_a_tracked_file_and_commits_its_removal() {
    let dir = common::init_repository();
    common::commit_file(&dir, "a.txt", "one", "add a");

    common::vcs(&dir).args(["rm", "a.txt"]).assert().success();
    assert!(!common::file_exists(&dir, "a.txt"));

    common::vcs(&dir)
        .args(["commit", "remove a"])
        .assert()
        .success();

    // the removed file is not restorable from the new head
    common::vcs(&dir)
        .args(["checkout", "-p", "a.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("File does not exist in that commit."));
}

#[test]
fn rm_of_an_untracked_unstaged_file_is_refused() {
    let dir = common::init_repository();
    common::write_file(&dir, "a.txt", "one");

    common::vcs(&dir)
        .args(["rm", "a.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No reason to remove the file."));
}

#[test]
fn add_after_rm_cancels_the_pending_removal() {
    let dir = common::init_repository();
    common::commit_file(&dir, "a.txt", "one", "add a");

    common::vcs(&dir).args(["rm", "a.txt"]).assert().success();
    common::write_file(&dir, "a.txt", "one");
    common::vcs(&dir).args(["add", "a.txt"]).assert().success();

    // content matches head again, so the index is empty on both sides
    common::vcs(&dir)
        .args(["commit", "noop"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No changes added to the commit."));
}

#[test]
fn status_reports_staged_removed_and_untracked_sections() {
    let dir = common::init_repository();
    common::commit_file(&dir, "tracked.txt", "keep", "add tracked");

    common::write_file(&dir, "staged.txt", "staged");
    common::vcs(&dir)
        .args(["add", "staged.txt"])
        .assert()
        .success();
    common::vcs(&dir)
        .args(["rm", "tracked.txt"])
        .assert()
        .success();
    common::write_file(&dir, "loose.txt", "loose");

    let output = common::vcs(&dir)
        .arg("status")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let output = String::from_utf8(output).unwrap();

    let staged_at = output.find("=== Staged Files ===").unwrap();
    let removed_at = output.find("=== Removed Files ===").unwrap();
    let untracked_at = output.find("=== Untracked Files ===").unwrap();

    let staged_section = &output[staged_at..removed_at];
    let removed_section = &output[removed_at..untracked_at];
    let untracked_section = &output[untracked_at..];

    assert!(output.starts_with("=== Branches ==="));
    assert!(output.contains("*master"));
    assert!(staged_section.contains("staged.txt"));
    assert!(removed_section.contains("tracked.txt"));
    assert!(untracked_section.contains("loose.txt"));
    assert!(output.contains("=== Modifications Not Staged For Commit ==="));
}
