use predicates::prelude::predicate;

mod common;

#[test]
fn checkout_path_restores_the_head_version() {
    let dir = common::init_repository();
    common::commit_file(&dir, "a.txt", "committed", "add a");

    common::write_file(&dir, "a.txt", "scratch edits");
    common::vcs(&dir)
        .args(["checkout", "-p", "a.txt"])
        .assert()
        .success();

    assert_eq!(common::read_file(&dir, "a.txt"), "committed");
}

#[test]
fn checkout_commit_path_restores_an_older_version() {
    let dir = common::init_repository();
    common::commit_file(&dir, "a.txt", "version one", "first");
    let first_tip = common::head_commit_id(&dir);
    common::commit_file(&dir, "a.txt", "version two", "second");

    common::vcs(&dir)
        .args(["checkout", &first_tip, "-p", "a.txt"])
        .assert()
        .success();

    assert_eq!(common::read_file(&dir, "a.txt"), "version one");
}

#[test]
fn checkout_path_fails_for_a_file_the_commit_does_not_track() {
    let dir = common::init_repository();

    common::vcs(&dir)
        .args(["checkout", "-p", "ghost.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("File does not exist in that commit."));
}

#[test]
fn checkout_branch_swaps_the_working_tree() {
    let dir = common::init_repository();
    common::commit_file(&dir, "shared.txt", "base", "base");

    common::vcs(&dir).args(["branch", "other"]).assert().success();
    common::commit_file(&dir, "master-only.txt", "m", "master file");

    common::vcs(&dir).args(["checkout", "other"]).assert().success();

    assert!(common::file_exists(&dir, "shared.txt"));
    assert!(
        !common::file_exists(&dir, "master-only.txt"),
        "files tracked only by the left branch are removed"
    );

    common::vcs(&dir).args(["checkout", "master"]).assert().success();
    assert_eq!(common::read_file(&dir, "master-only.txt"), "m");
}

#[test]
fn checkout_refuses_the_current_branch() {
    let dir = common::init_repository();

    common::vcs(&dir)
        .args(["checkout", "master"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No need to checkout the current branch."));
}

#[test]
fn checkout_refuses_a_missing_branch() {
    let dir = common::init_repository();

    common::vcs(&dir)
        .args(["checkout", "ghost"])
        .assert()
        .success()
        .stdout(predicate::str::contains("A branch with that name does not exist."));
}

#[test]
fn checkout_refuses_to_overwrite_an_untracked_file() {
    let dir = common::init_repository();
    common::vcs(&dir).args(["branch", "other"]).assert().success();
    common::commit_file(&dir, "a.txt", "master version", "add a");

    common::vcs(&dir).args(["checkout", "other"]).assert().success();
    common::write_file(&dir, "a.txt", "precious scratch data");

    common::vcs(&dir)
        .args(["checkout", "master"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "There is an untracked file in the way; delete it, or add and commit it first.",
        ));

    // the untracked file survives the refused checkout
    assert_eq!(common::read_file(&dir, "a.txt"), "precious scratch data");
}

#[test]
fn checkout_branch_clears_the_index() {
    let dir = common::init_repository();
    common::vcs(&dir).args(["branch", "other"]).assert().success();

    common::write_file(&dir, "staged.txt", "staged");
    common::vcs(&dir).args(["add", "staged.txt"]).assert().success();

    common::vcs(&dir).args(["checkout", "other"]).assert().success();

    common::vcs(&dir)
        .args(["commit", "after switch"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No changes added to the commit."));
}

#[test]
fn checkout_without_operands_is_rejected() {
    let dir = common::init_repository();

    common::vcs(&dir)
        .arg("checkout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Incorrect operands."));
}
