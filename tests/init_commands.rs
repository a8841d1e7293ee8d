use predicates::prelude::predicate;

mod common;

#[test]
fn init_lays_out_the_metadata_directory() {
    let dir = common::init_repository();

    assert!(dir.path().join(".vcs/objects").is_dir());
    assert!(dir.path().join(".vcs/refs/heads/master").is_file());

    let head = std::fs::read_to_string(dir.path().join(".vcs/HEAD")).unwrap();
    assert_eq!(head.trim(), "ref: refs/heads/master");
}

#[test]
fn every_repository_starts_from_the_same_root_commit() {
    let first = common::init_repository();
    let second = common::init_repository();

    assert_eq!(
        common::branch_tip(&first, "master"),
        common::branch_tip(&second, "master")
    );
}

#[test]
fn reinitializing_is_refused() {
    let dir = common::init_repository();

    common::vcs(&dir).arg("init").assert().success().stdout(
        predicate::str::contains("A vcs repository already exists in the current directory."),
    );
}

#[test]
fn commands_outside_a_repository_are_refused() {
    let dir = assert_fs::TempDir::new().unwrap();

    common::vcs(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Not in an initialized vcs directory.",
        ));
}

#[test]
fn log_of_a_fresh_repository_shows_the_root_commit() {
    let dir = common::init_repository();

    common::vcs(&dir)
        .arg("log")
        .assert()
        .success()
        .stdout(predicate::str::contains("initial commit"))
        .stdout(predicate::str::contains("Thu Jan 1 00:00:00 1970 +0000"));
}
