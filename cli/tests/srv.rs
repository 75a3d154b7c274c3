//! # Chatterify CLI Srv Integration Tests
//!
//! File: cli/tests/srv.rs
//!
//! Startup failures of `chatterify srv`. The router itself is covered by
//! the unit tests in `server_logic.rs` and `api.rs`.
//!

mod common;
use common::*;
use predicates::prelude::*;

#[test]
fn test_srv_missing_directory_fails() {
    let (dir, path) = config_file("");
    hermetic_cmd(&path)
        .arg("srv")
        .arg(dir.path().join("no-such-site"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not be found"));
}

#[test]
fn test_srv_file_is_not_a_directory() {
    let (_dir, path) = config_file("");
    hermetic_cmd(&path)
        .arg("srv")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a directory"));
}
