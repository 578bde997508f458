//! Shared test utilities for sqlvec-cli integration tests.

use assert_cmd::Command;
use std::path::Path;

/// Get a Command for the sqlvec binary.
///
/// # Panics
///
/// Panics if the sqlvec binary cannot be found. This should not happen
/// in a properly configured test environment.
#[allow(deprecated)]
pub fn sqlvec_cmd() -> Command {
    let mut cmd = Command::cargo_bin("sqlvec").expect("sqlvec binary should exist");
    cmd.env_remove("SQLVEC_DB")
        .env_remove("SQLVEC_CONFIG")
        .env_remove("SQLVEC_VERBOSE");
    cmd
}

/// A sqlvec command bound to a database and config file inside `dir`.
///
/// The config file does not need to exist.
pub fn sqlvec_in(dir: &Path) -> Command {
    let mut cmd = sqlvec_cmd();
    cmd.env("SQLVEC_DB", dir.join("test.db"))
        .env("SQLVEC_CONFIG", dir.join("config.yaml"));
    cmd
}
