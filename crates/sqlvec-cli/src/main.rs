//! # sqlvec CLI
//!
//! Command-line access to the sqlvec SQLite vector functions and indexes.
//! Run `sqlvec --help` for usage information.

mod cli;
mod ui;

use std::process::ExitCode;

fn main() -> ExitCode {
    cli::run()
}
