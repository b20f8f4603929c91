//! Handing a generated message to an interactive `git commit`.

pub mod driver;

pub use driver::{ABORT_EXIT_CODE, CommitOutcome, commit, commit_command, run_with_message};
