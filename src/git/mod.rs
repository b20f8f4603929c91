//! Repository inspection by shelling out to the system `git` binary.

pub mod command;
pub mod history;
pub mod repo;

pub use command::{check_git_installed, run_git};
pub use history::{CommitInfo, EMPTY_TREE_SHA, commit_message, diff_for_commit, list_commits};
pub use repo::{resolve_repo_root, staged_diff};
