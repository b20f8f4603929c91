//! Commit history scanning: log entries, per-commit diffs and messages.

use std::path::Path;
use std::sync::OnceLock;

use regex_lite::Regex;
use tracing::{debug, info};

use crate::error::GitError;

use super::command::run_git;

/// Object id of git's empty tree, used as the base for root commits.
pub const EMPTY_TREE_SHA: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

/// Length of a full SHA-1 commit hash.
const SHA_LEN: usize = 40;

/// A commit found while scanning history. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub sha: String,
    pub subject: String,
}

impl CommitInfo {
    /// Abbreviated hash for progress output.
    pub fn short_sha(&self) -> &str {
        &self.sha[..7.min(self.sha.len())]
    }
}

fn sha_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9a-f]{40}$").expect("static regex is valid"))
}

/// Parse `git log --format=%H %s` output.
///
/// Lines without a full 40-character hex hash are skipped; scanning is
/// best-effort.
pub fn parse_log_lines(output: &str) -> Vec<CommitInfo> {
    output
        .lines()
        .filter_map(|line| {
            let sha = line.get(..SHA_LEN)?;
            if !sha_regex().is_match(sha) {
                debug!("Skipping malformed log line: {:?}", line);
                return None;
            }
            let subject = line.get(SHA_LEN + 1..).unwrap_or("").to_string();
            Some(CommitInfo {
                sha: sha.to_string(),
                subject,
            })
        })
        .collect()
}

/// List at most `count` commits walking back from `start_ref`, newest first.
///
/// An empty `start_ref` means the current branch tip. A branch with no
/// commits yet has no history, which is an empty list rather than an error.
pub fn list_commits(
    repo_root: &Path,
    start_ref: Option<&str>,
    count: usize,
) -> Result<Vec<CommitInfo>, GitError> {
    if count == 0 {
        return Ok(Vec::new());
    }

    let start = start_ref.filter(|s| !s.is_empty());
    if start.is_none() && !has_head(repo_root)? {
        info!("HEAD has no commits yet, nothing to list");
        return Ok(Vec::new());
    }

    let limit = format!("-n{count}");
    let mut args = vec!["log", "--format=format:%H %s", limit.as_str()];
    if let Some(start) = start {
        args.push(start);
    }
    args.push("--");

    let stdout = run_git(Some(repo_root), &args)?;
    Ok(parse_log_lines(&stdout))
}

/// Whether HEAD resolves to a commit. False on an unborn branch.
fn has_head(repo_root: &Path) -> Result<bool, GitError> {
    match run_git(
        Some(repo_root),
        &["rev-parse", "--verify", "--quiet", "HEAD^{commit}"],
    ) {
        Ok(_) => Ok(true),
        Err(e) if e.is_revision_not_found() => Ok(false),
        Err(e) => Err(e),
    }
}

/// Diff introduced by `sha` against its first parent.
///
/// A root commit has no parent; it is diffed against the empty tree.
pub fn diff_for_commit(repo_root: &Path, sha: &str) -> Result<String, GitError> {
    let parent = format!("{sha}^");

    let probe = run_git(
        Some(repo_root),
        &["rev-parse", "--verify", "--quiet", &parent],
    );
    let base = match probe {
        Ok(_) => parent,
        Err(e) if e.is_revision_not_found() => {
            info!(
                "Commit {} has no parent, diffing against the empty tree",
                &sha[..7.min(sha.len())]
            );
            EMPTY_TREE_SHA.to_string()
        }
        Err(e) => return Err(e),
    };

    run_git(
        Some(repo_root),
        &["diff", "--no-color", "--no-ext-diff", &base, sha],
    )
}

/// Full message (subject and body) of a commit.
pub fn commit_message(repo_root: &Path, sha: &str) -> Result<String, GitError> {
    let stdout = run_git(Some(repo_root), &["log", "-n1", "--format=%B", sha, "--"])?;
    Ok(stdout.trim_end().to_string())
}
