//! Learning a repository's commit style from its history.
//!
//! Learning is best-effort: a commit whose diff or message cannot be read
//! is skipped with a warning and the rest are still collected.

use std::path::Path;

use tracing::{info, warn};

use crate::error::GitError;
use crate::git::{CommitInfo, commit_message, diff_for_commit, list_commits};
use crate::store::Example;

/// Default number of commits scanned by `learn`.
pub const DEFAULT_LEARN_COUNT: usize = 10;

/// Progress notifications emitted while scanning.
#[derive(Debug)]
pub enum LearnEvent<'a> {
    Processing {
        index: usize,
        total: usize,
        commit: &'a CommitInfo,
    },
    SkippedEmpty {
        commit: &'a CommitInfo,
    },
    Failed {
        commit: &'a CommitInfo,
        error: &'a GitError,
    },
}

/// Outcome of a scan.
#[derive(Debug, Default)]
pub struct LearnReport {
    /// Collected examples, newest commit first.
    pub examples: Vec<Example>,
    /// Commits returned by the log query.
    pub commits_seen: usize,
    /// Commits whose diff was empty (typically merges).
    pub skipped_empty: usize,
    /// Commits whose diff or message could not be read.
    pub failed: usize,
}

/// Scan up to `count` commits from `start_ref` and turn each into an example.
///
/// Only the log query itself is fatal. Per-commit failures are reported
/// through `on_event` and counted in the report.
pub fn collect_examples<F>(
    repo_root: &Path,
    start_ref: Option<&str>,
    count: usize,
    mut on_event: F,
) -> Result<LearnReport, GitError>
where
    F: FnMut(LearnEvent<'_>),
{
    let commits = list_commits(repo_root, start_ref, count)?;
    let total = commits.len();
    let mut report = LearnReport {
        examples: Vec::with_capacity(total),
        commits_seen: total,
        ..Default::default()
    };

    for (i, commit) in commits.iter().enumerate() {
        on_event(LearnEvent::Processing {
            index: i + 1,
            total,
            commit,
        });

        let diff = match diff_for_commit(repo_root, &commit.sha) {
            Ok(diff) => diff,
            Err(error) => {
                warn!("Failed to get diff for commit {}: {}", commit.sha, error);
                on_event(LearnEvent::Failed {
                    commit,
                    error: &error,
                });
                report.failed += 1;
                continue;
            }
        };

        if diff.trim().is_empty() {
            info!("Skipping commit {}: empty diff", commit.short_sha());
            on_event(LearnEvent::SkippedEmpty { commit });
            report.skipped_empty += 1;
            continue;
        }

        let message = match commit_message(repo_root, &commit.sha) {
            Ok(message) => message,
            Err(error) => {
                warn!("Failed to get message for commit {}: {}", commit.sha, error);
                on_event(LearnEvent::Failed {
                    commit,
                    error: &error,
                });
                report.failed += 1;
                continue;
            }
        };

        report.examples.push(Example { diff, message });
    }

    Ok(report)
}
