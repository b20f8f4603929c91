//! Repository root discovery and the staged diff.

use std::path::{Path, PathBuf};

use crate::error::GitError;

use super::command::run_git;

/// Resolve the top-level directory of the repository containing `path`.
///
/// `None` (or an empty path) means the current working directory. A path
/// to a file is replaced by its containing directory. The result is
/// canonicalized so it can be used as a stable store scope key.
pub fn resolve_repo_root(path: Option<&Path>) -> Result<PathBuf, GitError> {
    let target = match path.filter(|p| !p.as_os_str().is_empty()) {
        None => std::env::current_dir().map_err(GitError::WorkingDir)?,
        Some(p) => {
            let metadata = std::fs::metadata(p).map_err(|_| GitError::NotAGitRepo {
                path: p.to_path_buf(),
            })?;
            if metadata.is_dir() {
                p.to_path_buf()
            } else {
                match p.parent() {
                    Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                    _ => PathBuf::from("."),
                }
            }
        }
    };

    let stdout = match run_git(Some(&target), &["rev-parse", "--show-toplevel"]) {
        Ok(out) => out,
        Err(GitError::CommandFailed { .. }) => {
            return Err(GitError::NotAGitRepo { path: target });
        }
        Err(e) => return Err(e),
    };

    let toplevel = stdout.trim();
    if toplevel.is_empty() {
        // Inside a .git directory or a bare repository there is no work tree.
        return Err(GitError::NotAGitRepo { path: target });
    }

    std::fs::canonicalize(toplevel).map_err(|_| GitError::NotAGitRepo {
        path: PathBuf::from(toplevel),
    })
}

/// Diff of the index against HEAD.
///
/// An empty string means nothing is staged; that is not an error.
pub fn staged_diff(repo_root: &Path) -> Result<String, GitError> {
    run_git(
        Some(repo_root),
        &["diff", "--staged", "--no-color", "--no-ext-diff"],
    )
}
