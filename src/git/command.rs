//! Running `git` subcommands scoped to a directory.
//!
//! All repository reads go through [`run_git`], which inherits the user's
//! git configuration and returns stdout untouched so callers decide how
//! much whitespace is meaningful (diff text keeps it, refs do not).

use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::GitError;

/// Check that a `git` executable is reachable on PATH.
pub fn check_git_installed() -> Result<(), GitError> {
    which::which("git").map(|_| ()).map_err(|_| GitError::NotInstalled)
}

/// Run `git <args>` in `dir` (or the current directory when `None`) and
/// return its stdout.
///
/// A non-zero exit becomes [`GitError::CommandFailed`] carrying the exit
/// code and trimmed stderr.
pub fn run_git(dir: Option<&Path>, args: &[&str]) -> Result<String, GitError> {
    let joined = args.join(" ");
    debug!("git {} (in {:?})", joined, dir);

    let mut cmd = Command::new("git");
    cmd.args(args);
    if let Some(dir) = dir {
        cmd.current_dir(dir);
    }

    let output = cmd.output().map_err(|source| GitError::SpawnFailed {
        args: joined.clone(),
        source,
    })?;

    if !output.status.success() {
        return Err(GitError::CommandFailed {
            args: joined,
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
