//! Interactive commit driver.
//!
//! `git commit -e -F -` reads the proposed message from stdin and then opens
//! the user's editor on it. The message is written from a separate task so
//! that a large message can never deadlock against a child that is still
//! starting up; stdout and stderr stay attached to the terminal.

use std::io;
use std::path::Path;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::{ChildStdin, Command};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::error::CommitError;

/// Exit status git uses when the user leaves the message empty or quits
/// the editor without saving.
pub const ABORT_EXIT_CODE: i32 = 1;

/// How an interactive commit ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed,
    /// The user backed out. Not an error.
    Aborted,
}

/// `git commit -e -F -`, run in `repo_root` when given.
pub fn commit_command(repo_root: Option<&Path>) -> Command {
    let mut cmd = Command::new("git");
    cmd.args(["commit", "-e", "-F", "-"]);
    if let Some(dir) = repo_root {
        cmd.current_dir(dir);
    }
    cmd
}

/// Commit the staged changes, letting the user edit `message` first.
pub async fn commit(message: &str, repo_root: Option<&Path>) -> Result<CommitOutcome, CommitError> {
    run_with_message(commit_command(repo_root), message).await
}

/// Spawn `cmd`, feed `message` on its stdin, then wait for it to exit.
///
/// If the message cannot be written the child is killed and the write
/// error is returned.
pub async fn run_with_message(
    mut cmd: Command,
    message: &str,
) -> Result<CommitOutcome, CommitError> {
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    let mut child = cmd.spawn().map_err(CommitError::SpawnFailed)?;
    let stdin = child.stdin.take().ok_or_else(|| {
        CommitError::StdinWrite(io::Error::new(
            io::ErrorKind::BrokenPipe,
            "child stdin was not captured",
        ))
    })?;

    let (tx, rx) = oneshot::channel();
    let payload = message.as_bytes().to_vec();
    tokio::spawn(async move {
        let _ = tx.send(write_and_close(stdin, payload).await);
    });

    let written = rx
        .await
        .unwrap_or_else(|_| Err(io::Error::other("stdin writer ended without reporting")));

    if let Err(e) = written {
        warn!("Failed to write commit message, stopping git: {}", e);
        if let Err(kill_err) = child.kill().await {
            debug!("Failed to kill git commit: {}", kill_err);
        }
        return Err(CommitError::StdinWrite(e));
    }

    let status = child.wait().await.map_err(CommitError::WaitFailed)?;
    debug!("git commit exited with {:?}", status.code());
    classify_exit(status.code())
}

/// Dropping `stdin` at the end closes the pipe so the child sees EOF.
async fn write_and_close(mut stdin: ChildStdin, payload: Vec<u8>) -> io::Result<()> {
    stdin.write_all(&payload).await?;
    stdin.shutdown().await
}

fn classify_exit(code: Option<i32>) -> Result<CommitOutcome, CommitError> {
    match code {
        Some(0) => Ok(CommitOutcome::Committed),
        Some(ABORT_EXIT_CODE) => Ok(CommitOutcome::Aborted),
        code => Err(CommitError::Failed { code }),
    }
}
