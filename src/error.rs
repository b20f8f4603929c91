//! Error types for diffgpt modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from running the `git` binary.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("git executable not found in PATH")]
    NotInstalled,

    #[error("Failed to spawn git {args}: {source}")]
    SpawnFailed {
        args: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {args} exited with {}: {stderr}",
             code.map_or("unknown status".to_string(), |c| format!("code {c}")))]
    CommandFailed {
        args: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Not a git repository: {}", path.display())]
    NotAGitRepo { path: PathBuf },

    #[error("Failed to determine current working directory: {0}")]
    WorkingDir(#[source] std::io::Error),
}

impl GitError {
    /// Whether git rejected a revision because it does not exist.
    ///
    /// `rev-parse --verify --quiet` exits 1 with nothing on stderr for a
    /// missing revision; without `--quiet` git names the bad revision.
    pub fn is_revision_not_found(&self) -> bool {
        match self {
            GitError::CommandFailed { code, stderr, .. } => {
                if *code == Some(1) && stderr.trim().is_empty() {
                    return true;
                }
                let stderr = stderr.to_lowercase();
                stderr.contains("unknown revision")
                    || stderr.contains("bad revision")
                    || stderr.contains("needed a single revision")
            }
            _ => false,
        }
    }
}

/// Errors from loading or saving the example store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Could not determine the user configuration directory")]
    ConfigDirUnavailable,

    #[error("Failed to read example store {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Example store {} is corrupt: {source}", path.display())]
    CorruptState {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize example store: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to create config directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write temporary store file in {}: {source}", dir.display())]
    Write {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to replace {} with temporary store file: {source}{}",
             path.display(),
             cleanup.as_ref().map_or(String::new(), |e| {
                 format!(" (and failed to remove temporary file: {e})")
             }))]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        cleanup: Option<std::io::Error>,
    },
}

/// Errors from the chat completions call.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("No API key provided. Set DIFFGPT_API_KEY or use --api-key")]
    MissingApiKey,

    #[error("Failed to call chat completion API: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Chat completion API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Chat completion API returned a body that is not a completion response: {source}")]
    InvalidResponse {
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Chat completion API returned no choices")]
    EmptyResponse,

    #[error("Model refused to answer: {0}")]
    Refused(String),

    #[error("Model returned output that does not match the {shape} schema: {source}")]
    Decode {
        shape: &'static str,
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("All {attempts} attempts failed: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<LlmError>,
    },
}

impl LlmError {
    /// The call succeeded but the content could not be decoded.
    pub fn is_decode(&self) -> bool {
        match self {
            LlmError::Decode { .. } => true,
            LlmError::RetriesExhausted { last, .. } => last.is_decode(),
            _ => false,
        }
    }

    /// Whether a fresh attempt could plausibly succeed.
    ///
    /// Transport failures, rate limits, server errors and undecodable
    /// output are retryable; auth and request errors are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::Request(_)
            | LlmError::InvalidResponse { .. }
            | LlmError::EmptyResponse
            | LlmError::Decode { .. } => true,
            LlmError::Api { status, .. } => *status == 429 || *status >= 500,
            LlmError::MissingApiKey | LlmError::Refused(_) | LlmError::RetriesExhausted { .. } => {
                false
            }
        }
    }
}

/// Errors from the interactive `git commit` subprocess.
#[derive(Error, Debug)]
pub enum CommitError {
    #[error("Failed to start git commit: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("Failed to write commit message to git stdin: {0}")]
    StdinWrite(#[source] std::io::Error),

    #[error("Failed to wait for git commit: {0}")]
    WaitFailed(#[source] std::io::Error),

    #[error("git commit failed with {}",
             code.map_or("a signal".to_string(), |c| format!("exit code {c}")))]
    Failed { code: Option<i32> },
}
