//! diffgpt - writes commit messages from your staged diff.
//!
//! # Overview
//!
//! diffgpt sends the staged diff to an OpenAI-compatible chat endpoint and
//! asks for a conventional commit message in a fixed JSON shape. Messages
//! can be conditioned on examples learned from a repository's own history
//! (or a global set), so the output follows the house style. The result is
//! opened in `git commit`'s editor for the user to accept, edit or abandon.

pub mod commit;
pub mod config;
pub mod error;
pub mod git;
pub mod learn;
pub mod llm;
pub mod store;

pub use commit::CommitOutcome;
pub use config::Config;
pub use error::{CommitError, GitError, LlmError, StoreError};
pub use learn::{LearnEvent, LearnReport, collect_examples};
pub use llm::{GeneratedMessage, MessageShape};
pub use store::{Example, ExampleStore, Scope};
