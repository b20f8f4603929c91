//! Commit message generation through an OpenAI-compatible chat endpoint.

pub mod client;
pub mod generate;
pub mod prompt;
pub mod retry;
pub mod shape;

pub use client::{ChatBackend, ChatRequest, OpenAiClient};
pub use generate::{generate, generate_commit_message};
pub use prompt::{ChatMessage, Role, SYSTEM_PROMPT, build_conversation};
pub use shape::{GeneratedMessage, MessageShape};
