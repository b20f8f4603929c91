//! Conversation construction for commit message generation.
//!
//! Learned examples become few-shot turns: each example is a user request
//! for its diff answered by an assistant turn holding the human-written
//! message. The diff being committed is always the final user turn.

use serde::Serialize;

use crate::store::Example;

/// Fixed system instruction sent with every request.
pub const SYSTEM_PROMPT: &str = "You are an expert programmer helping to write git commit messages.
Read the code diff you are given and write a concise, informative commit message that follows
the Conventional Commits style (for example \"feat: add user login\").
Describe what the change does accurately. Do not add explanations, apologies or commentary.";

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One role-tagged turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// The user turn asking for a message for `diff`.
pub fn user_request(diff: &str) -> String {
    format!("Generate a commit message for the following diff:\n```diff\n{diff}\n```")
}

/// Build the ordered conversation: system, then a user/assistant pair per
/// example in order, then the request for `diff`.
pub fn build_conversation(diff: &str, examples: &[Example]) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(2 + examples.len() * 2);
    messages.push(ChatMessage::system(SYSTEM_PROMPT));

    for example in examples {
        messages.push(ChatMessage::user(user_request(&example.diff)));
        messages.push(ChatMessage::assistant(example.message.as_str()));
    }

    messages.push(ChatMessage::user(user_request(diff)));
    messages
}
