//! Structured generation: conversation in, decoded commit message out.

use tracing::{debug, info};

use crate::error::LlmError;
use crate::store::Example;

use super::client::{ChatBackend, ChatRequest};
use super::prompt::{ChatMessage, build_conversation};
use super::retry::retry_with_backoff;
use super::shape::{GeneratedMessage, MessageShape};

/// Send one strict-schema request and decode the reply into `shape`.
pub async fn generate<B>(
    backend: &B,
    shape: MessageShape,
    model: &str,
    conversation: Vec<ChatMessage>,
) -> Result<GeneratedMessage, LlmError>
where
    B: ChatBackend + ?Sized,
{
    let request = ChatRequest {
        model: model.to_string(),
        messages: conversation,
        response_format: shape.response_format(),
    };

    let content = backend.complete(&request).await?;
    debug!("Model replied with {} bytes", content.len());
    shape.decode(&content)
}

/// Produce the final commit message text for `diff`, conditioned on
/// `examples` in order.
pub async fn generate_commit_message<B>(
    backend: &B,
    model: &str,
    shape: MessageShape,
    diff: &str,
    examples: &[Example],
    max_attempts: u32,
) -> Result<String, LlmError>
where
    B: ChatBackend + ?Sized,
{
    let conversation = build_conversation(diff, examples);
    info!(
        "Generating {} message with {} example(s)",
        shape.name(),
        examples.len()
    );

    let message = retry_with_backoff(max_attempts, || {
        generate(backend, shape, model, conversation.clone())
    })
    .await?;

    Ok(message.render())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::MockChatBackend;
    use crate::llm::prompt::Role;

    #[tokio::test]
    async fn test_generate_short_message() {
        let mut backend = MockChatBackend::new();
        backend
            .expect_complete()
            .withf(|req| {
                req.model == "gpt-4o-mini"
                    && req.response_format["json_schema"]["name"] == "commit"
                    && req.messages.last().is_some_and(|m| m.role == Role::User)
            })
            .times(1)
            .returning(|_| Ok(r#"{"message": "feat: add login"}"#.to_string()));

        let message = generate_commit_message(
            &backend,
            "gpt-4o-mini",
            MessageShape::Short,
            "+login",
            &[],
            1,
        )
        .await
        .unwrap();

        assert_eq!(message, "feat: add login");
    }

    #[tokio::test]
    async fn test_generate_detailed_message() {
        let mut backend = MockChatBackend::new();
        backend
            .expect_complete()
            .withf(|req| req.response_format["json_schema"]["name"] == "detailed_commit")
            .times(1)
            .returning(|_| {
                Ok(r#"{"message": "feat: add login", "details": "- added X"}"#.to_string())
            });

        let message = generate_commit_message(
            &backend,
            "gpt-4o-mini",
            MessageShape::Detailed,
            "+login",
            &[],
            1,
        )
        .await
        .unwrap();

        assert_eq!(message, "feat: add login\n\n- added X");
    }

    #[tokio::test]
    async fn test_examples_become_conversation_turns() {
        let examples = vec![
            Example {
                diff: "+a".to_string(),
                message: "feat: a".to_string(),
            },
            Example {
                diff: "+b".to_string(),
                message: "feat: b".to_string(),
            },
        ];

        let mut backend = MockChatBackend::new();
        backend
            .expect_complete()
            .withf(|req| {
                req.messages.len() == 6
                    && req.messages[2].content == "feat: a"
                    && req.messages[4].content == "feat: b"
            })
            .times(1)
            .returning(|_| Ok(r#"{"message": "feat: c"}"#.to_string()));

        let message = generate_commit_message(
            &backend,
            "m",
            MessageShape::Short,
            "+c",
            &examples,
            1,
        )
        .await
        .unwrap();
        assert_eq!(message, "feat: c");
    }

    #[tokio::test]
    async fn test_undecodable_reply_is_decode_error() {
        let mut backend = MockChatBackend::new();
        backend
            .expect_complete()
            .times(1)
            .returning(|_| Ok("Sure! Here is a commit message: feat: x".to_string()));

        let err = generate_commit_message(&backend, "m", MessageShape::Short, "+x", &[], 1)
            .await
            .unwrap_err();
        assert!(err.is_decode());
    }

    #[tokio::test]
    async fn test_api_error_is_not_decode_error() {
        let mut backend = MockChatBackend::new();
        backend.expect_complete().times(1).returning(|_| {
            Err(LlmError::Api {
                status: 401,
                body: "invalid key".to_string(),
            })
        });

        let err = generate_commit_message(&backend, "m", MessageShape::Short, "+x", &[], 3)
            .await
            .unwrap_err();
        assert!(!err.is_decode());
        assert!(matches!(err, LlmError::Api { status: 401, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_decode_failure_is_retried_when_allowed() {
        let mut backend = MockChatBackend::new();
        let mut seq = mockall::Sequence::new();
        backend
            .expect_complete()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("not json".to_string()));
        backend
            .expect_complete()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(r#"{"message": "fix: y"}"#.to_string()));

        let message = generate_commit_message(&backend, "m", MessageShape::Short, "+y", &[], 2)
            .await
            .unwrap();
        assert_eq!(message, "fix: y");
    }
}
