//! Structured output shapes the model is asked to produce.
//!
//! Each shape is described to the endpoint as a strict JSON schema and the
//! reply is decoded back into the matching variant of [`GeneratedMessage`].

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::error::LlmError;

/// Which commit message layout to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageShape {
    /// A single conventional-commit summary line.
    #[default]
    Short,
    /// Summary line plus a bullet-point body.
    Detailed,
}

/// A decoded model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratedMessage {
    Short { message: String },
    Detailed { message: String, details: String },
}

#[derive(Deserialize)]
struct ShortReply {
    message: String,
}

#[derive(Deserialize)]
struct DetailedReply {
    message: String,
    details: String,
}

impl MessageShape {
    pub fn from_detailed(detailed: bool) -> Self {
        if detailed { Self::Detailed } else { Self::Short }
    }

    /// Schema name sent in the `response_format`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Short => "commit",
            Self::Detailed => "detailed_commit",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Short => "A conventional commit message",
            Self::Detailed => "A conventional commit message with a detailed body",
        }
    }

    /// Strict JSON schema: every property required, nothing else allowed.
    pub fn json_schema(self) -> Value {
        match self {
            Self::Short => json!({
                "type": "object",
                "properties": {
                    "message": {
                        "type": "string",
                        "description": "Conventional commit message, e.g. 'feat: add login'"
                    }
                },
                "required": ["message"],
                "additionalProperties": false
            }),
            Self::Detailed => json!({
                "type": "object",
                "properties": {
                    "message": {
                        "type": "string",
                        "description": "Conventional commit summary line"
                    },
                    "details": {
                        "type": "string",
                        "description": "Bullet-point list describing the changes"
                    }
                },
                "required": ["message", "details"],
                "additionalProperties": false
            }),
        }
    }

    /// The `response_format` request field for this shape.
    pub fn response_format(self) -> Value {
        json!({
            "type": "json_schema",
            "json_schema": {
                "name": self.name(),
                "description": self.description(),
                "schema": self.json_schema(),
                "strict": true
            }
        })
    }

    /// Decode model content into this shape.
    ///
    /// Content wrapped in a markdown code fence is unwrapped before a
    /// second attempt; the error reported is the one for the raw text.
    pub fn decode(self, content: &str) -> Result<GeneratedMessage, LlmError> {
        match self.decode_json(content.trim()) {
            Ok(message) => Ok(message),
            Err(source) => {
                if let Some(inner) = strip_code_fence(content)
                    && let Ok(message) = self.decode_json(inner)
                {
                    debug!("Decoded {} reply after stripping code fence", self.name());
                    return Ok(message);
                }
                Err(LlmError::Decode {
                    shape: self.name(),
                    raw: content.to_string(),
                    source,
                })
            }
        }
    }

    fn decode_json(self, text: &str) -> Result<GeneratedMessage, serde_json::Error> {
        match self {
            Self::Short => {
                let reply: ShortReply = serde_json::from_str(text)?;
                Ok(GeneratedMessage::Short {
                    message: reply.message,
                })
            }
            Self::Detailed => {
                let reply: DetailedReply = serde_json::from_str(text)?;
                Ok(GeneratedMessage::Detailed {
                    message: reply.message,
                    details: reply.details,
                })
            }
        }
    }
}

/// Inner text of a ```` ``` ```` or ```` ```json ```` fenced block.
fn strip_code_fence(content: &str) -> Option<&str> {
    let trimmed = content.trim();
    let rest = trimmed.strip_prefix("```")?;
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let body = rest.strip_suffix("```")?;
    Some(body.trim())
}

impl GeneratedMessage {
    /// Final commit message text.
    pub fn render(&self) -> String {
        match self {
            Self::Short { message } => message.clone(),
            Self::Detailed { message, details } => format!("{message}\n\n{details}"),
        }
    }
}
