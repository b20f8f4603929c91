//! Runtime configuration resolved once from flags and environment.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::LlmError;
use crate::llm::MessageShape;
use crate::llm::retry::DEFAULT_MAX_ATTEMPTS;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Settings shared by every operation.
#[derive(Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub shape: MessageShape,
    pub max_attempts: u32,
    /// Per-request limit. Unset means wait as long as the endpoint takes.
    pub request_timeout: Option<Duration>,
    /// Location of the persisted example store.
    pub store_path: PathBuf,
}

impl Config {
    /// Defaults for everything except the store location.
    pub fn new(store_path: PathBuf) -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            shape: MessageShape::Short,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            request_timeout: None,
            store_path,
        }
    }

    /// The API key, or [`LlmError::MissingApiKey`] if none was given.
    pub fn require_api_key(&self) -> Result<&str, LlmError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(LlmError::MissingApiKey)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("shape", &self.shape)
            .field("max_attempts", &self.max_attempts)
            .field("request_timeout", &self.request_timeout)
            .field("store_path", &self.store_path)
            .finish()
    }
}
