//! Chat model configuration

use serde::{Deserialize, Serialize};

/// LLM configuration for the agent chain
///
/// The primary model is used with `OPENAI_API_KEY`; the fallback model and
/// endpoint are used when only `DEEPSEEK_API_KEY` is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Primary model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Model used with the fallback provider
    #[serde(default = "default_fallback_model")]
    pub fallback_model: String,

    /// Optional API base URL override for the primary provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    /// API base URL of the fallback provider
    #[serde(default = "default_fallback_api_base")]
    pub fallback_api_base: String,

    /// Maximum tokens for each reply (provider default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Request timeout; a timed out call fails the run
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            fallback_model: default_fallback_model(),
            api_base: None,
            fallback_api_base: default_fallback_api_base(),
            max_tokens: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl crate::validation::Validate for LlmConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;
        use crate::validation::{validate_non_empty, validate_positive, validate_url};

        validate_non_empty("llm.model", &self.model)?;
        validate_non_empty("llm.fallback_model", &self.fallback_model)?;

        if let Some(api_base) = &self.api_base {
            validate_url("llm.api_base", api_base)?;
        }
        validate_url("llm.fallback_api_base", &self.fallback_api_base)?;

        if self.max_tokens == Some(0) {
            return Err(ConfigError::ValidationError {
                field: "llm.max_tokens".to_string(),
                message: "max_tokens must be > 0".to_string(),
            });
        }
        validate_positive("llm.timeout_secs", self.timeout_secs as usize, 0)?;

        Ok(())
    }
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_fallback_model() -> String {
    "deepseek-chat".to_string()
}

fn default_fallback_api_base() -> String {
    "https://api.deepseek.com/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}
