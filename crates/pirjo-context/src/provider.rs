use anyhow::Result;
use pirjo_config::{ApiProvider, Credentials, LlmConfig};
use pirjo_core::llm::{ModelProvider, OpenAIProvider, OPENAI_API_BASE};
use std::sync::Arc;

/// Model name and endpoint chosen for a credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSettings {
    pub model: String,
    pub api_base: String,
}

pub fn chat_settings(config: &LlmConfig, credentials: &Credentials) -> ChatSettings {
    match credentials.provider() {
        ApiProvider::OpenAi => ChatSettings {
            model: config.model.clone(),
            api_base: config
                .api_base
                .clone()
                .unwrap_or_else(|| OPENAI_API_BASE.to_string()),
        },
        ApiProvider::DeepSeek => ChatSettings {
            model: config.fallback_model.clone(),
            api_base: config.fallback_api_base.clone(),
        },
    }
}

/// Chat client for the agent chain: the primary provider when its key is
/// present, otherwise the OpenAI-compatible fallback.
pub fn select_chat_model(
    config: &LlmConfig,
    credentials: &Credentials,
) -> Result<Arc<dyn ModelProvider>> {
    let settings = chat_settings(config, credentials);
    tracing::info!(model = %settings.model, api_base = %settings.api_base, "chat model selected");

    let provider = OpenAIProvider::with_base(
        settings.model,
        credentials.api_key().to_string(),
        settings.api_base,
        config.timeout_secs,
    )?
    .with_max_tokens(config.max_tokens);

    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(var: &'static str) -> Credentials {
        Credentials::from_lookup(|name| (name == var).then(|| "sk-test".to_string())).unwrap()
    }

    #[test]
    fn test_openai_key_uses_primary_model() {
        let settings = chat_settings(&LlmConfig::default(), &creds("OPENAI_API_KEY"));
        assert_eq!(
            settings,
            ChatSettings {
                model: "gpt-3.5-turbo".to_string(),
                api_base: "https://api.openai.com/v1".to_string(),
            }
        );
    }

    #[test]
    fn test_deepseek_key_uses_fallback() {
        let settings = chat_settings(&LlmConfig::default(), &creds("DEEPSEEK_API_KEY"));
        assert_eq!(settings.model, "deepseek-chat");
        assert_eq!(settings.api_base, "https://api.deepseek.com/v1");
    }

    #[test]
    fn test_api_base_override() {
        let config = LlmConfig {
            api_base: Some("http://localhost:8080/v1".to_string()),
            ..Default::default()
        };
        let settings = chat_settings(&config, &creds("OPENAI_API_KEY"));
        assert_eq!(settings.api_base, "http://localhost:8080/v1");
    }

    #[test]
    fn test_select_builds_client() {
        assert!(select_chat_model(&LlmConfig::default(), &creds("DEEPSEEK_API_KEY")).is_ok());
    }
}
