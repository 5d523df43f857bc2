use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[async_trait]
pub trait ModelProvider: Send + Sync {
    async fn chat(&self, messages: &[Message]) -> Result<String>;
}

/// Send one system role and one user prompt, returning the trimmed reply.
pub async fn ask(provider: &dyn ModelProvider, system: &str, prompt: &str) -> Result<String> {
    let mut messages = Vec::with_capacity(2);
    if !system.is_empty() {
        messages.push(Message::system(system));
    }
    messages.push(Message::user(prompt));

    let reply = provider.chat(&messages).await?;
    Ok(reply.trim().to_string())
}

pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Client for any OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct OpenAIProvider {
    pub model: String,
    pub api_key: String,
    pub client: reqwest::Client,
    pub api_base: String,
    pub max_tokens: Option<u32>,
}

impl OpenAIProvider {
    pub fn new(model: String, api_key: String, timeout_secs: u64) -> Result<Self> {
        Self::with_base(model, api_key, OPENAI_API_BASE.to_string(), timeout_secs)
    }

    pub fn with_base(
        model: String,
        api_key: String,
        api_base: String,
        timeout_secs: u64,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            model,
            api_key,
            client,
            api_base,
            max_tokens: None,
        })
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[async_trait]
impl ModelProvider for OpenAIProvider {
    async fn chat(&self, messages: &[Message]) -> Result<String> {
        let url = format!("{}/chat/completions", self.api_base.trim_end_matches('/'));
        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages
        });
        if let Some(mt) = self.max_tokens {
            body["max_tokens"] = serde_json::json!(mt);
        }

        let res = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(anyhow!("Chat API error ({}): {} - {}", self.model, status, text));
        }

        let json: serde_json::Value = res.json().await?;

        if let Some(error) = json.get("error") {
            return Err(anyhow!("Chat API returned error: {}", error));
        }

        json["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow!("Invalid response format: missing content in choices"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recorder {
        seen: Mutex<Vec<Message>>,
    }

    #[async_trait]
    impl ModelProvider for Recorder {
        async fn chat(&self, messages: &[Message]) -> Result<String> {
            self.seen.lock().unwrap().extend_from_slice(messages);
            Ok("  respuesta \n".to_string())
        }
    }

    #[tokio::test]
    async fn test_ask_sends_system_then_user_and_trims() {
        let recorder = Recorder {
            seen: Mutex::new(Vec::new()),
        };
        let reply = ask(&recorder, "Agente", "hola").await.unwrap();
        assert_eq!(reply, "respuesta");

        let seen = recorder.seen.lock().unwrap();
        assert_eq!(*seen, vec![Message::system("Agente"), Message::user("hola")]);
    }

    #[tokio::test]
    async fn test_ask_without_system_role() {
        let recorder = Recorder {
            seen: Mutex::new(Vec::new()),
        };
        ask(&recorder, "", "hola").await.unwrap();
        assert_eq!(recorder.seen.lock().unwrap().len(), 1);
    }
}
