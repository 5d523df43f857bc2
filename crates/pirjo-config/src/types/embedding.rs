//! Embedding provider configuration

use serde::{Deserialize, Serialize};

/// Embedding provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Embedding backend to use
    #[serde(default)]
    pub backend: EmbeddingBackend,

    /// Model name override for the selected backend
    ///
    /// Defaults:
    /// - OpenAI: "text-embedding-3-small"
    /// - Ollama: "nomic-embed-text"
    /// - Local: "all-MiniLM-L6-v2"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,

    /// HTTP timeout for remote backends
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Embedding backend options
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// OpenAI API (requires OPENAI_API_KEY)
    #[default]
    #[serde(rename = "openai")]
    External,

    /// Local Ollama server
    Ollama,

    /// In-process fastembed model (needs the `local-embeddings` feature)
    Local,
}

impl EmbeddingBackend {
    pub fn default_model(self) -> &'static str {
        match self {
            EmbeddingBackend::External => "text-embedding-3-small",
            EmbeddingBackend::Ollama => "nomic-embed-text",
            EmbeddingBackend::Local => "all-MiniLM-L6-v2",
        }
    }
}

impl EmbeddingConfig {
    /// Configured model name, or the backend default
    pub fn model_for(&self, backend: EmbeddingBackend) -> String {
        self.model_name
            .clone()
            .unwrap_or_else(|| backend.default_model().to_string())
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::default(),
            model_name: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl crate::validation::Validate for EmbeddingConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::validation::{validate_non_empty, validate_positive};

        if let Some(model) = &self.model_name {
            validate_non_empty("embedding.model_name", model)?;
        }
        validate_positive("embedding.timeout_secs", self.timeout_secs as usize, 0)?;

        Ok(())
    }
}

fn default_timeout_secs() -> u64 {
    60
}
