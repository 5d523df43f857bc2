use anyhow::{anyhow, Result};
use async_trait::async_trait;
use pirjo_config::{EmbeddingBackend, EmbeddingConfig};
use pirjo_core::llm::OPENAI_API_BASE;
use pirjo_core::traits::Embedder;
use reqwest::Client;
use serde::Deserialize;
use std::env;
use std::sync::Arc;
use std::time::Duration;

/// Select an embedder from configuration and the `OPENAI_API_KEY` variable.
pub fn select_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>> {
    let api_key = env::var("OPENAI_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty());
    embedder_for(config, api_key)
}

/// Build the configured backend. An OpenAI backend without a key falls back
/// to Ollama with Ollama's default model.
pub fn embedder_for(config: &EmbeddingConfig, openai_key: Option<String>) -> Result<Arc<dyn Embedder>> {
    match (config.backend, openai_key) {
        (EmbeddingBackend::External, Some(api_key)) => {
            let model = config.model_for(EmbeddingBackend::External);
            tracing::info!(model = %model, "using OpenAI embeddings");
            Ok(Arc::new(ExternalEmbedder::new(model, api_key, config.timeout_secs)?))
        }
        (EmbeddingBackend::External, None) => {
            tracing::warn!("embedding.backend is 'openai' but OPENAI_API_KEY is not set; falling back to Ollama");
            let model = EmbeddingBackend::Ollama.default_model().to_string();
            Ok(Arc::new(OllamaEmbedder::new(model, config.timeout_secs)?))
        }
        (EmbeddingBackend::Ollama, _) => {
            let model = config.model_for(EmbeddingBackend::Ollama);
            tracing::info!(model = %model, "using Ollama embeddings");
            Ok(Arc::new(OllamaEmbedder::new(model, config.timeout_secs)?))
        }
        (EmbeddingBackend::Local, _) => local_embedder(&config.model_for(EmbeddingBackend::Local)),
    }
}

/// Output sizes of well-known models
fn known_dimension(model: &str) -> Option<usize> {
    match model {
        "text-embedding-3-small" | "text-embedding-ada-002" => Some(1536),
        "text-embedding-3-large" => Some(3072),
        "nomic-embed-text" | "BGEBaseENV15" => Some(768),
        "mxbai-embed-large" => Some(1024),
        "all-minilm" | "all-MiniLM-L6-v2" | "AllMiniLML6V2" | "BGESmallENV15" => Some(384),
        _ => None,
    }
}

fn http_client(timeout_secs: u64) -> Result<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

struct ExternalEmbedder {
    model: String,
    api_key: String,
    client: Client,
}

impl ExternalEmbedder {
    fn new(model: String, api_key: String, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            model,
            api_key,
            client: http_client(timeout_secs)?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OpenAIEmbeddingResponse {
    data: Vec<OpenAIEmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct OpenAIEmbeddingItem {
    embedding: Vec<f32>,
}

#[async_trait]
impl Embedder for ExternalEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut list = self.embed_batch(&[text.to_string()]).await?;
        list.pop().ok_or_else(|| anyhow!("Empty embedding response"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let resp = self
            .client
            .post(format!("{}/embeddings", OPENAI_API_BASE))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "model": self.model,
                "input": texts,
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("OpenAI embeddings failed ({}): {}", status, body));
        }

        let parsed: OpenAIEmbeddingResponse = resp.json().await?;
        if parsed.data.len() != texts.len() {
            return Err(anyhow!(
                "Mismatch embedding count: got {}, expected {}",
                parsed.data.len(),
                texts.len()
            ));
        }
        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }

    fn dimension(&self) -> Option<usize> {
        known_dimension(&self.model)
    }

    fn model_id(&self) -> Option<String> {
        Some(format!("openai/{}", self.model))
    }
}

struct OllamaEmbedder {
    model: String,
    base_url: String,
    client: Client,
}

impl OllamaEmbedder {
    fn new(model: String, timeout_secs: u64) -> Result<Self> {
        let base_url =
            env::var("OLLAMA_BASE_URL").unwrap_or_else(|_| "http://localhost:11434".to_string());
        Ok(Self {
            model,
            base_url,
            client: http_client(timeout_secs)?,
        })
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let resp = self
            .client
            .post(format!(
                "{}/api/embeddings",
                self.base_url.trim_end_matches('/')
            ))
            .json(&serde_json::json!({
                "model": self.model,
                "prompt": text,
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("Ollama embeddings failed ({}): {}", status, body));
        }

        let json: serde_json::Value = resp.json().await?;
        let embedding = json["embedding"]
            .as_array()
            .ok_or_else(|| anyhow!("No embedding field in Ollama response"))?
            .iter()
            .filter_map(|v| v.as_f64())
            .map(|f| f as f32)
            .collect::<Vec<f32>>();
        Ok(embedding)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }

    fn dimension(&self) -> Option<usize> {
        known_dimension(&self.model)
    }

    fn model_id(&self) -> Option<String> {
        Some(format!("ollama/{}", self.model))
    }
}

#[cfg(feature = "local-embeddings")]
fn local_embedder(model_name: &str) -> Result<Arc<dyn Embedder>> {
    Ok(Arc::new(local::LocalEmbedder::shared(model_name)?))
}

#[cfg(not(feature = "local-embeddings"))]
fn local_embedder(_model_name: &str) -> Result<Arc<dyn Embedder>> {
    Err(anyhow!(
        "embedding.backend 'local' requires building with the `local-embeddings` feature"
    ))
}

#[cfg(feature = "local-embeddings")]
mod local {
    use super::known_dimension;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
    use pirjo_core::lazy::SharedModel;
    use pirjo_core::traits::Embedder;

    // One local model per process; the first requested name wins.
    static MODEL: SharedModel<(String, TextEmbedding)> = SharedModel::new("fastembed");

    pub(super) struct LocalEmbedder {
        name: &'static str,
        model: &'static TextEmbedding,
    }

    impl LocalEmbedder {
        pub(super) fn shared(model_name: &str) -> Result<Self> {
            let (name, model) = MODEL.get_or_try_init(|| {
                let choice = match model_name {
                    "BGESmallENV15" => EmbeddingModel::BGESmallENV15,
                    "BGEBaseENV15" => EmbeddingModel::BGEBaseENV15,
                    _ => EmbeddingModel::AllMiniLML6V2,
                };

                let cache_dir = std::env::var("FASTEMBED_CACHE_PATH")
                    .ok()
                    .or_else(|| {
                        std::env::var("HOME")
                            .ok()
                            .map(|home| format!("{}/.cache/fastembed", home))
                    })
                    .unwrap_or_else(|| ".fastembed_cache".to_string());

                let model = TextEmbedding::try_new(
                    InitOptions::new(choice)
                        .with_cache_dir(std::path::PathBuf::from(cache_dir))
                        .with_show_download_progress(true),
                )
                .map_err(|e| anyhow!("Failed to initialize local embedding model: {}", e))?;
                Ok((model_name.to_string(), model))
            })?;

            if name != model_name {
                tracing::warn!(loaded = %name, requested = %model_name, "reusing already loaded local model");
            }
            Ok(Self {
                name: name.as_str(),
                model,
            })
        }
    }

    #[async_trait]
    impl Embedder for LocalEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let mut list = self.embed_batch(&[text.to_string()]).await?;
            list.pop().ok_or_else(|| anyhow!("Empty embedding response"))
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            let model = self.model;
            let texts = texts.to_vec();
            tokio::task::spawn_blocking(move || model.embed(texts, None))
                .await?
                .map_err(|e| anyhow!("Failed to generate embeddings: {}", e))
        }

        fn dimension(&self) -> Option<usize> {
            known_dimension(self.name)
        }

        fn model_id(&self) -> Option<String> {
            Some(format!("local/{}", self.name))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_backend_with_key() {
        let embedder = embedder_for(&EmbeddingConfig::default(), Some("sk-test".into())).unwrap();
        assert_eq!(embedder.dimension(), Some(1536));
        assert_eq!(embedder.model_id().as_deref(), Some("openai/text-embedding-3-small"));
    }

    #[test]
    fn test_openai_backend_without_key_falls_back_to_ollama() {
        let embedder = embedder_for(&EmbeddingConfig::default(), None).unwrap();
        assert_eq!(embedder.dimension(), Some(768));
        assert_eq!(embedder.model_id().as_deref(), Some("ollama/nomic-embed-text"));
    }

    #[test]
    fn test_unknown_model_has_no_dimension() {
        let config = EmbeddingConfig {
            backend: EmbeddingBackend::Ollama,
            model_name: Some("custom-embedder".to_string()),
            ..Default::default()
        };
        let embedder = embedder_for(&config, None).unwrap();
        assert_eq!(embedder.dimension(), None);
    }

    #[cfg(not(feature = "local-embeddings"))]
    #[test]
    fn test_local_backend_requires_feature() {
        let config = EmbeddingConfig {
            backend: EmbeddingBackend::Local,
            ..Default::default()
        };
        assert!(embedder_for(&config, None).is_err());
    }
}
