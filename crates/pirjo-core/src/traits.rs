use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Output size when known without a request. Callers probe with an
    /// embedding of `""` when this is `None`.
    fn dimension(&self) -> Option<usize> {
        None
    }

    /// Backend and model, e.g. `openai/text-embedding-3-small`. Vectors from
    /// different ids are not comparable even when their sizes match.
    fn model_id(&self) -> Option<String> {
        None
    }
}
