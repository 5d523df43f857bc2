//! PDF text chunking configuration

use serde::{Deserialize, Serialize};

/// Configuration for splitting extracted page text into fragments
///
/// Chunks never overlap: each token of a page belongs to exactly one fragment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum `cl100k_base` tokens per fragment
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
        }
    }
}

impl crate::validation::Validate for ChunkingConfig {
    fn validate(&self) -> crate::error::Result<()> {
        crate::validation::validate_positive("chunking.max_tokens", self.max_tokens, 0)
    }
}

fn default_max_tokens() -> usize {
    700
}
