//! Configuration type definitions
//!
//! Each section is self-contained with validation and sensible defaults.

pub mod agent;
pub mod chunking;
pub mod embedding;
pub mod index;
pub mod llm;
pub mod retrieval;

pub use agent::AgentConfig;
pub use chunking::ChunkingConfig;
pub use embedding::{EmbeddingBackend, EmbeddingConfig};
pub use index::IndexConfig;
pub use llm::LlmConfig;
pub use retrieval::RetrievalConfig;

use serde::{Deserialize, Serialize};

/// Main configuration struct aggregating all settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// PDF page chunking
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// On-disk vector index
    #[serde(default)]
    pub index: IndexConfig,

    /// Embedding provider settings
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Chat model settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// Retrieval stage
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Agent chain budgets
    #[serde(default)]
    pub agent: AgentConfig,
}

impl crate::validation::Validate for Config {
    fn validate(&self) -> crate::error::Result<()> {
        self.chunking.validate()?;
        self.index.validate()?;
        self.embedding.validate()?;
        self.llm.validate()?;
        self.retrieval.validate()?;
        self.agent.validate()?;

        Ok(())
    }
}
