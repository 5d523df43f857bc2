use crate::merge::merge_raw_blocks;
use crate::prompts;
use anyhow::Result;
use pirjo_core::llm::{ask, ModelProvider};
use pirjo_core::PirjoBlocks;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Five-paragraph introduction, one paragraph per block in PIRJO order.
pub struct AcademicWriter {
    provider: Arc<dyn ModelProvider>,
}

impl AcademicWriter {
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self { provider }
    }

    pub async fn write(&self, blocks: &PirjoBlocks) -> Result<String> {
        info!("running academic writer");
        ask(
            self.provider.as_ref(),
            prompts::WRITER_SYSTEM,
            &prompts::writer(blocks),
        )
        .await
    }
}

/// Free-form scientific prose from the blocks.
pub struct ScientificWriter {
    provider: Arc<dyn ModelProvider>,
}

impl ScientificWriter {
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self { provider }
    }

    pub async fn write(&self, blocks: &PirjoBlocks) -> Result<String> {
        info!("running scientific writer");
        ask(
            self.provider.as_ref(),
            prompts::SCIENTIFIC_SYSTEM,
            &prompts::scientific(blocks),
        )
        .await
    }
}

/// Merge loosely keyed model output into blocks, then write scientific prose.
pub async fn write_from_json(provider: Arc<dyn ModelProvider>, raw: &Value) -> Result<String> {
    let blocks = merge_raw_blocks(raw);
    ScientificWriter::new(provider).write(&blocks).await
}
