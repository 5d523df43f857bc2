use crate::parse::JsonReply;
use crate::prompts;
use anyhow::Result;
use pirjo_core::llm::{ask, ModelProvider};
use pirjo_core::PirjoBlocks;
use std::sync::Arc;
use tracing::{debug, info};

/// Aligns the blocks with the title and objective. Returns its input
/// unchanged when the reply is not a complete block object.
pub struct CoherenceManager {
    provider: Arc<dyn ModelProvider>,
}

impl CoherenceManager {
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self { provider }
    }

    pub async fn review(
        &self,
        title: &str,
        objective: &str,
        blocks: PirjoBlocks,
    ) -> Result<PirjoBlocks> {
        info!("running coherence manager");
        let prompt = prompts::manager(title, objective, &blocks);
        let reply = ask(self.provider.as_ref(), prompts::MANAGER_SYSTEM, &prompt).await?;

        let revised = match JsonReply::parse(&reply) {
            JsonReply::Parsed(value) => serde_json::from_value::<PirjoBlocks>(value).ok(),
            JsonReply::Fallback(_) => None,
        };
        Ok(revised.unwrap_or_else(|| {
            debug!("manager reply unusable, keeping blocks");
            blocks
        }))
    }
}
