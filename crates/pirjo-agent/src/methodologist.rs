use crate::parse::{flatten_value, JsonReply};
use crate::prompts;
use anyhow::Result;
use pirjo_core::llm::{ask, ModelProvider};
use pirjo_core::{BlockKey, PirjoBlocks};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Builds the five PIRJO blocks from the analyst's bullets, one request per
/// block.
pub struct Methodologist {
    provider: Arc<dyn ModelProvider>,
}

impl Methodologist {
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self { provider }
    }

    pub async fn build_blocks(&self, bullets: &str) -> Result<PirjoBlocks> {
        let mut blocks = PirjoBlocks::default();
        for key in BlockKey::ALL {
            info!(block = %key, "running methodologist");
            let system = prompts::methodologist_system(key);
            let reply = ask(
                self.provider.as_ref(),
                &system,
                &prompts::methodologist(key, bullets),
            )
            .await?;
            blocks.set(key, block_text(key, &reply));
        }
        Ok(blocks)
    }
}

fn block_text(key: BlockKey, reply: &str) -> String {
    match JsonReply::parse(reply).field(key.letter()) {
        Some(Value::String(s)) => s.clone(),
        Some(value) => flatten_value(value),
        None => {
            debug!(block = %key, "reply has no JSON value for block, using raw text");
            reply.to_string()
        }
    }
}
