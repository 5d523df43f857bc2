use crate::prompts;
use anyhow::Result;
use pirjo_core::llm::{ask, ModelProvider};
use std::sync::Arc;
use tracing::info;

pub struct CitationReviewer {
    provider: Arc<dyn ModelProvider>,
}

impl CitationReviewer {
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self { provider }
    }

    /// Ask the model to check inline citations and add an APA reference list.
    pub async fn review(&self, text: &str) -> Result<String> {
        info!("running citation reviewer");
        ask(
            self.provider.as_ref(),
            prompts::REVIEWER_SYSTEM,
            &prompts::reviewer(text),
        )
        .await
    }
}
