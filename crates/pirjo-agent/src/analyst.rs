use crate::prompts;
use anyhow::Result;
use pirjo_core::chunking::count_tokens;
use pirjo_core::llm::{ask, ModelProvider};
use pirjo_core::Fragment;
use std::sync::Arc;
use tracing::{debug, info};

/// Turns retrieved fragments into cited bullet points.
pub struct SourceAnalyst {
    provider: Arc<dyn ModelProvider>,
    token_budget: usize,
}

impl SourceAnalyst {
    pub fn new(provider: Arc<dyn ModelProvider>, token_budget: usize) -> Self {
        Self {
            provider,
            token_budget,
        }
    }

    pub async fn analyze(
        &self,
        title: &str,
        objective: &str,
        summary: &str,
        fragments: &[Fragment],
    ) -> Result<String> {
        let compiled = compile_fragments(fragments, self.token_budget)?;
        info!(fragments = fragments.len(), "running source analyst");
        let prompt = prompts::analyst(title, objective, summary, &compiled);
        ask(self.provider.as_ref(), prompts::ANALYST_SYSTEM, &prompt).await
    }
}

/// Render fragments as `[key]\ntext\n\n` until the next one would exceed
/// `budget` tokens. Blank fragments are skipped and none is ever split.
pub fn compile_fragments(fragments: &[Fragment], budget: usize) -> Result<String> {
    let mut compiled = String::new();
    let mut used = 0;
    for fragment in fragments {
        if fragment.text.trim().is_empty() {
            continue;
        }
        let rendered = format!("{}\n{}\n\n", fragment.citation(), fragment.text);
        let tokens = count_tokens(&rendered)?;
        if used + tokens > budget {
            debug!(used, budget, "analyst token budget reached");
            break;
        }
        compiled.push_str(&rendered);
        used += tokens;
    }
    Ok(compiled)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(chunk: u32, text: &str) -> Fragment {
        Fragment {
            file: "a.pdf".to_string(),
            page: 1,
            chunk,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_renders_keys_and_skips_blank() {
        let fragments = vec![fragment(1, "uno"), fragment(2, "   "), fragment(3, "tres")];
        let compiled = compile_fragments(&fragments, 1000).unwrap();
        assert_eq!(compiled, "[a.pdf:1:1]\nuno\n\n[a.pdf:1:3]\ntres\n\n");
    }

    #[test]
    fn test_stops_at_first_fragment_over_budget() {
        let first = fragment(1, "uno");
        let budget = count_tokens(&format!("{}\n{}\n\n", first.citation(), first.text)).unwrap();
        let fragments = vec![first, fragment(2, "un texto bastante más largo"), fragment(3, "x")];

        let compiled = compile_fragments(&fragments, budget).unwrap();
        assert_eq!(compiled, "[a.pdf:1:1]\nuno\n\n");
    }

    #[test]
    fn test_zero_budget_is_empty() {
        assert_eq!(compile_fragments(&[fragment(1, "uno")], 0).unwrap(), "");
    }
}
