//! Agent chain configuration

use serde::{Deserialize, Serialize};

/// Budgets applied by the agent chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Token budget for the fragments quoted in the analyst prompt
    ///
    /// Fragments are added whole until the next one would exceed it.
    #[serde(default = "default_analyst_token_budget")]
    pub analyst_token_budget: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            analyst_token_budget: default_analyst_token_budget(),
        }
    }
}

impl crate::validation::Validate for AgentConfig {
    fn validate(&self) -> crate::error::Result<()> {
        crate::validation::validate_positive(
            "agent.analyst_token_budget",
            self.analyst_token_budget,
            0,
        )
    }
}

fn default_analyst_token_budget() -> usize {
    12_000
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn test_default_is_valid() {
        let config = AgentConfig::default();
        assert_eq!(config.analyst_token_budget, 12_000);
        assert!(config.validate().is_ok());
    }
}
