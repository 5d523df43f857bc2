//! Retrieval stage configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Fragments fetched from the index per request
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

impl crate::validation::Validate for RetrievalConfig {
    fn validate(&self) -> crate::error::Result<()> {
        crate::validation::validate_positive("retrieval.top_k", self.top_k, 0)
    }
}

fn default_top_k() -> usize {
    5
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn test_default_is_valid() {
        assert!(RetrievalConfig::default().validate().is_ok());
        assert!(RetrievalConfig { top_k: 0 }.validate().is_err());
    }
}
