//! Vector index storage configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where and how the vector index is persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Directory holding the index files
    #[serde(default = "default_dir")]
    pub dir: PathBuf,

    /// File name of the binary vector blob
    #[serde(default = "default_vector_file")]
    pub vector_file: String,

    /// File name of the JSON metadata sidecar
    #[serde(default = "default_meta_file")]
    pub meta_file: String,

    /// Token budget per indexed chunk
    ///
    /// Changing it invalidates the stored index.
    #[serde(default = "default_chunk_tokens")]
    pub chunk_tokens: usize,

    /// Number of chunks sent per embedding request
    #[serde(default = "default_embed_batch_size")]
    pub embed_batch_size: usize,
}

impl IndexConfig {
    pub fn vector_path(&self) -> PathBuf {
        self.dir.join(&self.vector_file)
    }

    pub fn meta_path(&self) -> PathBuf {
        self.dir.join(&self.meta_file)
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            vector_file: default_vector_file(),
            meta_file: default_meta_file(),
            chunk_tokens: default_chunk_tokens(),
            embed_batch_size: default_embed_batch_size(),
        }
    }
}

impl crate::validation::Validate for IndexConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;
        use crate::validation::{validate_non_empty, validate_positive};

        validate_non_empty("index.vector_file", &self.vector_file)?;
        validate_non_empty("index.meta_file", &self.meta_file)?;
        if self.vector_file == self.meta_file {
            return Err(ConfigError::ValidationError {
                field: "index.meta_file".to_string(),
                message: "meta_file must differ from vector_file".to_string(),
            });
        }
        validate_positive("index.chunk_tokens", self.chunk_tokens, 0)?;
        validate_positive("index.embed_batch_size", self.embed_batch_size, 0)?;

        Ok(())
    }
}

fn default_dir() -> PathBuf {
    PathBuf::from(".pirjo")
}

fn default_vector_file() -> String {
    "index.bin".to_string()
}

fn default_meta_file() -> String {
    "index_meta.json".to_string()
}

fn default_chunk_tokens() -> usize {
    700
}

fn default_embed_batch_size() -> usize {
    64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn test_default_is_valid() {
        assert!(IndexConfig::default().validate().is_ok());
    }

    #[test]
    fn test_paths_join_dir() {
        let config = IndexConfig {
            dir: PathBuf::from("/tmp/idx"),
            ..Default::default()
        };
        assert_eq!(config.vector_path(), PathBuf::from("/tmp/idx/index.bin"));
        assert_eq!(config.meta_path(), PathBuf::from("/tmp/idx/index_meta.json"));
    }

    #[test]
    fn test_same_file_names_invalid() {
        let config = IndexConfig {
            meta_file: "index.bin".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
