//! Environment variable configuration overlay
//!
//! Supports environment variables in the format `PIRJO_<section>_<field>=value`.
//!
//! Examples:
//! - `PIRJO_EMBEDDING_BACKEND=ollama`
//! - `PIRJO_RETRIEVAL_TOP_K=8`
//! - `PIRJO_INDEX_DIR=/var/cache/pirjo`

use crate::{error::ConfigError, types::*, Config, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

const PREFIX: &str = "PIRJO_";

/// Parse configuration from environment variables
///
/// Returns `None` when no `PIRJO_` variable is set.
pub fn from_env() -> Result<Option<Config>> {
    let env_vars: Vec<(String, String)> = env::vars()
        .filter(|(k, _)| k.starts_with(PREFIX))
        .collect();

    if env_vars.is_empty() {
        return Ok(None);
    }

    let mut config = Config::default();
    for (key, value) in env_vars {
        if let Err(e) = apply_env_var(&mut config, &key, &value) {
            eprintln!("Warning: failed to parse {}: {}", key, e);
        }
    }

    Ok(Some(config))
}

/// Apply a single environment variable to config
fn apply_env_var(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let stripped = key.strip_prefix(PREFIX).unwrap_or(key);

    let Some((section, field)) = stripped.split_once('_') else {
        return Err(ConfigError::EnvVarError {
            var: key.to_string(),
            message: "Expected format: PIRJO_<section>_<field>".to_string(),
        });
    };

    let section = section.to_lowercase();
    let field = field.to_lowercase();

    match section.as_str() {
        "chunking" => apply_chunking_var(&mut config.chunking, key, &field, value),
        "index" => apply_index_var(&mut config.index, key, &field, value),
        "embedding" => apply_embedding_var(&mut config.embedding, key, &field, value),
        "llm" => apply_llm_var(&mut config.llm, key, &field, value),
        "retrieval" => apply_retrieval_var(&mut config.retrieval, key, &field, value),
        "agent" => apply_agent_var(&mut config.agent, key, &field, value),
        _ => Err(ConfigError::EnvVarError {
            var: key.to_string(),
            message: format!("Unknown section: {}", section),
        }),
    }
}

fn parse_number<T: FromStr>(var: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| ConfigError::EnvVarError {
        var: var.to_string(),
        message: format!("Invalid number: {}", value),
    })
}

fn unknown_field(var: &str, field: &str) -> ConfigError {
    ConfigError::EnvVarError {
        var: var.to_string(),
        message: format!("Unknown field: {}", field),
    }
}

fn apply_chunking_var(config: &mut ChunkingConfig, var: &str, field: &str, value: &str) -> Result<()> {
    match field {
        "max_tokens" => config.max_tokens = parse_number(var, value)?,
        _ => return Err(unknown_field(var, field)),
    }
    Ok(())
}

fn apply_index_var(config: &mut IndexConfig, var: &str, field: &str, value: &str) -> Result<()> {
    match field {
        "dir" => config.dir = PathBuf::from(value),
        "vector_file" => config.vector_file = value.to_string(),
        "meta_file" => config.meta_file = value.to_string(),
        "chunk_tokens" => config.chunk_tokens = parse_number(var, value)?,
        "embed_batch_size" => config.embed_batch_size = parse_number(var, value)?,
        _ => return Err(unknown_field(var, field)),
    }
    Ok(())
}

fn apply_embedding_var(config: &mut EmbeddingConfig, var: &str, field: &str, value: &str) -> Result<()> {
    match field {
        "backend" => {
            config.backend = match value.to_lowercase().as_str() {
                "openai" | "external" => EmbeddingBackend::External,
                "ollama" => EmbeddingBackend::Ollama,
                "local" => EmbeddingBackend::Local,
                _ => {
                    return Err(ConfigError::invalid_enum(
                        "embedding.backend",
                        value,
                        &["openai", "ollama", "local"],
                    ))
                }
            };
        }
        "model_name" => config.model_name = Some(value.to_string()),
        "timeout_secs" => config.timeout_secs = parse_number(var, value)?,
        _ => return Err(unknown_field(var, field)),
    }
    Ok(())
}

fn apply_llm_var(config: &mut LlmConfig, var: &str, field: &str, value: &str) -> Result<()> {
    match field {
        "model" => config.model = value.to_string(),
        "fallback_model" => config.fallback_model = value.to_string(),
        "api_base" => config.api_base = Some(value.to_string()),
        "fallback_api_base" => config.fallback_api_base = value.to_string(),
        "max_tokens" => config.max_tokens = Some(parse_number(var, value)?),
        "timeout_secs" => config.timeout_secs = parse_number(var, value)?,
        _ => return Err(unknown_field(var, field)),
    }
    Ok(())
}

fn apply_retrieval_var(config: &mut RetrievalConfig, var: &str, field: &str, value: &str) -> Result<()> {
    match field {
        "top_k" => config.top_k = parse_number(var, value)?,
        _ => return Err(unknown_field(var, field)),
    }
    Ok(())
}

fn apply_agent_var(config: &mut AgentConfig, var: &str, field: &str, value: &str) -> Result<()> {
    match field {
        "analyst_token_budget" => config.analyst_token_budget = parse_number(var, value)?,
        _ => return Err(unknown_field(var, field)),
    }
    Ok(())
}
