//! Configuration merging logic
//!
//! Values in the overlay win only when they differ from the defaults.

use crate::{types::*, Config};

/// Merge two configurations, with `overlay` taking precedence
pub fn merge(mut base: Config, overlay: Config) -> Config {
    base.chunking = merge_chunking(base.chunking, overlay.chunking);
    base.index = merge_index(base.index, overlay.index);
    base.embedding = merge_embedding(base.embedding, overlay.embedding);
    base.llm = merge_llm(base.llm, overlay.llm);
    base.retrieval = merge_retrieval(base.retrieval, overlay.retrieval);
    base.agent = merge_agent(base.agent, overlay.agent);

    base
}

/// Pick `overlay` unless it still holds the default value
fn pick<T: PartialEq>(base: T, overlay: T, default: T) -> T {
    if overlay != default {
        overlay
    } else {
        base
    }
}

fn merge_chunking(base: ChunkingConfig, overlay: ChunkingConfig) -> ChunkingConfig {
    let default = ChunkingConfig::default();
    ChunkingConfig {
        max_tokens: pick(base.max_tokens, overlay.max_tokens, default.max_tokens),
    }
}

fn merge_index(base: IndexConfig, overlay: IndexConfig) -> IndexConfig {
    let default = IndexConfig::default();
    IndexConfig {
        dir: pick(base.dir, overlay.dir, default.dir),
        vector_file: pick(base.vector_file, overlay.vector_file, default.vector_file),
        meta_file: pick(base.meta_file, overlay.meta_file, default.meta_file),
        chunk_tokens: pick(base.chunk_tokens, overlay.chunk_tokens, default.chunk_tokens),
        embed_batch_size: pick(
            base.embed_batch_size,
            overlay.embed_batch_size,
            default.embed_batch_size,
        ),
    }
}

fn merge_embedding(base: EmbeddingConfig, overlay: EmbeddingConfig) -> EmbeddingConfig {
    let default = EmbeddingConfig::default();
    EmbeddingConfig {
        backend: pick(base.backend, overlay.backend, default.backend),
        model_name: overlay.model_name.or(base.model_name),
        timeout_secs: pick(base.timeout_secs, overlay.timeout_secs, default.timeout_secs),
    }
}

fn merge_llm(base: LlmConfig, overlay: LlmConfig) -> LlmConfig {
    let default = LlmConfig::default();
    LlmConfig {
        model: pick(base.model, overlay.model, default.model),
        fallback_model: pick(base.fallback_model, overlay.fallback_model, default.fallback_model),
        api_base: overlay.api_base.or(base.api_base),
        fallback_api_base: pick(
            base.fallback_api_base,
            overlay.fallback_api_base,
            default.fallback_api_base,
        ),
        max_tokens: overlay.max_tokens.or(base.max_tokens),
        timeout_secs: pick(base.timeout_secs, overlay.timeout_secs, default.timeout_secs),
    }
}

fn merge_retrieval(base: RetrievalConfig, overlay: RetrievalConfig) -> RetrievalConfig {
    let default = RetrievalConfig::default();
    RetrievalConfig {
        top_k: pick(base.top_k, overlay.top_k, default.top_k),
    }
}

fn merge_agent(base: AgentConfig, overlay: AgentConfig) -> AgentConfig {
    let default = AgentConfig::default();
    AgentConfig {
        analyst_token_budget: pick(
            base.analyst_token_budget,
            overlay.analyst_token_budget,
            default.analyst_token_budget,
        ),
    }
}
