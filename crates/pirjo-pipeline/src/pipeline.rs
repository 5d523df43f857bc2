use crate::error::PipelineError;
use crate::request::PipelineRequest;
use pirjo_agent::{
    verify_bibliography, write_from_json, AcademicWriter, CitationReviewer, CoherenceManager,
    Methodologist, SourceAnalyst,
};
use pirjo_config::{load_env_file, Config, Credentials};
use pirjo_context::{select_chat_model, select_embedder};
use pirjo_core::llm::ModelProvider;
use pirjo_core::pdf::{extract_sources, file_name, ExtractedSources};
use pirjo_core::PipelineResult;
use pirjo_index::VectorIndexManager;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Tunables read from [`Config`]
#[derive(Debug, Clone, Copy)]
pub struct PipelineSettings {
    pub chunk_tokens: usize,
    pub top_k: usize,
    pub analyst_token_budget: usize,
}

impl From<&Config> for PipelineSettings {
    fn from(config: &Config) -> Self {
        Self {
            chunk_tokens: config.chunking.max_tokens,
            top_k: config.retrieval.top_k,
            analyst_token_budget: config.agent.analyst_token_budget,
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// Counts printed by the `index` command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexReport {
    pub files: usize,
    pub fragments: usize,
    pub indexed_chunks: usize,
    pub dim: usize,
}

pub struct Pipeline {
    provider: Arc<dyn ModelProvider>,
    index: VectorIndexManager,
    settings: PipelineSettings,
}

impl Pipeline {
    pub fn new(
        provider: Arc<dyn ModelProvider>,
        index: VectorIndexManager,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            provider,
            index,
            settings,
        }
    }

    /// Build the chat and embedding providers named by `config`.
    pub fn from_config(config: &Config, credentials: &Credentials) -> Result<Self, PipelineError> {
        let provider =
            select_chat_model(&config.llm, credentials).map_err(PipelineError::stage("proveedores"))?;
        let embedder =
            select_embedder(&config.embedding).map_err(PipelineError::stage("proveedores"))?;
        let index = VectorIndexManager::new(&config.index, embedder);
        Ok(Self::new(provider, index, PipelineSettings::from(config)))
    }

    pub async fn extract(&self, paths: &[PathBuf]) -> Result<ExtractedSources, PipelineError> {
        extract_blocking(paths, self.settings.chunk_tokens).await
    }

    /// Extract and ensure the index without calling the chat model.
    pub async fn index(&self, paths: &[PathBuf]) -> Result<IndexReport, PipelineError> {
        ensure_index(&self.index, paths, self.settings.chunk_tokens).await
    }

    pub async fn generate(&self, request: &PipelineRequest) -> Result<PipelineResult, PipelineError> {
        request.validate()?;
        info!(files = request.paths.len(), title = %request.title, "generating introduction");

        let sources = self.extract(&request.paths).await?;
        let index = self
            .index
            .ensure(&sources.fragments)
            .await
            .map_err(PipelineError::Index)?;
        let chunks = self
            .index
            .search(&index, &request.query(), self.settings.top_k)
            .await
            .map_err(PipelineError::Index)?;
        info!(retrieved = chunks.len(), "retrieved fragments");

        let provider = &self.provider;
        let bullets = SourceAnalyst::new(provider.clone(), self.settings.analyst_token_budget)
            .analyze(&request.title, &request.objective, &request.summary, &chunks)
            .await
            .map_err(PipelineError::stage("analista"))?;
        let blocks = Methodologist::new(provider.clone())
            .build_blocks(&bullets)
            .await
            .map_err(PipelineError::stage("metodólogo"))?;
        let blocks = CoherenceManager::new(provider.clone())
            .review(&request.title, &request.objective, blocks)
            .await
            .map_err(PipelineError::stage("manager"))?;
        let draft = AcademicWriter::new(provider.clone())
            .write(&blocks)
            .await
            .map_err(PipelineError::stage("redactor"))?;
        let reviewed = CitationReviewer::new(provider.clone())
            .review(&draft)
            .await
            .map_err(PipelineError::stage("revisor"))?;
        let introduction = verify_bibliography(&reviewed, &chunks, Some(sources.metadata.as_slice()));

        Ok(PipelineResult {
            introduction,
            blocks,
            files: request.paths.iter().map(|p| file_name(p)).collect(),
        })
    }
}

/// Credential-checked entry point for a full run.
pub async fn generate_introduction(
    config: &Config,
    request: &PipelineRequest,
    env_file: Option<&Path>,
) -> Result<PipelineResult, PipelineError> {
    let credentials = Credentials::resolve(env_file)?;
    request.validate()?;
    Pipeline::from_config(config, &credentials)?
        .generate(request)
        .await
}

/// Index PDFs with the configured embedder. Needs no chat credentials.
pub async fn index_documents(
    config: &Config,
    paths: &[PathBuf],
    env_file: Option<&Path>,
) -> Result<IndexReport, PipelineError> {
    if paths.is_empty() {
        return Err(PipelineError::MissingInput);
    }
    load_env_file(env_file)?;
    let embedder =
        select_embedder(&config.embedding).map_err(PipelineError::stage("proveedores"))?;
    let index = VectorIndexManager::new(&config.index, embedder);
    ensure_index(&index, paths, config.chunking.max_tokens).await
}

/// Run extraction on the blocking pool; PDF parsing is CPU bound.
async fn extract_blocking(
    paths: &[PathBuf],
    chunk_tokens: usize,
) -> Result<ExtractedSources, PipelineError> {
    let paths = paths.to_vec();
    let sources = tokio::task::spawn_blocking(move || extract_sources(&paths, chunk_tokens))
        .await
        .map_err(|e| PipelineError::stage("extracción")(e.into()))??;
    info!(
        fragments = sources.fragments.len(),
        files = sources.metadata.len(),
        "extracted sources"
    );
    Ok(sources)
}

async fn ensure_index(
    index: &VectorIndexManager,
    paths: &[PathBuf],
    chunk_tokens: usize,
) -> Result<IndexReport, PipelineError> {
    let sources = extract_blocking(paths, chunk_tokens).await?;
    let loaded = index
        .ensure(&sources.fragments)
        .await
        .map_err(PipelineError::Index)?;
    Ok(IndexReport {
        files: sources.metadata.len(),
        fragments: sources.fragments.len(),
        indexed_chunks: loaded.len(),
        dim: loaded.store.dim(),
    })
}

/// Merge raw block JSON and write scientific prose from it.
pub async fn draft_from_json(
    config: &Config,
    raw: &Value,
    env_file: Option<&Path>,
) -> Result<String, PipelineError> {
    let credentials = Credentials::resolve(env_file)?;
    let provider =
        select_chat_model(&config.llm, &credentials).map_err(PipelineError::stage("proveedores"))?;
    write_from_json(provider, raw)
        .await
        .map_err(PipelineError::stage("redactor científico"))
}
