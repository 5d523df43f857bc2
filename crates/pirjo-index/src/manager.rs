use crate::hash::sources_hash;
use crate::lock::path_lock;
use crate::sidecar::IndexMetadata;
use crate::store::FlatL2Store;
use anyhow::{ensure, Context, Result};
use pirjo_config::IndexConfig;
use pirjo_core::chunking::TokenChunker;
use pirjo_core::traits::Embedder;
use pirjo_core::Fragment;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// Vectors plus the records they were computed from, position for position.
#[derive(Debug, Clone)]
pub struct LoadedIndex {
    pub store: FlatL2Store,
    pub chunks: Vec<Fragment>,
}

impl LoadedIndex {
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// What was found on disk, before deciding whether it can be reused.
#[derive(Debug, Clone)]
pub struct StoredIndex {
    pub store: FlatL2Store,
    pub metadata: IndexMetadata,
}

impl StoredIndex {
    fn into_loaded(self) -> LoadedIndex {
        LoadedIndex {
            store: self.store,
            chunks: self.metadata.chunks,
        }
    }
}

enum Reuse {
    AsIs,
    UpgradeSidecar,
    Rebuild(&'static str),
}

pub struct VectorIndexManager {
    vector_path: PathBuf,
    meta_path: PathBuf,
    chunk_tokens: usize,
    batch_size: usize,
    embedder: Arc<dyn Embedder>,
    dim: OnceCell<usize>,
}

impl VectorIndexManager {
    pub fn new(config: &IndexConfig, embedder: Arc<dyn Embedder>) -> Self {
        Self::with_paths(
            config.vector_path(),
            config.meta_path(),
            config.chunk_tokens,
            embedder,
        )
        .with_batch_size(config.embed_batch_size)
    }

    pub fn with_paths(
        vector_path: impl Into<PathBuf>,
        meta_path: impl Into<PathBuf>,
        chunk_tokens: usize,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        Self {
            vector_path: vector_path.into(),
            meta_path: meta_path.into(),
            chunk_tokens: chunk_tokens.max(1),
            batch_size: 64,
            embedder,
            dim: OnceCell::new(),
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn vector_path(&self) -> &Path {
        &self.vector_path
    }

    pub fn meta_path(&self) -> &Path {
        &self.meta_path
    }

    /// Output dimension of the embedder, probed once with an empty string
    /// when the embedder does not report it.
    pub async fn dimension(&self) -> Result<usize> {
        self.dim
            .get_or_try_init(|| async {
                if let Some(dim) = self.embedder.dimension() {
                    return Ok(dim);
                }
                let probe = self
                    .embedder
                    .embed("")
                    .await
                    .context("failed to probe embedding dimension")?;
                debug!(dim = probe.len(), "probed embedding dimension");
                Ok::<usize, anyhow::Error>(probe.len())
            })
            .await
            .copied()
    }

    /// Re-chunk the sources and embed every chunk in batches. Chunk numbers
    /// restart at 1 for each (file, page).
    pub async fn build(&self, sources: &[Fragment]) -> Result<LoadedIndex> {
        let mut counters: HashMap<(&str, u32), u32> = HashMap::new();
        let mut chunks = Vec::new();
        for source in sources {
            for text in TokenChunker::new(&source.text, self.chunk_tokens)?.chunks() {
                let counter = counters.entry((source.file.as_str(), source.page)).or_insert(0);
                *counter += 1;
                chunks.push(Fragment {
                    file: source.file.clone(),
                    page: source.page,
                    chunk: *counter,
                    text,
                });
            }
        }

        if chunks.is_empty() {
            info!("no text to index");
            return Ok(LoadedIndex {
                store: FlatL2Store::new(self.dimension().await?),
                chunks,
            });
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let mut store: Option<FlatL2Store> = None;
        for batch in texts.chunks(self.batch_size) {
            let vectors = self
                .embedder
                .embed_batch(batch)
                .await
                .context("failed to embed index chunks")?;
            ensure!(
                vectors.len() == batch.len(),
                "embedder returned {} vectors for {} texts",
                vectors.len(),
                batch.len()
            );
            for vector in vectors {
                store
                    .get_or_insert_with(|| FlatL2Store::new(vector.len()))
                    .add(&vector)?;
            }
        }

        let store = match store {
            Some(store) => store,
            None => FlatL2Store::new(self.dimension().await?),
        };
        info!(chunks = chunks.len(), dim = store.dim(), "built vector index");
        Ok(LoadedIndex { store, chunks })
    }

    pub async fn persist(&self, index: &LoadedIndex, sources_hash: &str) -> Result<()> {
        let lock = path_lock(&self.meta_path);
        let _guard = lock.lock().await;
        self.write_files(index, sources_hash)
    }

    /// Read both files. `Ok(None)` when either is absent.
    pub async fn load(&self) -> Result<Option<StoredIndex>> {
        let lock = path_lock(&self.meta_path);
        let _guard = lock.lock().await;
        self.read_files()
    }

    /// Reuse the on-disk index when it matches the sources, the chunk size
    /// and the current embedder, otherwise rebuild and persist it.
    pub async fn ensure(&self, sources: &[Fragment]) -> Result<LoadedIndex> {
        let lock = path_lock(&self.meta_path);
        let _guard = lock.lock().await;

        let hash = sources_hash(sources)?;
        let dim = self.dimension().await?;

        match self.read_files() {
            Ok(Some(stored)) => match self.reuse(&stored, dim, &hash) {
                Reuse::AsIs => {
                    debug!(chunks = stored.metadata.chunks.len(), "reusing vector index");
                    return Ok(stored.into_loaded());
                }
                Reuse::UpgradeSidecar => {
                    info!("upgrading index sidecar");
                    let index = stored.into_loaded();
                    self.write_sidecar(&index, &hash)?;
                    return Ok(index);
                }
                Reuse::Rebuild(reason) => info!(reason, "rebuilding vector index"),
            },
            Ok(None) => info!("no vector index on disk, building"),
            Err(e) => warn!(error = %e, "vector index unreadable, rebuilding"),
        }

        let index = self.build(sources).await?;
        self.write_files(&index, &hash)?;
        Ok(index)
    }

    /// The `k` records nearest to the query, closest first.
    pub async fn search(&self, index: &LoadedIndex, query: &str, k: usize) -> Result<Vec<Fragment>> {
        if index.store.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        let vector = self
            .embedder
            .embed(query)
            .await
            .context("failed to embed query")?;
        let hits = index.store.search(&vector, k)?;
        Ok(hits
            .into_iter()
            .filter_map(|(pos, _)| index.chunks.get(pos).cloned())
            .collect())
    }

    fn read_files(&self) -> Result<Option<StoredIndex>> {
        if !self.vector_path.exists() || !self.meta_path.exists() {
            return Ok(None);
        }
        let store = FlatL2Store::load(&self.vector_path)?;
        let metadata = IndexMetadata::load(&self.meta_path)?;
        Ok(Some(StoredIndex { store, metadata }))
    }

    fn write_files(&self, index: &LoadedIndex, sources_hash: &str) -> Result<()> {
        index.store.save(&self.vector_path)?;
        self.write_sidecar(index, sources_hash)
    }

    fn write_sidecar(&self, index: &LoadedIndex, sources_hash: &str) -> Result<()> {
        IndexMetadata {
            dim: Some(index.store.dim()),
            sources_hash: Some(sources_hash.to_string()),
            chunk_tokens: Some(self.chunk_tokens),
            embedding_model: self.embedder.model_id(),
            chunks: index.chunks.clone(),
        }
        .save(&self.meta_path)
    }

    /// Fields missing from an older sidecar are taken to match.
    fn reuse(&self, stored: &StoredIndex, dim: usize, hash: &str) -> Reuse {
        let meta = &stored.metadata;
        let model = self.embedder.model_id();
        if stored.store.dim() != dim {
            return Reuse::Rebuild("embedding dimension changed");
        }
        if meta.dim.is_some_and(|d| d != dim) {
            return Reuse::Rebuild("sidecar dimension disagrees with vectors");
        }
        if meta.chunks.len() != stored.store.len() {
            return Reuse::Rebuild("record count disagrees with vectors");
        }
        if meta.chunk_tokens.is_some_and(|n| n != self.chunk_tokens) {
            return Reuse::Rebuild("chunk size changed");
        }
        if let (Some(stored_model), Some(current)) = (&meta.embedding_model, &model) {
            if stored_model != current {
                return Reuse::Rebuild("embedding model changed");
            }
        }
        let complete =
            meta.chunk_tokens.is_some() && (meta.embedding_model.is_some() || model.is_none());
        match meta.sources_hash.as_deref() {
            Some(h) if h != hash => Reuse::Rebuild("sources changed"),
            Some(_) if complete => Reuse::AsIs,
            _ => Reuse::UpgradeSidecar,
        }
    }
}
