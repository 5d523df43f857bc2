use anyhow::{bail, ensure, Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Dense vectors of one dimension, searched exhaustively by L2 distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatL2Store {
    dim: usize,
    data: Vec<f32>,
}

impl FlatL2Store {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            data: Vec::new(),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        if self.dim == 0 {
            0
        } else {
            self.data.len() / self.dim
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn add(&mut self, vector: &[f32]) -> Result<()> {
        ensure!(
            vector.len() == self.dim && self.dim > 0,
            "vector has {} dimensions, index expects {}",
            vector.len(),
            self.dim
        );
        self.data.extend_from_slice(vector);
        Ok(())
    }

    /// Positions and squared distances of the `k` nearest vectors, closest
    /// first. Equal distances keep insertion order; a NaN distance ranks last.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>> {
        if self.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        ensure!(
            query.len() == self.dim,
            "query has {} dimensions, index expects {}",
            query.len(),
            self.dim
        );

        let mut scored: Vec<(usize, f32)> = self
            .data
            .par_chunks(self.dim)
            .enumerate()
            .map(|(pos, vector)| {
                let distance = squared_l2(vector, query);
                (pos, if distance.is_nan() { f32::INFINITY } else { distance })
            })
            .collect();

        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        scored.truncate(k);
        Ok(scored)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = bincode::serialize(self).context("failed to serialize vector store")?;
        write_atomic(path, &bytes)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .with_context(|| format!("failed to read vector store {}", path.display()))?;
        let store: FlatL2Store =
            bincode::deserialize(&bytes).context("failed to deserialize vector store")?;
        if store.dim == 0 && !store.data.is_empty() {
            bail!("vector store has data but zero dimension");
        }
        if store.dim > 0 && store.data.len() % store.dim != 0 {
            bail!(
                "vector store holds {} floats, not a multiple of dimension {}",
                store.data.len(),
                store.dim
            );
        }
        Ok(store)
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Write through a temporary file in the target directory, then rename.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}
