use anyhow::{Context, Result};
use pirjo_core::Fragment;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Contents of the JSON sidecar. The optional fields are `None` when the file
/// predates them (a bare array of records, or an envelope without them).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexMetadata {
    #[serde(default)]
    pub dim: Option<usize>,
    #[serde(default)]
    pub sources_hash: Option<String>,
    /// Token budget the records were chunked with
    #[serde(default)]
    pub chunk_tokens: Option<usize>,
    #[serde(default)]
    pub embedding_model: Option<String>,
    pub chunks: Vec<Fragment>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SidecarFile {
    Envelope(IndexMetadata),
    Legacy(Vec<Fragment>),
}

impl IndexMetadata {
    pub fn is_legacy(&self) -> bool {
        self.sources_hash.is_none()
    }

    pub fn parse(content: &str) -> Result<Self> {
        let file: SidecarFile =
            serde_json::from_str(content).context("failed to parse index sidecar")?;
        Ok(match file {
            SidecarFile::Envelope(meta) => meta,
            SidecarFile::Legacy(chunks) => IndexMetadata {
                dim: None,
                sources_hash: None,
                chunk_tokens: None,
                embedding_model: None,
                chunks,
            },
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read index sidecar {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = serde_json::to_vec(self).context("failed to serialize index sidecar")?;
        crate::store::write_atomic(path, &bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_envelope() {
        let json = r#"{"dim":3,"sources_hash":"abc","chunks":[{"file":"a.pdf","page":1,"chunk":1,"text":"x"}]}"#;
        let meta = IndexMetadata::parse(json).unwrap();
        assert_eq!(meta.dim, Some(3));
        assert_eq!(meta.sources_hash.as_deref(), Some("abc"));
        assert!(!meta.is_legacy());
    }

    #[test]
    fn test_parse_legacy_array() {
        let json = r#"[{"file":"a.pdf","page":2,"chunk_id":4,"text":"x"}]"#;
        let meta = IndexMetadata::parse(json).unwrap();
        assert!(meta.is_legacy());
        assert_eq!(meta.dim, None);
        assert_eq!(meta.chunk_tokens, None);
        assert_eq!(meta.chunks[0].key(), "a.pdf:2:4");
    }

    #[test]
    fn test_envelope_without_hash() {
        let meta = IndexMetadata::parse(r#"{"chunks":[]}"#).unwrap();
        assert!(meta.is_legacy());
        assert_eq!(meta.embedding_model, None);
    }

    #[test]
    fn test_rejects_other_shapes() {
        assert!(IndexMetadata::parse(r#"{"dim":3}"#).is_err());
        assert!(IndexMetadata::parse("not json").is_err());
    }
}
