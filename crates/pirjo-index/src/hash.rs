use anyhow::Result;
use pirjo_core::Fragment;
use sha2::{Digest, Sha256};

/// Hex SHA-256 of the JSON-serialized fragment list. Sensitive to order and
/// to every field; used only to detect stale indexes.
pub fn sources_hash(sources: &[Fragment]) -> Result<String> {
    let bytes = serde_json::to_vec(sources)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(file: &str, chunk: u32, text: &str) -> Fragment {
        Fragment {
            file: file.to_string(),
            page: 1,
            chunk,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_hash_is_stable_and_sensitive() {
        let a = vec![fragment("a.pdf", 1, "uno"), fragment("a.pdf", 2, "dos")];
        let same = a.clone();
        let reordered = vec![a[1].clone(), a[0].clone()];
        let edited = vec![fragment("a.pdf", 1, "uno"), fragment("a.pdf", 2, "DOS")];

        let h = sources_hash(&a).unwrap();
        assert_eq!(h.len(), 64);
        assert_eq!(h, sources_hash(&same).unwrap());
        assert_ne!(h, sources_hash(&reordered).unwrap());
        assert_ne!(h, sources_hash(&edited).unwrap());
    }
}
