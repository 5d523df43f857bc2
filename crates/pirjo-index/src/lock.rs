use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

static LOCKS: Lazy<Mutex<HashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Process-wide async lock for one index file. Relative and absolute
/// spellings of the same path share a lock.
pub fn path_lock(path: &Path) -> Arc<tokio::sync::Mutex<()>> {
    let key = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    let mut locks = LOCKS.lock().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(locks.entry(key).or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_path_same_lock() {
        let a = path_lock(Path::new("/tmp/pirjo/index_meta.json"));
        let b = path_lock(Path::new("/tmp/pirjo/index_meta.json"));
        let c = path_lock(Path::new("/tmp/other/index_meta.json"));
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[test]
    fn test_relative_path_resolves_to_cwd() {
        let cwd = std::env::current_dir().unwrap();
        let relative = path_lock(Path::new("rel_index_meta.json"));
        let absolute = path_lock(&cwd.join("rel_index_meta.json"));
        assert!(Arc::ptr_eq(&relative, &absolute));
    }
}
