//! API credential resolution
//!
//! Two interchangeable keys are accepted: `OPENAI_API_KEY` (primary) and
//! `DEEPSEEK_API_KEY` (fallback, OpenAI-compatible endpoint). Values may come
//! from the process environment or from a `.env` file; variables already set
//! in the environment are never overridden by the file.

use crate::error::{ConfigError, Result};
use std::fmt;
use std::path::Path;

pub const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";
pub const DEEPSEEK_KEY_VAR: &str = "DEEPSEEK_API_KEY";

/// Which provider the resolved key belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiProvider {
    OpenAi,
    DeepSeek,
}

#[derive(Clone)]
pub struct Credentials {
    provider: ApiProvider,
    api_key: String,
}

impl Credentials {
    /// Load `env_file` (or `.env` from the working directory) and resolve a key
    pub fn resolve(env_file: Option<&Path>) -> Result<Self> {
        load_env_file(env_file)?;
        Self::from_lookup(|name| std::env::var(name).ok()).ok_or_else(|| {
            ConfigError::MissingCredentials {
                env_file: env_file
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| ".env".to_string()),
            }
        })
    }

    /// Resolve from an arbitrary variable lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(api_key) = read(OPENAI_KEY_VAR) {
            return Some(Self {
                provider: ApiProvider::OpenAi,
                api_key,
            });
        }
        read(DEEPSEEK_KEY_VAR).map(|api_key| Self {
            provider: ApiProvider::DeepSeek,
            api_key,
        })
    }

    pub fn provider(&self) -> ApiProvider {
        self.provider
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("provider", &self.provider)
            .field("api_key", &"***")
            .finish()
    }
}

/// Load a `.env`-style file without overriding variables already set. A
/// missing file is not an error.
pub fn load_env_file(env_file: Option<&Path>) -> Result<()> {
    let loaded = match env_file {
        Some(path) => dotenvy::from_path(path),
        None => dotenvy::dotenv().map(|_| ()),
    };

    match loaded {
        Ok(()) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(ConfigError::EnvFileError {
            path: env_file
                .map(Path::to_path_buf)
                .unwrap_or_else(|| ".env".into()),
            message: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_openai_key_preferred() {
        let creds = Credentials::from_lookup(lookup_from(&[
            (OPENAI_KEY_VAR, "sk-openai"),
            (DEEPSEEK_KEY_VAR, "sk-deepseek"),
        ]))
        .unwrap();
        assert_eq!(creds.provider(), ApiProvider::OpenAi);
        assert_eq!(creds.api_key(), "sk-openai");
    }

    #[test]
    fn test_deepseek_key_accepted() {
        let creds =
            Credentials::from_lookup(lookup_from(&[(DEEPSEEK_KEY_VAR, "sk-deepseek")])).unwrap();
        assert_eq!(creds.provider(), ApiProvider::DeepSeek);
    }

    #[test]
    fn test_blank_keys_are_missing() {
        assert!(Credentials::from_lookup(lookup_from(&[(OPENAI_KEY_VAR, "  ")])).is_none());
        assert!(Credentials::from_lookup(lookup_from(&[])).is_none());
    }

    #[test]
    fn test_debug_hides_key() {
        let creds = Credentials::from_lookup(lookup_from(&[(OPENAI_KEY_VAR, "sk-secret")])).unwrap();
        assert!(!format!("{creds:?}").contains("sk-secret"));
    }

    #[test]
    fn test_resolve_missing_mentions_env_file() {
        let _lock = ENV_LOCK.lock().unwrap();
        std::env::remove_var(OPENAI_KEY_VAR);
        std::env::remove_var(DEEPSEEK_KEY_VAR);

        let dir = tempfile::tempdir().unwrap();
        let err = Credentials::resolve(Some(&dir.path().join("absent.env"))).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredentials { .. }));
        assert!(err.to_string().contains(".env"));
    }

    #[test]
    fn test_resolve_reads_env_file() {
        let _lock = ENV_LOCK.lock().unwrap();
        std::env::remove_var(OPENAI_KEY_VAR);
        std::env::remove_var(DEEPSEEK_KEY_VAR);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "DEEPSEEK_API_KEY=sk-from-file").unwrap();

        let creds = Credentials::resolve(Some(file.path())).unwrap();
        assert_eq!(creds.provider(), ApiProvider::DeepSeek);
        assert_eq!(creds.api_key(), "sk-from-file");

        std::env::remove_var(DEEPSEEK_KEY_VAR);
    }
}
