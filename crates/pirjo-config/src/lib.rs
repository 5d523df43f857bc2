//! Configuration management for the PIRJO introduction generator
//!
//! This crate provides a validated configuration system with support for:
//! - Multiple formats (YAML, TOML, JSON)
//! - Config validation with helpful error messages
//! - Config merging (file + environment + explicit overrides)
//! - API credential resolution, including `.env` files
//!
//! # Example
//!
//! ```no_run
//! use pirjo_config::{Config, Credentials};
//!
//! // Load from default location (.pirjo.{toml,yml,json})
//! let config = Config::load()?;
//! let chunk_size = config.chunking.max_tokens;
//!
//! // Fail fast when neither OPENAI_API_KEY nor DEEPSEEK_API_KEY is available
//! let credentials = Credentials::resolve(None)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod credentials;
pub mod error;
pub mod loader;
pub mod types;
pub mod validation;

pub use credentials::{load_env_file, ApiProvider, Credentials};
pub use error::{ConfigError, ErrorFormatter, Result};
pub use loader::ConfigBuilder;
pub use types::*;

/// Trait for config validation
pub use validation::Validate;
