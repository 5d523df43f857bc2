//! Validation trait and helpers for configuration types

use crate::error::{ConfigError, Result};

/// Trait for validating configuration values
///
/// Implement this trait for any config type that needs validation beyond
/// type-level checks.
pub trait Validate {
    /// Returns `Ok(())` if validation passes, or a `ConfigError` describing
    /// what failed.
    fn validate(&self) -> Result<()>;
}

/// Helper function to validate integer is above minimum
pub fn validate_positive(field: impl Into<String>, value: usize, min: usize) -> Result<()> {
    if value <= min {
        return Err(ConfigError::InvalidInteger {
            field: field.into(),
            value,
            min,
        });
    }
    Ok(())
}

/// Helper function to validate an HTTP(S) base URL
pub fn validate_url(field: impl Into<String>, url: &str) -> Result<()> {
    let field = field.into();
    if url.is_empty() {
        return Err(ConfigError::ValidationError {
            field,
            message: "URL cannot be empty string (use null to unset)".to_string(),
        });
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::ValidationError {
            field,
            message: format!("URL must start with http:// or https://, got: {}", url),
        });
    }
    Ok(())
}

/// Helper function to reject empty names
pub fn validate_non_empty(field: impl Into<String>, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: field.into(),
            message: "value cannot be empty".to_string(),
        });
    }
    Ok(())
}
