use anyhow::{anyhow, Result};
use indicatif::{ProgressBar, ProgressStyle};
use pirjo_config::{Config, ErrorFormatter};
use pirjo_pipeline::PipelineError;
use std::path::Path;
use std::time::Duration;

pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let loaded = match config_path {
        Some(path) => Config::from_file(path),
        None => Config::load(),
    };
    loaded.map_err(|e| anyhow!(ErrorFormatter::new(e).format()))
}

/// Configuration problems get the colored formatter; everything else its
/// plain message.
pub fn cli_error(err: PipelineError) -> anyhow::Error {
    match err {
        PipelineError::Configuration(e) => anyhow!(ErrorFormatter::new(e).format()),
        other => other.into(),
    }
}

pub fn spinner(message: &str) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.green} {msg}")?,
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}

pub fn write_output(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text)
        .map_err(|e| anyhow!("No se pudo escribir {}: {}", path.display(), e))?;
    println!("Texto guardado en {}", path.display());
    Ok(())
}
