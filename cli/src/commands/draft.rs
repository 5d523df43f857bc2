use super::utils::{cli_error, load_config, spinner, write_output};
use anyhow::{anyhow, Result};
use pirjo_pipeline::draft_from_json;
use serde_json::Value;
use std::path::{Path, PathBuf};

pub async fn handle_draft(
    blocks: PathBuf,
    output: Option<PathBuf>,
    config_path: Option<&Path>,
    env_file: Option<&Path>,
) -> Result<()> {
    let content = std::fs::read_to_string(&blocks)
        .map_err(|e| anyhow!("No se pudo leer {}: {}", blocks.display(), e))?;
    let raw: Value = serde_json::from_str(&content)
        .map_err(|e| anyhow!("{} no contiene JSON válido: {}", blocks.display(), e))?;

    let config = load_config(config_path)?;
    let spinner = spinner("Redactando texto...")?;
    let text = draft_from_json(&config, &raw, env_file).await;
    spinner.finish_and_clear();
    let text = text.map_err(cli_error)?;

    println!("{text}");
    if let Some(path) = output {
        write_output(&path, &text)?;
    }
    Ok(())
}
