use super::utils::{cli_error, load_config, spinner};
use anyhow::Result;
use pirjo_pipeline::index_documents;
use std::path::{Path, PathBuf};

pub async fn handle_index(
    pdfs: Vec<PathBuf>,
    config_path: Option<&Path>,
    env_file: Option<&Path>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let spinner = spinner("Indexando PDFs...")?;
    let report = index_documents(&config, &pdfs, env_file).await;
    spinner.finish_and_clear();
    let report = report.map_err(cli_error)?;

    println!(
        "{} archivos, {} fragmentos extraídos, {} fragmentos indexados (dimensión {}) en {}",
        report.files,
        report.fragments,
        report.indexed_chunks,
        report.dim,
        config.index.dir.display()
    );
    Ok(())
}
