use super::utils::{cli_error, load_config, spinner, write_output};
use anyhow::Result;
use clap::Args;
use pirjo_core::PipelineResult;
use pirjo_pipeline::{generate_introduction, PipelineRequest};
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct GenerateArgs {
    /// Research title
    #[arg(long)]
    pub title: Option<String>,

    /// Research objective
    #[arg(long)]
    pub objective: Option<String>,

    /// Short summary of the work
    #[arg(long)]
    pub summary: Option<String>,

    /// Also write the introduction to this file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,

    /// Source PDFs
    #[arg(value_name = "PDF")]
    pub pdfs: Vec<PathBuf>,
}

pub async fn handle_generate(
    args: GenerateArgs,
    config_path: Option<&Path>,
    env_file: Option<&Path>,
) -> Result<()> {
    let request = PipelineRequest {
        title: args.title.unwrap_or_default(),
        objective: args.objective.unwrap_or_default(),
        summary: args.summary.unwrap_or_default(),
        paths: args.pdfs,
    };
    request.validate().map_err(cli_error)?;

    let config = load_config(config_path)?;
    let spinner = spinner("Generando introducción...")?;
    let result = generate_introduction(&config, &request, env_file).await;
    spinner.finish_and_clear();
    let result = result.map_err(cli_error)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }
    if let Some(path) = args.output {
        write_output(&path, &result.introduction)?;
    }
    Ok(())
}

fn print_result(result: &PipelineResult) {
    println!("{}\n", result.introduction);
    println!("Bloques PIRJO");
    for (key, text) in result.blocks.iter() {
        println!("  {} ({}): {}", key.label(), key, text);
    }
    println!("\nArchivos procesados: {}", result.files.join(", "));
}
