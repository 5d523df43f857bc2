mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{handle_draft, handle_generate, handle_index, Cli, Commands};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.config.as_deref();
    let env_file = cli.env_file.as_deref();

    match cli.command {
        Commands::Generate(args) => handle_generate(args, config, env_file).await,
        Commands::Index { pdfs } => handle_index(pdfs, config, env_file).await,
        Commands::Draft { blocks, output } => handle_draft(blocks, output, config, env_file).await,
    }
}
