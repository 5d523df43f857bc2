pub mod draft;
pub mod generate;
pub mod index;
pub mod utils;

pub use draft::handle_draft;
pub use generate::{handle_generate, GenerateArgs};
pub use index::handle_index;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pirjo")]
#[command(about = "Generate cited academic introductions (PIRJO) from PDF sources")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Credentials file; defaults to `.env` in the working directory
    #[arg(long, value_name = "FILE", global = true)]
    pub env_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write an introduction from research framing and PDFs
    Generate(GenerateArgs),
    /// Extract PDFs and build or refresh the vector index
    Index {
        /// PDF files to index
        #[arg(value_name = "PDF")]
        pdfs: Vec<PathBuf>,
    },
    /// Merge raw PIRJO blocks from JSON and write scientific prose
    Draft {
        /// JSON object with block keys such as P, P2, I, O1
        #[arg(value_name = "BLOCKS.json")]
        blocks: PathBuf,

        /// Also write the text to this file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}
