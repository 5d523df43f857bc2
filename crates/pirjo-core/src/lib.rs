pub mod chunking;
pub mod lazy;
pub mod llm;
pub mod models;
pub mod pdf;
pub mod traits;

pub use models::{BlockKey, FileMetadata, Fragment, PipelineResult, PirjoBlocks};
