//! PIRJO introduction pipeline: extraction, indexing, retrieval and the
//! agent chain, run strictly in sequence.

pub mod error;
pub mod pipeline;
pub mod request;

pub use error::PipelineError;
pub use pipeline::{draft_from_json, generate_introduction, index_documents, IndexReport, Pipeline, PipelineSettings};
pub use request::PipelineRequest;
