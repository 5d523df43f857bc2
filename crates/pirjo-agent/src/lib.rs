//! The PIRJO agent chain.
//!
//! Each stage wraps an injected [`ModelProvider`](pirjo_core::llm::ModelProvider)
//! and issues one chat request per call (five for the methodologist). The
//! bibliography verifier and the raw block merge are deterministic.

pub mod analyst;
pub mod bibliography;
pub mod manager;
pub mod merge;
pub mod methodologist;
pub mod parse;
pub mod prompts;
pub mod reviewer;
pub mod writer;

pub use analyst::SourceAnalyst;
pub use bibliography::verify_bibliography;
pub use manager::CoherenceManager;
pub use merge::merge_raw_blocks;
pub use methodologist::Methodologist;
pub use parse::{flatten_value, JsonReply};
pub use reviewer::CitationReviewer;
pub use writer::{write_from_json, AcademicWriter, ScientificWriter};
