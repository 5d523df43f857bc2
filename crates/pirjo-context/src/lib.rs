pub mod embedder;
pub mod provider;

pub use embedder::select_embedder;
pub use provider::select_chat_model;
