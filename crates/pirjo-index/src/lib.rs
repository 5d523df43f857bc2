//! On-disk flat L2 vector index over PDF fragments.
//!
//! Two files make up an index: a bincode blob with the vectors and a JSON
//! sidecar with the fragment records in the same order, the embedding
//! dimension and the hash of the sources it was built from.

pub mod hash;
pub mod lock;
pub mod manager;
pub mod sidecar;
pub mod store;

pub use hash::sources_hash;
pub use manager::{LoadedIndex, StoredIndex, VectorIndexManager};
pub use sidecar::IndexMetadata;
pub use store::FlatL2Store;
