pub mod index_store;
pub mod vector_index;

pub use index_store::VectorIndexStore;
pub use vector_index::{ScoredChunk, VectorIndex, VectorIndexError};
