pub mod artifact;
pub mod chunk;
pub mod context_block;
pub mod project;

pub use artifact::{
    ArtifactSelector, CodeSnippet, DiagramKind, Insight, ProjectArtifacts, Reference, SummaryLevel,
};
pub use chunk::DocumentChunk;
pub use context_block::{ContextBlock, ExternalContextItem};
pub use project::PaperProject;
