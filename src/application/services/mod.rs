pub mod analysis_pipeline;
pub mod chunker;
pub mod context_assembler;
pub mod generation_orchestrator;
pub mod prompts;

pub use analysis_pipeline::AnalysisPipeline;
pub use chunker::TextChunker;
pub use context_assembler::ContextAssembler;
pub use generation_orchestrator::GenerationOrchestrator;
