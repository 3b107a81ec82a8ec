//! Chat orchestration: canned topics, hybrid retrieval, grounded generation,
//! critique and per-session history.

pub mod canned;
pub mod generate;
pub mod history;
pub mod pipeline;
pub mod prompt;
pub mod retrieve;

pub use history::SessionHistoryStore;
pub use pipeline::{require_message, ChatOutcome, ChatPipeline, PipelineOptions, Stage, StageName};
pub use retrieve::{RetrievalOutcome, Retriever};
