//! twinchat-vector
//!
//! The precomputed embedding index (`store`), cosine scoring of index items
//! against a query (`scorer`) and diversified top-K selection (`mmr`).

pub mod mmr;
pub mod scorer;
pub mod similarity;
pub mod store;

pub use mmr::{MmrParams, MmrSelector};
pub use scorer::CandidateScorer;
pub use similarity::cosine_similarity;
pub use store::IndexStore;
