//! twinchat-text
//!
//! Tantivy-based lexical scoring over the snippet corpus. See `keyword` for
//! the exact/prefix/fuzzy query construction.

pub mod keyword;
pub mod tantivy_utils;

pub use keyword::KeywordScorer;
