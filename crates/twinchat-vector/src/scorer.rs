use std::collections::HashMap;

use twinchat_core::types::{Candidate, IndexItem, ItemId};

use crate::similarity::cosine_similarity;

/// Fuses per-item semantic and keyword evidence into candidates.
#[derive(Debug, Clone, Copy)]
pub struct CandidateScorer {
    keyword_divisor: f32,
}

impl Default for CandidateScorer {
    fn default() -> Self { Self { keyword_divisor: 10.0 } }
}

impl CandidateScorer {
    pub fn new(keyword_divisor: f32) -> Self { Self { keyword_divisor } }

    /// One candidate per item, in index order.
    pub fn score_all(&self, query_vector: &[f32], items: &[IndexItem], keyword_scores: &HashMap<ItemId, f32>) -> Vec<Candidate> {
        items
            .iter()
            .map(|item| Candidate {
                id: item.id.clone(),
                text: item.text.clone(),
                vector: item.embedding.clone(),
                semantic_score: cosine_similarity(query_vector, &item.embedding),
                keyword_score: keyword_scores.get(&item.id).copied().unwrap_or(0.0) / self.keyword_divisor,
            })
            .collect()
    }

    /// Lexical-only candidates for when no query vector exists: only items
    /// with a keyword hit, semantic score 0, in index order.
    pub fn score_keywords(&self, items: &[IndexItem], keyword_scores: &HashMap<ItemId, f32>) -> Vec<Candidate> {
        items
            .iter()
            .filter_map(|item| {
                let raw = keyword_scores.get(&item.id).copied()?;
                Some(Candidate {
                    id: item.id.clone(),
                    text: item.text.clone(),
                    vector: item.embedding.clone(),
                    semantic_score: 0.0,
                    keyword_score: raw / self.keyword_divisor,
                })
            })
            .collect()
    }
}
