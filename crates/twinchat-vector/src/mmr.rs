//! Maximal Marginal Relevance selection.
//!
//! Each round picks the unselected candidate maximizing
//! `λ·semantic − (1−λ)·maxSim(selected) + β·keyword`. The first pick has no
//! redundancy penalty, so it is the most relevant candidate overall. Ties go
//! to the candidate that appears first in the input.

use twinchat_core::config::RetrievalSettings;
use twinchat_core::types::Candidate;

use crate::similarity::cosine_similarity;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MmrParams {
    pub lambda: f32,
    pub keyword_weight: f32,
    pub top_k: usize,
}

impl Default for MmrParams {
    fn default() -> Self { Self { lambda: 0.75, keyword_weight: 0.25, top_k: 3 } }
}

impl From<&RetrievalSettings> for MmrParams {
    fn from(s: &RetrievalSettings) -> Self {
        Self { lambda: s.lambda, keyword_weight: s.keyword_weight, top_k: s.top_k }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MmrSelector {
    params: MmrParams,
}

impl MmrSelector {
    pub fn new(params: MmrParams) -> Self { Self { params } }

    /// Indices into `candidates`, in selection order.
    pub fn select_indices(&self, candidates: &[Candidate]) -> Vec<usize> {
        let MmrParams { lambda, keyword_weight, top_k } = self.params;
        let target = top_k.min(candidates.len());
        let mut selected: Vec<usize> = Vec::with_capacity(target);
        let mut taken = vec![false; candidates.len()];

        while selected.len() < target {
            let mut best: Option<usize> = None;
            let mut best_score = f32::NEG_INFINITY;
            for (i, c) in candidates.iter().enumerate() {
                if taken[i] { continue; }
                let redundancy = selected
                    .iter()
                    .map(|&s| cosine_similarity(&c.vector, &candidates[s].vector))
                    .fold(0.0f32, f32::max);
                let score = lambda * c.semantic_score - (1.0 - lambda) * redundancy + keyword_weight * c.keyword_score;
                if score > best_score { best_score = score; best = Some(i); }
            }
            let Some(i) = best else { break };
            // a repeated id is never eligible twice
            for (j, other) in candidates.iter().enumerate() {
                if other.id == candidates[i].id { taken[j] = true; }
            }
            selected.push(i);
        }
        selected
    }

    pub fn select(&self, candidates: &[Candidate]) -> Vec<Candidate> {
        self.select_indices(candidates).into_iter().map(|i| candidates[i].clone()).collect()
    }
}
