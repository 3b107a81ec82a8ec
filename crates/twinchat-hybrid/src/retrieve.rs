use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use tracing::{debug, warn};

use twinchat_core::config::RetrievalSettings;
use twinchat_core::error::{Error, Result};
use twinchat_core::traits::Embedder;
use twinchat_core::types::Candidate;
use twinchat_text::KeywordScorer;
use twinchat_vector::similarity::l2_normalize;
use twinchat_vector::{CandidateScorer, IndexStore, MmrParams, MmrSelector};

#[derive(Debug)]
pub enum RetrievalOutcome {
    /// The index is empty or absent; nothing was embedded.
    Disabled,
    /// May be empty when only keyword scoring ran and nothing matched.
    Selected(Vec<Candidate>),
}

/// Hybrid retrieval: embed the query, score every item semantically and
/// lexically, then pick a diverse top-K with MMR. Without an embedding model
/// it ranks keyword hits only.
pub struct Retriever {
    store: Arc<IndexStore>,
    keywords: OnceLock<Option<KeywordScorer>>,
    embedder: Option<Arc<dyn Embedder>>,
    scorer: CandidateScorer,
    selector: MmrSelector,
    fuzziness: f32,
}

impl Retriever {
    pub fn new(store: Arc<IndexStore>, embedder: Option<Arc<dyn Embedder>>, settings: &RetrievalSettings) -> Self {
        Self {
            store,
            keywords: OnceLock::new(),
            embedder,
            scorer: CandidateScorer::new(settings.keyword_divisor),
            selector: MmrSelector::new(MmrParams::from(settings)),
            fuzziness: settings.fuzziness,
        }
    }

    pub fn is_enabled(&self) -> bool { !self.store.is_empty() }

    /// Force the index load and keyword index build ahead of the first request.
    pub fn warm_up(&self) {
        if self.is_enabled() { let _ = self.keyword_scorer(); }
    }

    fn keyword_scorer(&self) -> Option<&KeywordScorer> {
        self.keywords
            .get_or_init(|| match KeywordScorer::build(self.store.items(), self.fuzziness) {
                Ok(scorer) => Some(scorer),
                Err(e) => { warn!("⚠️ Keyword index unavailable: {}", e); None }
            })
            .as_ref()
    }

    /// Embed the query, fuse semantic and keyword scores, select with MMR.
    ///
    /// Without a usable query vector (no model loaded, embedding failed,
    /// dimension mismatch) selection runs on keyword hits alone. Fails only
    /// when neither signal is available.
    pub async fn retrieve(&self, query: &str) -> Result<RetrievalOutcome> {
        if !self.is_enabled() { return Ok(RetrievalOutcome::Disabled); }

        let query_vector = match &self.embedder {
            Some(embedder) => match self.embed_query(embedder.clone(), query).await {
                Ok(v) => Some(v),
                Err(e) => { warn!("⚠️ Query embedding failed, using keyword scores only: {}", e); None }
            },
            None => None,
        };
        let keywords = self.keyword_scorer();
        if query_vector.is_none() && keywords.is_none() {
            return Err(Error::Keyword("no query vector and no keyword index".to_string()));
        }

        let keyword_scores = match keywords {
            Some(scorer) => scorer.query(query).unwrap_or_else(|e| { warn!("Keyword scoring skipped: {}", e); HashMap::new() }),
            None => HashMap::new(),
        };
        let candidates = match &query_vector {
            Some(v) => self.scorer.score_all(v, self.store.items(), &keyword_scores),
            None => self.scorer.score_keywords(self.store.items(), &keyword_scores),
        };
        let top = self.selector.select(&candidates);
        debug!(
            semantic = query_vector.is_some(),
            candidates = candidates.len(),
            keyword_hits = keyword_scores.len(),
            selected = ?top.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(),
            "hybrid retrieval"
        );
        Ok(RetrievalOutcome::Selected(top))
    }

    async fn embed_query(&self, embedder: Arc<dyn Embedder>, query: &str) -> Result<Vec<f32>> {
        let text = query.to_string();
        let mut query_vector = tokio::task::spawn_blocking(move || embedder.embed(&text))
            .await
            .map_err(|e| Error::Embedding(e.to_string()))?
            .map_err(|e| Error::Embedding(e.to_string()))?;
        if query_vector.len() != self.store.dims() {
            return Err(Error::Embedding(format!("query has {} dims, index has {}", query_vector.len(), self.store.dims())));
        }
        l2_normalize(&mut query_vector);
        Ok(query_vector)
    }
}
