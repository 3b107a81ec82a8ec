use async_trait::async_trait;

/// Turns text into a vector comparable with the precomputed index.
///
/// Implementations must return L2-normalized vectors of length `dim()`.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>>;
}

/// A text-generation backend.
///
/// `Ok(None)` means the backend answered without usable text; callers treat it
/// the same as an unconfigured backend.
#[async_trait]
pub trait Generator: Send + Sync {
    fn name(&self) -> &str;
    async fn generate(&self, prompt: &str) -> crate::error::Result<Option<String>>;
}
