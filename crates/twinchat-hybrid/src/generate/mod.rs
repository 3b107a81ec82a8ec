//! Optional text generation.
//!
//! The pipeline never calls a backend directly; it goes through [`attempt`],
//! which folds "not configured", "answered with nothing" and "failed" into an
//! explicit [`GenerationOutcome`] so each stage decides its own fallback.

use std::sync::Arc;

use tracing::info;

use twinchat_core::config::GenerationSettings;
use twinchat_core::error::Error;
use twinchat_core::traits::Generator;

pub mod gemini;

pub use gemini::GeminiGenerator;

#[derive(Debug)]
pub enum GenerationOutcome {
    Text(String),
    /// No backend configured, or it produced no text.
    Unavailable,
    Failed(Error),
}

pub async fn attempt(generator: Option<&dyn Generator>, prompt: &str) -> GenerationOutcome {
    let Some(generator) = generator else { return GenerationOutcome::Unavailable };
    match generator.generate(prompt).await {
        Ok(Some(text)) if !text.trim().is_empty() => GenerationOutcome::Text(text),
        Ok(_) => GenerationOutcome::Unavailable,
        Err(e) => GenerationOutcome::Failed(e),
    }
}

/// The configured backend, if any. An API key comes from the settings or
/// the `GEMINI_API_KEY` environment variable.
pub fn build_generator(settings: &GenerationSettings) -> anyhow::Result<Option<Arc<dyn Generator>>> {
    let api_key = settings
        .api_key
        .clone()
        .filter(|k| !k.is_empty())
        .or_else(|| std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()));
    let Some(api_key) = api_key else {
        info!("ℹ️ No generation API key configured; answers use retrieval fallbacks");
        return Ok(None);
    };
    let generator = GeminiGenerator::new(settings, api_key)?;
    info!("🤖 Generation enabled ({})", generator.name());
    Ok(Some(Arc::new(generator)))
}
