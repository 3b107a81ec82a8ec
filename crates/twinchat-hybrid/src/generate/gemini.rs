use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use twinchat_core::config::GenerationSettings;
use twinchat_core::error::{Error, Result};
use twinchat_core::traits::Generator;

/// Google Gemini `generateContent` over REST.
pub struct GeminiGenerator {
    client: reqwest::Client,
    url: String,
    model: String,
    api_key: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseCandidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.is_empty() { None } else { Some(text) }
    }
}

impl GeminiGenerator {
    pub fn new(settings: &GenerationSettings, api_key: String) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;
        let url = format!("{}/models/{}:generateContent", settings.endpoint.trim_end_matches('/'), settings.model);
        Ok(Self { client, url, model: settings.model.clone(), api_key })
    }
}

#[async_trait]
impl Generator for GeminiGenerator {
    fn name(&self) -> &str { &self.model }

    async fn generate(&self, prompt: &str) -> Result<Option<String>> {
        let body = GenerateRequest { contents: [Content { parts: [Part { text: prompt }] }] };
        let response = self
            .client
            .post(&self.url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Generation(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::Generation(format!("{} returned {}: {}", self.model, status, detail)));
        }
        let parsed: GenerateResponse = response.json().await.map_err(|e| Error::Generation(e.to_string()))?;
        let text = parsed.into_text();
        debug!(model = %self.model, chars = text.as_ref().map(|t| t.len()).unwrap_or(0), "generation finished");
        Ok(text)
    }
}
