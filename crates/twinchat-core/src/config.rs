//! Configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars.
//! Nested keys are addressed from the environment with `__`, e.g.
//! `APP_RETRIEVAL__TOP_K=5`. Every setting has a default so an empty
//! environment still yields a working (degraded) service.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.validate()?;
        Ok(config)
    }

    /// Build from an already assembled figment (used by tests and embedders
    /// of the library that manage their own sources).
    pub fn from_figment(figment: Figment) -> anyhow::Result<Self> {
        let config = Self {
            figment: Figment::from(Serialized::defaults(Settings::default())).merge(figment),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn settings(&self) -> anyhow::Result<Settings> {
        self.figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to extract settings: {}", e))
    }

    fn validate(&self) -> anyhow::Result<()> {
        let settings = self.settings()?;
        let r = &settings.retrieval;
        if !(0.0..=1.0).contains(&r.lambda) {
            anyhow::bail!(crate::error::Error::InvalidConfig(format!(
                "retrieval.lambda must be within [0, 1], got {}",
                r.lambda
            )));
        }
        if r.keyword_divisor <= 0.0 {
            anyhow::bail!(crate::error::Error::InvalidConfig(
                "retrieval.keyword_divisor must be positive".to_string()
            ));
        }
        if r.top_k == 0 {
            anyhow::bail!(crate::error::Error::InvalidConfig(
                "retrieval.top_k must be at least 1".to_string()
            ));
        }
        let h = &settings.history;
        if h.max_turns == 0 {
            anyhow::bail!(crate::error::Error::InvalidConfig(
                "history.max_turns must be at least 1".to_string()
            ));
        }
        if h.max_sessions == 0 {
            anyhow::bail!(crate::error::Error::InvalidConfig(
                "history.max_sessions must be at least 1".to_string()
            ));
        }
        if h.idle_ttl_secs == 0 {
            anyhow::bail!(crate::error::Error::InvalidConfig(
                "history.idle_ttl_secs must be at least 1".to_string()
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub index: IndexSettings,
    pub retrieval: RetrievalSettings,
    pub history: HistorySettings,
    pub embedding: EmbeddingSettings,
    pub generation: GenerationSettings,
    pub persona: PersonaSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 3000 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSettings {
    /// Location of the precomputed embedding index (JSON).
    pub path: String,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self { path: "embeddings.json".to_string() }
    }
}

/// Knobs for candidate scoring and MMR selection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Relevance/diversity trade-off (1.0 = pure relevance).
    pub lambda: f32,
    /// Weight of the normalized keyword score in the MMR objective.
    pub keyword_weight: f32,
    pub top_k: usize,
    /// Raw keyword scores are divided by this before fusion.
    pub keyword_divisor: f32,
    /// Fuzzy edit distance as a fraction of term length.
    pub fuzziness: f32,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { lambda: 0.75, keyword_weight: 0.25, top_k: 3, keyword_divisor: 10.0, fuzziness: 0.2 }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HistorySettings {
    pub max_turns: usize,
    /// How many trailing client-supplied turns are trusted per request.
    pub client_window: usize,
    pub max_sessions: u64,
    pub idle_ttl_secs: u64,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self { max_turns: 20, client_window: 12, max_sessions: 10_000, idle_ttl_secs: 3600 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub model_dir: Option<String>,
    pub max_len: usize,
    /// Dimensionality of the fake embedder; the real model reports its own.
    pub dim: usize,
    pub use_fake: bool,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self { model_dir: None, max_len: 256, dim: 384, use_fake: false }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout_secs: Option<u64>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-1.5-flash".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaSettings {
    /// Name the assistant speaks as in prompts and history transcripts.
    pub name: String,
}

impl Default for PersonaSettings {
    fn default() -> Self {
        Self { name: "Som".to_string() }
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
