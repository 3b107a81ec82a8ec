//! One-shot loader for the precomputed embedding index.
//!
//! The file is read the first time anyone asks for it. Whatever that attempt
//! produces, a populated index or an empty one after a failure, is kept for
//! the lifetime of the store.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{info, warn};

use twinchat_core::error::{Error, Result};
use twinchat_core::types::{EmbeddingIndex, IndexItem};

use crate::similarity::l2_normalize;

const NORM_TOLERANCE: f32 = 1e-3;

#[derive(Debug, Deserialize)]
struct RawIndex {
    #[serde(default)]
    model: String,
    #[serde(default)]
    dims: usize,
    #[serde(default)]
    items: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    embedding: Vec<f32>,
}

pub struct IndexStore {
    path: PathBuf,
    index: OnceLock<EmbeddingIndex>,
}

impl IndexStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), index: OnceLock::new() }
    }

    /// A store that never touches the filesystem.
    pub fn from_index(index: EmbeddingIndex) -> Self {
        let store = Self::new(PathBuf::new());
        let _ = store.index.set(index);
        store
    }

    pub fn path(&self) -> &Path { &self.path }

    /// Load the index if no attempt has been made yet; failures leave the
    /// store empty and are only logged.
    pub fn load(&self) -> &EmbeddingIndex {
        self.index.get_or_init(|| match read_index(&self.path) {
            Ok(Some(index)) => {
                info!("🔎 Loaded embedding index: {} items, dims={}, model={}", index.items.len(), index.dims, index.model);
                index
            }
            Ok(None) => {
                warn!("ℹ️ No embedding index at {}; semantic search disabled", self.path.display());
                EmbeddingIndex::default()
            }
            Err(e) => {
                warn!("⚠️ Failed to read {}: {}", self.path.display(), e);
                EmbeddingIndex::default()
            }
        })
    }

    pub fn items(&self) -> &[IndexItem] { &self.load().items }

    pub fn dims(&self) -> usize { self.load().dims }

    pub fn model(&self) -> &str { &self.load().model }

    pub fn is_empty(&self) -> bool { self.items().is_empty() }

    pub fn len(&self) -> usize { self.items().len() }
}

/// `Ok(None)` when the file does not exist.
pub fn read_index(path: &Path) -> Result<Option<EmbeddingIndex>> {
    if !path.exists() { return Ok(None); }
    let raw = std::fs::read_to_string(path).map_err(|e| Error::IndexLoad(e.to_string()))?;
    let parsed: RawIndex = serde_json::from_str(&raw).map_err(|e| Error::IndexLoad(e.to_string()))?;
    Ok(Some(normalize_index(parsed)))
}

fn normalize_index(raw: RawIndex) -> EmbeddingIndex {
    let mut dims = raw.dims;
    if dims == 0 {
        dims = raw.items.iter().map(|it| it.embedding.len()).find(|&n| n > 0).unwrap_or(0);
    }
    let mut items = Vec::with_capacity(raw.items.len());
    for (position, item) in raw.items.into_iter().enumerate() {
        let id = match item.id {
            Some(serde_json::Value::String(s)) => s,
            Some(serde_json::Value::Null) | None => position.to_string(),
            Some(other) => other.to_string(),
        };
        if item.embedding.len() != dims {
            warn!("Skipping item {}: embedding has {} dims, index declares {}", id, item.embedding.len(), dims);
            continue;
        }
        let mut embedding = item.embedding;
        let norm = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 && (norm - 1.0).abs() > NORM_TOLERANCE { l2_normalize(&mut embedding); }
        items.push(IndexItem { id, text: item.text.unwrap_or_default(), embedding });
    }
    EmbeddingIndex { model: raw.model, dims, items }
}
