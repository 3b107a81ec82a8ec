//! Domain types shared by the retrieval stages, the chat pipeline and the
//! HTTP layer.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub type ItemId = String;

/// One precomputed snippet of the corpus.
///
/// `embedding` is unit-normalized and has the index's dimensionality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexItem {
    pub id: ItemId,
    pub text: String,
    pub embedding: Vec<f32>,
}

/// The whole embedding index, immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingIndex {
    pub model: String,
    pub dims: usize,
    pub items: Vec<IndexItem>,
}

/// A per-query scoring of one index item.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: ItemId,
    pub text: String,
    pub vector: Vec<f32>,
    pub semantic_score: f32,
    pub keyword_score: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub role: Role,
    pub content: String,
}

impl HistoryTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Which path produced a chat response. Serialized as a plain string; canned
/// topics use their topic name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseKind {
    Topic(String),
    General,
    LlmAnswer,
    HybridSearch,
    CritiqueRefined,
}

impl ResponseKind {
    pub fn as_str(&self) -> &str {
        match self {
            ResponseKind::Topic(name) => name.as_str(),
            ResponseKind::General => "general",
            ResponseKind::LlmAnswer => "llm-answer",
            ResponseKind::HybridSearch => "hybrid-search",
            ResponseKind::CritiqueRefined => "critique-refined",
        }
    }
}

impl From<String> for ResponseKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "general" => ResponseKind::General,
            "llm-answer" => ResponseKind::LlmAnswer,
            "hybrid-search" => ResponseKind::HybridSearch,
            "critique-refined" => ResponseKind::CritiqueRefined,
            _ => ResponseKind::Topic(s),
        }
    }
}

impl Serialize for ResponseKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ResponseKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(ResponseKind::from)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: ItemId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(rename = "type")]
    pub kind: ResponseKind,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matches: Option<Vec<Match>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ChatResponse {
    pub fn new(kind: ResponseKind, content: impl Into<String>) -> Self {
        Self { kind, content: content.into(), matches: None, details: None }
    }

    pub fn is_general(&self) -> bool {
        self.kind == ResponseKind::General
    }
}

/// A validated chat request as seen by the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub session_id: Option<String>,
    pub message: String,
    pub history: Vec<HistoryTurn>,
}
