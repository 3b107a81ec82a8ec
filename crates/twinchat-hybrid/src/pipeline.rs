//! Per-request orchestration.
//!
//! A request walks a fixed sequence of [`Stage`]s:
//!
//! ```text
//! CannedMatch -> Retrieve -> Generate -> Critique -> Persist -> Done
//! ```
//!
//! Every stage is a method returning a typed outcome. Retrieval, answering and
//! critique are optional enrichments: their failures are logged and the
//! response computed so far moves on unchanged, so a validated request always
//! ends in `Done`.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use twinchat_core::config::Settings;
use twinchat_core::error::{Error, Result};
use twinchat_core::traits::{Embedder, Generator};
use twinchat_core::types::{Candidate, ChatRequest, ChatResponse, HistoryTurn, Match, ResponseKind};
use twinchat_vector::IndexStore;

use crate::canned::{find_topic, general_response};
use crate::generate::{attempt, build_generator, GenerationOutcome};
use crate::history::{last_n, SessionHistoryStore};
use crate::prompt::{answer_prompt, critique_prompt, fallback_answer};
use crate::retrieve::{RetrievalOutcome, Retriever};

pub const MESSAGE_REQUIRED: &str = "Message is required";

/// Reject absent or empty messages before any stage runs.
pub fn require_message(message: Option<String>) -> Result<String> {
    match message {
        Some(m) if !m.is_empty() => Ok(m),
        _ => Err(Error::Validation(MESSAGE_REQUIRED.to_string())),
    }
}

#[derive(Debug)]
pub enum Stage {
    CannedMatch,
    Retrieve { response: ChatResponse },
    Generate { response: ChatResponse, top: Vec<Candidate> },
    Critique { response: ChatResponse, top: Vec<Candidate> },
    Persist { response: ChatResponse },
    Done(ChatResponse),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageName {
    CannedMatch,
    Retrieve,
    Generate,
    Critique,
    Persist,
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StageName::CannedMatch => "canned-match",
            StageName::Retrieve => "retrieve",
            StageName::Generate => "generate",
            StageName::Critique => "critique",
            StageName::Persist => "persist",
        };
        f.write_str(s)
    }
}

impl Stage {
    fn name(&self) -> Option<StageName> {
        match self {
            Stage::CannedMatch => Some(StageName::CannedMatch),
            Stage::Retrieve { .. } => Some(StageName::Retrieve),
            Stage::Generate { .. } => Some(StageName::Generate),
            Stage::Critique { .. } => Some(StageName::Critique),
            Stage::Persist { .. } => Some(StageName::Persist),
            Stage::Done(_) => None,
        }
    }
}

#[derive(Debug)]
pub enum CannedOutcome {
    Topic(ChatResponse),
    General(ChatResponse),
}

#[derive(Debug)]
pub enum AnswerOutcome {
    Generated(ChatResponse),
    /// Deterministic snippet listing; the backend was unavailable or failed.
    Fallback(ChatResponse),
}

#[derive(Debug)]
pub enum CritiqueOutcome {
    Refined(ChatResponse),
    Kept(ChatResponse),
}

/// What a request produced, plus the stages it actually ran.
#[derive(Debug)]
pub struct ChatOutcome {
    pub response: ChatResponse,
    pub trace: Vec<StageName>,
}

/// Per-request view shared by the stages.
struct Turn<'a> {
    request: &'a ChatRequest,
    /// Trusted tail of the client-supplied history.
    client_history: Vec<HistoryTurn>,
    /// Stored plus client history, newest `max_turns`, used in prompts.
    prompt_history: Vec<HistoryTurn>,
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub persona: String,
    pub client_window: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self { Self { persona: "Som".to_string(), client_window: 12 } }
}

pub struct ChatPipeline {
    retriever: Retriever,
    generator: Option<Arc<dyn Generator>>,
    history: SessionHistoryStore,
    options: PipelineOptions,
}

impl ChatPipeline {
    pub fn new(retriever: Retriever, generator: Option<Arc<dyn Generator>>, history: SessionHistoryStore, options: PipelineOptions) -> Self {
        Self { retriever, generator, history, options }
    }

    /// Startup phase: load the index, build the keyword index, and load the
    /// embedding model and generation backend the settings call for.
    pub fn from_settings(settings: &Settings, base_dir: &std::path::Path) -> anyhow::Result<Self> {
        let index_path = twinchat_core::config::resolve_with_base(base_dir, &settings.index.path);
        let store = Arc::new(IndexStore::new(index_path));
        store.load();

        let embedder: Option<Arc<dyn Embedder>> = if store.is_empty() {
            None
        } else {
            match twinchat_embed::load_embedder(&settings.embedding) {
                Ok(e) => Some(e),
                Err(e) => { warn!("⚠️ Embedding model unavailable, retrieval falls back to keywords: {}", e); None }
            }
        };
        let retriever = Retriever::new(store, embedder, &settings.retrieval);
        retriever.warm_up();

        let generator = build_generator(&settings.generation)?;
        let history = SessionHistoryStore::new(&settings.history);
        let options = PipelineOptions { persona: settings.persona.name.clone(), client_window: settings.history.client_window };
        Ok(Self::new(retriever, generator, history, options))
    }

    pub fn history(&self) -> &SessionHistoryStore { &self.history }

    pub fn persona(&self) -> &str { &self.options.persona }

    pub async fn respond(&self, request: ChatRequest) -> ChatOutcome {
        let client_history = last_n(&request.history, self.options.client_window);
        let mut merged = self.history.get(request.session_id.as_deref());
        merged.extend(client_history.iter().cloned());
        let prompt_history = last_n(&merged, self.history.max_turns());
        let turn = Turn { request: &request, client_history, prompt_history };

        let mut trace = Vec::new();
        let mut stage = Stage::CannedMatch;
        loop {
            if let Stage::Done(response) = stage {
                let stages = trace.iter().map(StageName::to_string).collect::<Vec<_>>().join(" > ");
                debug!(kind = response.kind.as_str(), %stages, "request finished");
                return ChatOutcome { response, trace };
            }
            if let Some(name) = stage.name() { trace.push(name); }
            stage = self.advance(stage, &turn).await;
        }
    }

    async fn advance(&self, stage: Stage, turn: &Turn<'_>) -> Stage {
        match stage {
            Stage::CannedMatch => {
                let response = match self.canned_match(&turn.request.message) {
                    CannedOutcome::Topic(r) | CannedOutcome::General(r) => r,
                };
                if self.retriever.is_enabled() {
                    Stage::Retrieve { response }
                } else {
                    Stage::Critique { response, top: Vec::new() }
                }
            }
            Stage::Retrieve { response } => {
                match self.retriever.retrieve(&turn.request.message).await {
                    Ok(RetrievalOutcome::Selected(top)) if response.is_general() && !top.is_empty() => Stage::Generate { response, top },
                    Ok(RetrievalOutcome::Selected(top)) => Stage::Critique { response, top },
                    Ok(RetrievalOutcome::Disabled) => Stage::Critique { response, top: Vec::new() },
                    Err(e) => {
                        warn!("⚠️ Retrieval failed, continuing without context: {}", e);
                        Stage::Critique { response, top: Vec::new() }
                    }
                }
            }
            Stage::Generate { response: _, top } => {
                let response = match self.answer(turn, &top).await {
                    AnswerOutcome::Generated(r) | AnswerOutcome::Fallback(r) => r,
                };
                Stage::Critique { response, top }
            }
            Stage::Critique { response, top } => match self.critique(turn, response, &top).await {
                CritiqueOutcome::Refined(response) | CritiqueOutcome::Kept(response) => Stage::Persist { response },
            },
            Stage::Persist { response } => {
                self.persist(turn, &response);
                Stage::Done(response)
            }
            done @ Stage::Done(_) => done,
        }
    }

    pub fn canned_match(&self, message: &str) -> CannedOutcome {
        match find_topic(message) {
            Some(topic) => {
                info!("💬 Canned topic matched: {}", topic.name);
                CannedOutcome::Topic(topic.to_response())
            }
            None => CannedOutcome::General(general_response()),
        }
    }

    async fn answer(&self, turn: &Turn<'_>, top: &[Candidate]) -> AnswerOutcome {
        let matches = Some(top.iter().map(|c| Match { id: c.id.clone() }).collect::<Vec<_>>());
        let prompt = answer_prompt(&self.options.persona, &turn.request.message, top, &turn.prompt_history);
        let fallback = || ChatResponse { kind: ResponseKind::HybridSearch, content: fallback_answer(top), matches: matches.clone(), details: None };
        match attempt(self.generator.as_deref(), &prompt).await {
            GenerationOutcome::Text(content) => {
                AnswerOutcome::Generated(ChatResponse { kind: ResponseKind::LlmAnswer, content, matches: matches.clone(), details: None })
            }
            GenerationOutcome::Unavailable => AnswerOutcome::Fallback(fallback()),
            GenerationOutcome::Failed(e) => {
                warn!("⚠️ Answer generation failed, using retrieved snippets: {}", e);
                AnswerOutcome::Fallback(fallback())
            }
        }
    }

    async fn critique(&self, turn: &Turn<'_>, response: ChatResponse, top: &[Candidate]) -> CritiqueOutcome {
        let prompt = critique_prompt(&self.options.persona, &turn.request.message, &response.content, top, &turn.prompt_history);
        match attempt(self.generator.as_deref(), &prompt).await {
            GenerationOutcome::Text(content) => CritiqueOutcome::Refined(ChatResponse { kind: ResponseKind::CritiqueRefined, content, ..response }),
            GenerationOutcome::Unavailable => CritiqueOutcome::Kept(response),
            GenerationOutcome::Failed(e) => {
                warn!("Critique/refine failed: {}", e);
                CritiqueOutcome::Kept(response)
            }
        }
    }

    fn persist(&self, turn: &Turn<'_>, response: &ChatResponse) {
        let mut new_turns = turn.client_history.clone();
        new_turns.push(HistoryTurn::user(turn.request.message.clone()));
        new_turns.push(HistoryTurn::assistant(response.content.clone()));
        self.history.append(turn.request.session_id.as_deref(), new_turns);
    }
}
