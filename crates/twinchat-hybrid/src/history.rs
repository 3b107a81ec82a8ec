//! Bounded per-session conversation memory.
//!
//! Sessions live in a moka cache (capacity-bounded, idle TTL). Each session's
//! turns sit behind their own mutex, so two requests for the same session
//! append one after the other instead of overwriting each other.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use moka::sync::Cache;

use twinchat_core::config::HistorySettings;
use twinchat_core::types::HistoryTurn;

type Turns = Arc<Mutex<Vec<HistoryTurn>>>;

pub struct SessionHistoryStore {
    sessions: Cache<String, Turns>,
    max_turns: usize,
}

impl Default for SessionHistoryStore {
    fn default() -> Self { Self::new(&HistorySettings::default()) }
}

impl SessionHistoryStore {
    pub fn new(settings: &HistorySettings) -> Self {
        let sessions = Cache::builder()
            .max_capacity(settings.max_sessions)
            .time_to_idle(Duration::from_secs(settings.idle_ttl_secs))
            .build();
        Self { sessions, max_turns: settings.max_turns }
    }

    pub fn max_turns(&self) -> usize { self.max_turns }

    /// Stored turns, oldest first. Empty for an unknown or absent session.
    pub fn get(&self, session_id: Option<&str>) -> Vec<HistoryTurn> {
        let Some(id) = session_key(session_id) else { return Vec::new() };
        match self.sessions.get(id) {
            Some(turns) => turns.lock().unwrap_or_else(|e| e.into_inner()).clone(),
            None => Vec::new(),
        }
    }

    /// Append `new_turns` and keep only the newest `max_turns`. Returns the
    /// stored sequence; a no-op returning nothing when there is no session id.
    pub fn append(&self, session_id: Option<&str>, new_turns: Vec<HistoryTurn>) -> Vec<HistoryTurn> {
        let Some(id) = session_key(session_id) else { return Vec::new() };
        let turns = self.sessions.get_with(id.to_string(), || Arc::new(Mutex::new(Vec::new())));
        let mut guard = turns.lock().unwrap_or_else(|e| e.into_inner());
        guard.extend(new_turns);
        keep_last(&mut *guard, self.max_turns);
        guard.clone()
    }

    pub fn session_count(&self) -> u64 {
        self.sessions.run_pending_tasks();
        self.sessions.entry_count()
    }
}

fn session_key(session_id: Option<&str>) -> Option<&str> {
    session_id.filter(|id| !id.is_empty())
}

/// Drop the oldest entries so at most `n` remain.
pub fn keep_last<T>(items: &mut Vec<T>, n: usize) {
    if items.len() > n {
        let excess = items.len() - n;
        items.drain(..excess);
    }
}

/// The newest `n` entries of `items`, cloned.
pub fn last_n<T: Clone>(items: &[T], n: usize) -> Vec<T> {
    items[items.len().saturating_sub(n)..].to_vec()
}
