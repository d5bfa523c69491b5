use crate::memory::ConversationMemory;
use crate::state::ConversationState;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use tracing::debug;
use vera_core::{Listing, Turn};

struct SessionData {
    state: ConversationState,
    memory: ConversationMemory,
}

/// One session's state plus its locks.
///
/// `gate` serializes whole turns for the same session key; `data` guards the
/// short state reads/writes inside a turn. Slots for different sessions never
/// contend with each other.
pub struct SessionSlot {
    pub gate: tokio::sync::Mutex<()>,
    data: Mutex<SessionData>,
}

impl SessionSlot {
    fn new(memory_budget: usize) -> Self {
        Self {
            gate: tokio::sync::Mutex::new(()),
            data: Mutex::new(SessionData {
                state: ConversationState::new(),
                memory: ConversationMemory::new(memory_budget),
            }),
        }
    }

    pub fn state(&self) -> ConversationState {
        self.data.lock().unwrap().state.clone()
    }

    pub fn update_search_results(&self, listings: Vec<Listing>) {
        self.data.lock().unwrap().state.set_search_results(listings);
    }

    pub fn update_last_property(&self, listing: Listing) {
        self.data.lock().unwrap().state.set_last_property(listing);
    }

    /// The most recent `n` transcript turns, oldest first.
    pub fn memory_window(&self, n: usize) -> Vec<Turn> {
        self.data.lock().unwrap().memory.recent(n)
    }

    /// Append a completed (user, assistant) exchange to the transcript.
    pub fn push_exchange(&self, user_text: &str, assistant_text: &str) {
        let mut data = self.data.lock().unwrap();
        data.memory.push(Turn::user(user_text));
        data.memory.push(Turn::assistant(assistant_text));
        data.state.touch();
    }

    pub fn memory_len(&self) -> usize {
        self.data.lock().unwrap().memory.len()
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.data.lock().unwrap().state.updated_at
    }

    #[cfg(test)]
    pub(crate) fn force_updated_at(&self, at: DateTime<Utc>) {
        self.data.lock().unwrap().state.updated_at = at;
    }
}

/// Owns every live session, keyed by the opaque session id.
///
/// Reads sweep expired sessions inline, so no background task is required.
pub struct SessionContextStore {
    ttl: Duration,
    memory_budget: usize,
    inner: RwLock<HashMap<String, Arc<SessionSlot>>>,
}

impl SessionContextStore {
    pub fn new(ttl_secs: u64, memory_budget: usize) -> Self {
        Self {
            ttl: Duration::seconds(ttl_secs as i64),
            memory_budget,
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Fetch a session's slot, creating an empty one on first reference.
    pub fn get_or_create(&self, session_id: &str) -> Arc<SessionSlot> {
        self.sweep();
        if let Some(slot) = self.inner.read().unwrap().get(session_id) {
            return slot.clone();
        }
        let mut map = self.inner.write().unwrap();
        map.entry(session_id.to_string())
            .or_insert_with(|| {
                debug!(session_id, "creating session");
                Arc::new(SessionSlot::new(self.memory_budget))
            })
            .clone()
    }

    /// Remove a session entirely. Returns whether it existed.
    pub fn clear(&self, session_id: &str) -> bool {
        self.inner.write().unwrap().remove(session_id).is_some()
    }

    /// Drop every session idle for strictly longer than the TTL.
    pub fn sweep(&self) {
        self.sweep_older_than(Utc::now());
    }

    pub(crate) fn sweep_older_than(&self, now: DateTime<Utc>) {
        let mut map = self.inner.write().unwrap();
        let before = map.len();
        map.retain(|_, slot| now.signed_duration_since(slot.updated_at()) <= self.ttl);
        let removed = before - map.len();
        if removed > 0 {
            debug!(removed, "swept idle sessions");
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().unwrap().is_empty()
    }
}
