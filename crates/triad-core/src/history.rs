//! Bounded mapping history and the per-session history store.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::resolver::HexagramState;
use crate::types::SessionId;

/// One recorded dominant hexagram.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub hexagram: HexagramState,
}

impl HistoryEntry {
    pub fn now(hexagram: HexagramState) -> Self {
        Self {
            timestamp: Utc::now(),
            hexagram,
        }
    }
}

/// Ring buffer of history entries, oldest first.
///
/// Appending at capacity evicts the oldest entry. A capacity of zero is
/// treated as one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MappingHistory {
    capacity: usize,
    entries: VecDeque<HistoryEntry>,
}

impl Default for MappingHistory {
    fn default() -> Self {
        Self::with_capacity(crate::config::HistoryConfig::default().capacity)
    }
}

impl MappingHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity.min(1024)),
        }
    }

    pub fn append(&mut self, entry: HistoryEntry) {
        while self.entries.len() >= self.capacity.max(1) {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Up to `n` entries, newest first.
    pub fn recent(&self, n: usize) -> Vec<&HistoryEntry> {
        self.entries.iter().rev().take(n).collect()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Session-keyed histories.
///
/// [`HistoryStore::with_session`] holds the key's shard lock for the whole
/// closure, so read-project-append on one session is serialised while other
/// sessions proceed.
#[derive(Debug)]
pub struct HistoryStore {
    sessions: DashMap<SessionId, MappingHistory>,
    capacity: usize,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(crate::config::HistoryConfig::default().capacity)
    }
}

impl HistoryStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            capacity,
        }
    }

    /// Run `f` against the session's history, creating it if absent.
    pub fn with_session<R>(&self, id: &SessionId, f: impl FnOnce(&mut MappingHistory) -> R) -> R {
        let mut entry = self
            .sessions
            .entry(*id)
            .or_insert_with(|| MappingHistory::with_capacity(self.capacity));
        f(entry.value_mut())
    }

    /// Copy of the session's history, if any.
    pub fn snapshot(&self, id: &SessionId) -> Option<MappingHistory> {
        self.sessions.get(id).map(|h| h.value().clone())
    }

    pub fn remove(&self, id: &SessionId) -> Option<MappingHistory> {
        self.sessions.remove(id).map(|(_, h)| h)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
