//! Hexagram resolution: a pair of trigrams ↔ one of 64 hexagram ids.
//!
//! The id is positional: `upper_index * 8 + lower_index + 1`, with indices
//! taken from [`TrigramCode::CANONICAL_ORDER`]. Metadata comes from a
//! [`SymbolicKnowledgeBase`]; a missing entry degrades to a placeholder state
//! instead of failing.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::knowledge::{KnowledgeLookup, StaticKnowledgeBase, SymbolicKnowledgeBase};
use crate::trigram::TrigramCode;
use crate::types::Subsystem;

/// Name and meaning used when the knowledge base has no entry.
pub const UNKNOWN: &str = "unknown";

// ── Hexagram Id ─────────────────────────────────────────────────────────

/// Hexagram identifier in `1..=64`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HexagramId(u8);

impl HexagramId {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 64;

    pub const fn new(value: u8) -> Option<Self> {
        if value >= Self::MIN && value <= Self::MAX {
            Some(Self(value))
        } else {
            None
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Absolute difference between two ids.
    pub fn distance(self, other: HexagramId) -> u8 {
        self.0.abs_diff(other.0)
    }
}

impl TryFrom<u8> for HexagramId {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("hexagram id {value} outside 1..=64"))
    }
}

impl From<HexagramId> for u8 {
    fn from(id: HexagramId) -> Self {
        id.0
    }
}

impl std::fmt::Display for HexagramId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Hexagram State ──────────────────────────────────────────────────────

/// Whether metadata for a state came from the knowledge base.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnowledgeStatus {
    Known,
    Unknown,
}

/// A resolved hexagram with its trigrams and metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexagramState {
    pub id: HexagramId,
    pub upper_trigram: TrigramCode,
    pub lower_trigram: TrigramCode,
    pub name: String,
    pub meaning: String,
    pub knowledge: KnowledgeStatus,
}

impl HexagramState {
    pub fn is_known(&self) -> bool {
        self.knowledge == KnowledgeStatus::Known
    }
}

/// One hexagram per subsystem.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripleHexagrams {
    pub engine: HexagramState,
    pub interface: HexagramState,
    pub safe_mode: HexagramState,
}

impl TripleHexagrams {
    pub fn get(&self, subsystem: Subsystem) -> &HexagramState {
        match subsystem {
            Subsystem::Engine => &self.engine,
            Subsystem::Interface => &self.interface,
            Subsystem::SafeMode => &self.safe_mode,
        }
    }
}

// ── Resolver ────────────────────────────────────────────────────────────

/// Id of the hexagram formed by `upper` over `lower`.
pub fn hexagram_id(upper: TrigramCode, lower: TrigramCode) -> HexagramId {
    HexagramId(upper.canonical_index() * 8 + lower.canonical_index() + 1)
}

/// Exact inverse of [`hexagram_id`].
pub fn decode(id: HexagramId) -> (TrigramCode, TrigramCode) {
    let offset = id.get() - 1;
    let upper = TrigramCode::CANONICAL_ORDER[usize::from(offset / 8)];
    let lower = TrigramCode::CANONICAL_ORDER[usize::from(offset % 8)];
    (upper, lower)
}

/// Maps trigram pairs to hexagram states and back.
#[derive(Debug)]
pub struct HexagramResolver<K: SymbolicKnowledgeBase = StaticKnowledgeBase> {
    knowledge: Arc<K>,
}

impl<K: SymbolicKnowledgeBase> Clone for HexagramResolver<K> {
    fn clone(&self) -> Self {
        Self {
            knowledge: Arc::clone(&self.knowledge),
        }
    }
}

impl Default for HexagramResolver {
    fn default() -> Self {
        Self::new(Arc::new(StaticKnowledgeBase::canonical()))
    }
}

impl<K: SymbolicKnowledgeBase> HexagramResolver<K> {
    pub fn new(knowledge: Arc<K>) -> Self {
        Self { knowledge }
    }

    pub fn knowledge(&self) -> &Arc<K> {
        &self.knowledge
    }

    /// Resolve a trigram pair, attaching knowledge-base metadata.
    pub fn resolve(&self, upper: TrigramCode, lower: TrigramCode) -> HexagramState {
        let id = hexagram_id(upper, lower);
        let state = match self.knowledge.get_by_id(id) {
            KnowledgeLookup::Found(record) => HexagramState {
                id,
                upper_trigram: upper,
                lower_trigram: lower,
                name: record.name.clone(),
                meaning: record.meaning.clone(),
                knowledge: KnowledgeStatus::Known,
            },
            KnowledgeLookup::NotFound(_) => {
                warn!(hexagram = %id, %upper, %lower, "Hexagram missing from knowledge base, using placeholder");
                HexagramState {
                    id,
                    upper_trigram: upper,
                    lower_trigram: lower,
                    name: UNKNOWN.to_string(),
                    meaning: UNKNOWN.to_string(),
                    knowledge: KnowledgeStatus::Unknown,
                }
            }
        };
        debug!(hexagram = %state.id, name = %state.name, "Resolved hexagram");
        state
    }

    /// Resolve directly from an id.
    pub fn state(&self, id: HexagramId) -> HexagramState {
        let (upper, lower) = decode(id);
        self.resolve(upper, lower)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn code(s: &str) -> TrigramCode {
        s.parse().unwrap()
    }

    type Resolver = HexagramResolver<StaticKnowledgeBase>;

    #[test]
    fn hexagram_id_bounds() {
        assert!(HexagramId::new(0).is_none());
        assert!(HexagramId::new(65).is_none());
        assert_eq!(HexagramId::new(64).map(HexagramId::get), Some(64));
        assert_eq!(HexagramId::new(3).unwrap().distance(HexagramId::new(10).unwrap()), 7);
    }

    #[test]
    fn hexagram_id_serde_validates() {
        let id: HexagramId = serde_json::from_str("12").unwrap();
        assert_eq!(id.get(), 12);
        assert_eq!(serde_json::to_string(&id).unwrap(), "12");
        assert!(serde_json::from_str::<HexagramId>("0").is_err());
        assert!(serde_json::from_str::<HexagramId>("65").is_err());
    }

    #[test]
    fn heaven_over_earth_is_eight() {
        let resolver = Resolver::default();
        let state = resolver.resolve(code("111"), code("000"));
        assert_eq!(state.id.get(), 8);
        assert_eq!(state.name, "Standstill");
        assert!(state.is_known());
    }

    #[test]
    fn corner_ids() {
        assert_eq!(hexagram_id(code("111"), code("111")).get(), 1);
        assert_eq!(hexagram_id(code("000"), code("000")).get(), 64);
        assert_eq!(hexagram_id(code("110"), code("111")).get(), 9);
    }

    #[test]
    fn pairs_map_bijectively() {
        let mut ids = HashSet::new();
        for upper in TrigramCode::CANONICAL_ORDER {
            for lower in TrigramCode::CANONICAL_ORDER {
                let id = hexagram_id(upper, lower);
                assert!(ids.insert(id));
                assert_eq!(decode(id), (upper, lower));
            }
        }
        assert_eq!(ids.len(), 64);
    }

    #[test]
    fn missing_knowledge_yields_placeholder() {
        let resolver = HexagramResolver::new(Arc::new(StaticKnowledgeBase::default()));
        let state = resolver.resolve(code("010"), code("101"));
        assert_eq!(state.knowledge, KnowledgeStatus::Unknown);
        assert_eq!(state.name, UNKNOWN);
        assert_eq!(state.meaning, UNKNOWN);
        assert_eq!(state.id, hexagram_id(code("010"), code("101")));
    }

    #[test]
    fn state_from_id() {
        let resolver = Resolver::default();
        let state = resolver.state(HexagramId::new(64).unwrap());
        assert_eq!(state.upper_trigram, code("000"));
        assert_eq!(state.lower_trigram, code("000"));
        assert_eq!(state.name, "The Receptive");
    }
}
