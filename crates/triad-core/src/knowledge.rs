//! Symbolic knowledge base: hexagram id → traditional metadata.
//!
//! The store is built once and read-only afterwards, so it is shared between
//! threads through an `Arc` without any locking.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::resolver::HexagramId;
use crate::trigram::TrigramCode;

/// Metadata for one hexagram.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexagramRecord {
    /// Binary id (`upper_index * 8 + lower_index + 1`).
    pub id: HexagramId,
    /// Position in the traditional King Wen sequence.
    pub king_wen: u8,
    pub name: String,
    /// Short keyword summary.
    pub meaning: String,
    pub upper: TrigramCode,
    pub lower: TrigramCode,
}

/// Result of a knowledge-base lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KnowledgeLookup<'a> {
    Found(&'a HexagramRecord),
    NotFound(HexagramId),
}

impl<'a> KnowledgeLookup<'a> {
    pub fn found(self) -> Option<&'a HexagramRecord> {
        match self {
            Self::Found(record) => Some(record),
            Self::NotFound(_) => None,
        }
    }
}

/// Read-only lookup of hexagram metadata by id.
pub trait SymbolicKnowledgeBase: Send + Sync {
    fn get_by_id(&self, id: HexagramId) -> KnowledgeLookup<'_>;

    /// Number of records held.
    fn size(&self) -> usize;
}

/// In-memory knowledge base keyed by hexagram id.
#[derive(Clone, Debug, Default)]
pub struct StaticKnowledgeBase {
    records: HashMap<HexagramId, HexagramRecord>,
}

impl StaticKnowledgeBase {
    /// All 64 hexagrams.
    pub fn canonical() -> Self {
        let mut records = Vec::with_capacity(64);
        for (upper, row) in KING_WEN.iter().enumerate() {
            for (lower, &king_wen) in row.iter().enumerate() {
                let (Some(upper_code), Some(lower_code)) = (
                    TrigramCode::from_canonical_index(upper as u8),
                    TrigramCode::from_canonical_index(lower as u8),
                ) else {
                    continue;
                };
                let Some(id) = HexagramId::new((upper * 8 + lower + 1) as u8) else {
                    continue;
                };
                let (name, meaning) = TRADITIONAL[usize::from(king_wen) - 1];
                records.push(HexagramRecord {
                    id,
                    king_wen,
                    name: name.to_string(),
                    meaning: meaning.to_string(),
                    upper: upper_code,
                    lower: lower_code,
                });
            }
        }
        Self::from_records(records)
    }

    /// Build from an arbitrary, possibly partial, set of records.
    ///
    /// Later records replace earlier ones with the same id.
    pub fn from_records(records: impl IntoIterator<Item = HexagramRecord>) -> Self {
        Self {
            records: records.into_iter().map(|r| (r.id, r)).collect(),
        }
    }
}

impl SymbolicKnowledgeBase for StaticKnowledgeBase {
    fn get_by_id(&self, id: HexagramId) -> KnowledgeLookup<'_> {
        match self.records.get(&id) {
            Some(record) => KnowledgeLookup::Found(record),
            None => KnowledgeLookup::NotFound(id),
        }
    }

    fn size(&self) -> usize {
        self.records.len()
    }
}

// ── Tables ──────────────────────────────────────────────────────────────

/// King Wen numbers; rows are the upper trigram, columns the lower trigram,
/// both in canonical order (heaven, lake, fire, thunder, wind, water,
/// mountain, earth).
const KING_WEN: [[u8; 8]; 8] = [
    [1, 10, 13, 25, 44, 6, 33, 12],
    [43, 58, 49, 17, 28, 47, 31, 45],
    [14, 38, 30, 21, 50, 64, 56, 35],
    [34, 54, 55, 51, 32, 40, 62, 16],
    [9, 61, 37, 42, 57, 59, 53, 20],
    [5, 60, 63, 3, 48, 29, 39, 8],
    [26, 41, 22, 27, 18, 4, 52, 23],
    [11, 19, 36, 24, 46, 7, 15, 2],
];

/// Name and keywords, indexed by King Wen number − 1.
const TRADITIONAL: [(&str, &str); 64] = [
    ("The Creative", "initiative, strength, leadership"),
    ("The Receptive", "devotion, acceptance, support"),
    ("Difficulty at the Beginning", "initial chaos, perseverance, growth"),
    ("Youthful Folly", "inexperience, learning, guidance"),
    ("Waiting", "patience, nourishment, timing"),
    ("Conflict", "dispute, caution, compromise"),
    ("The Army", "discipline, organisation, collective effort"),
    ("Holding Together", "unity, alliance, belonging"),
    ("The Taming Power of the Small", "restraint, gentle influence, small steps"),
    ("Treading", "conduct, care, propriety"),
    ("Peace", "harmony, prosperity, balance"),
    ("Standstill", "stagnation, withdrawal, inner integrity"),
    ("Fellowship with Men", "community, openness, shared purpose"),
    ("Possession in Great Measure", "abundance, clarity, generosity"),
    ("Modesty", "humility, balance, restraint"),
    ("Enthusiasm", "motivation, readiness, inspiration"),
    ("Following", "adaptation, loyalty, responsiveness"),
    ("Work on What Has Been Spoiled", "repair, renewal, correction"),
    ("Approach", "advance, encouragement, care"),
    ("Contemplation", "observation, perspective, example"),
    ("Biting Through", "decision, justice, clearing obstacles"),
    ("Grace", "form, beauty, refinement"),
    ("Splitting Apart", "decline, letting go, endurance"),
    ("Return", "turning point, renewal, recovery"),
    ("Innocence", "sincerity, spontaneity, naturalness"),
    ("The Taming Power of the Great", "accumulation, restraint, potential"),
    ("Nourishment", "sustenance, care, moderation"),
    ("Preponderance of the Great", "pressure, excess, transition"),
    ("The Abysmal", "danger, depth, persistence"),
    ("The Clinging", "clarity, dependence, illumination"),
    ("Influence", "attraction, receptivity, mutual response"),
    ("Duration", "constancy, endurance, commitment"),
    ("Retreat", "withdrawal, timing, self-preservation"),
    ("The Power of the Great", "vigour, power, right action"),
    ("Progress", "advancement, recognition, rising"),
    ("Darkening of the Light", "adversity, concealment, inner light"),
    ("The Family", "roles, loyalty, home"),
    ("Opposition", "contrast, divergence, small agreements"),
    ("Obstruction", "obstacles, reflection, seeking help"),
    ("Deliverance", "release, relief, forgiveness"),
    ("Decrease", "simplification, sacrifice, focus"),
    ("Increase", "gain, expansion, benefit"),
    ("Breakthrough", "resolution, determination, openness"),
    ("Coming to Meet", "encounter, temptation, vigilance"),
    ("Gathering Together", "assembly, cohesion, shared aims"),
    ("Pushing Upward", "gradual ascent, effort, growth"),
    ("Oppression", "exhaustion, adversity, inner resolve"),
    ("The Well", "source, resources, renewal"),
    ("Revolution", "change, reform, timing"),
    ("The Cauldron", "transformation, cultivation, nourishment"),
    ("The Arousing", "shock, awakening, movement"),
    ("Keeping Still", "stillness, rest, meditation"),
    ("Development", "gradual progress, patience, steadiness"),
    ("The Marrying Maiden", "subordination, tact, propriety"),
    ("Abundance", "fullness, peak, generosity"),
    ("The Wanderer", "travel, transience, caution"),
    ("The Gentle", "penetration, persistence, influence"),
    ("The Joyous", "joy, exchange, encouragement"),
    ("Dispersion", "dissolution, release, reunion"),
    ("Limitation", "boundaries, measure, restraint"),
    ("Inner Truth", "sincerity, trust, understanding"),
    ("Preponderance of the Small", "attention to detail, modesty, care"),
    ("After Completion", "fulfilment, vigilance, order"),
    ("Before Completion", "transition, potential, care"),
];
