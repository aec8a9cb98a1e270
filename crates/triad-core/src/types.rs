//! Core type definitions: questionnaire answers and subsystem profiles.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// ── Identifier Types ────────────────────────────────────────────────────

/// Identifier of an analysis session; keys a mapping history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub uuid::Uuid);

impl SessionId {
    /// Generate a new unique session ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session:{}", self.0)
    }
}

// ── Subsystems ──────────────────────────────────────────────────────────

/// The three personality subsystems.
///
/// Declaration order is the fixed order used for every tie-break.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subsystem {
    /// Core values and motivation.
    Engine,
    /// Social expression and adaptation.
    Interface,
    /// Defensive and stress-coping behaviour.
    SafeMode,
}

impl Subsystem {
    /// All subsystems in fixed order.
    pub const ALL: [Subsystem; 3] = [Subsystem::Engine, Subsystem::Interface, Subsystem::SafeMode];

    /// Stable lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Engine => "engine",
            Self::Interface => "interface",
            Self::SafeMode => "safe_mode",
        }
    }

    /// Parse an external subsystem tag.
    ///
    /// Case, `_` and `-` are ignored, so `safe_mode`, `safeMode` and
    /// `SAFE-MODE` are all accepted.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let normalized: String = tag
            .chars()
            .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "engine" => Some(Self::Engine),
            "interface" => Some(Self::Interface),
            "safemode" => Some(Self::SafeMode),
            _ => None,
        }
    }
}

impl std::fmt::Display for Subsystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Answers ─────────────────────────────────────────────────────────────

/// One of the four ordinal answer choices, strongest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Choice {
    A,
    B,
    C,
    D,
}

impl Choice {
    /// All choices, strongest first.
    pub const ALL: [Choice; 4] = [Choice::A, Choice::B, Choice::C, Choice::D];

    /// Parse `A`–`D` (any case) or the ordinals `1`–`4`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "A" | "1" => Some(Self::A),
            "B" | "2" => Some(Self::B),
            "C" | "3" => Some(Self::C),
            "D" | "4" => Some(Self::D),
            _ => None,
        }
    }
}

impl std::fmt::Display for Choice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        };
        f.write_str(label)
    }
}

/// A validated questionnaire answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    /// Question number (1-based).
    pub question_id: u32,
    /// The selected ordinal.
    pub selected_value: Choice,
    /// Subsystem the question belongs to.
    pub subsystem: Subsystem,
}

impl AnswerRecord {
    pub fn new(question_id: u32, selected_value: Choice, subsystem: Subsystem) -> Self {
        Self {
            question_id,
            selected_value,
            subsystem,
        }
    }

    /// Convert an untyped answer, rejecting unknown ordinals and tags.
    pub fn from_raw(raw: &RawAnswer) -> Result<Self, ValidationError> {
        let selected_value =
            Choice::parse(&raw.selected_value).ok_or_else(|| ValidationError::InvalidChoice {
                question_id: raw.question_id,
                value: raw.selected_value.clone(),
            })?;

        let tag = raw
            .subsystem_tag
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or(ValidationError::MissingSubsystemTag {
                question_id: raw.question_id,
            })?;

        let subsystem = Subsystem::from_tag(tag).ok_or_else(|| ValidationError::UnknownSubsystemTag {
            question_id: raw.question_id,
            tag: tag.to_string(),
        })?;

        Ok(Self::new(raw.question_id, selected_value, subsystem))
    }
}

/// An answer as supplied by the collection layer, before validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAnswer {
    pub question_id: u32,
    pub selected_value: String,
    #[serde(default)]
    pub subsystem_tag: Option<String>,
}

// ── Profiles ────────────────────────────────────────────────────────────

/// Weighted trait summary for one subsystem. All scores lie in `[0, 1]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubsystemProfile {
    pub subsystem: Subsystem,
    /// Mean scalar value of the selected choices.
    pub strength: f64,
    /// `1 - variance` of the choice scalars.
    pub consistency: f64,
    /// Share of distinct choices used.
    pub flexibility: f64,
    /// Agreement with the subsystem's reference pattern.
    pub integration: f64,
    /// Mean of the four scores above.
    pub overall: f64,
}

impl SubsystemProfile {
    /// A profile with every score at zero (no matching answers).
    pub fn empty(subsystem: Subsystem) -> Self {
        Self {
            subsystem,
            strength: 0.0,
            consistency: 0.0,
            flexibility: 0.0,
            integration: 0.0,
            overall: 0.0,
        }
    }
}

/// The three subsystem profiles of one analysis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TripleProfile {
    pub engine: SubsystemProfile,
    pub interface: SubsystemProfile,
    pub safe_mode: SubsystemProfile,
}

impl TripleProfile {
    pub fn get(&self, subsystem: Subsystem) -> &SubsystemProfile {
        match subsystem {
            Subsystem::Engine => &self.engine,
            Subsystem::Interface => &self.interface,
            Subsystem::SafeMode => &self.safe_mode,
        }
    }

    /// Profiles in fixed subsystem order.
    pub fn iter(&self) -> impl Iterator<Item = &SubsystemProfile> {
        [&self.engine, &self.interface, &self.safe_mode].into_iter()
    }

    /// The subsystem with the highest `overall` score; ties go to the
    /// earlier subsystem.
    pub fn strongest(&self) -> Subsystem {
        self.select(|candidate, best| candidate > best)
    }

    /// The subsystem with the lowest `overall` score; ties go to the
    /// earlier subsystem.
    pub fn weakest(&self) -> Subsystem {
        self.select(|candidate, best| candidate < best)
    }

    fn select(&self, better: impl Fn(f64, f64) -> bool) -> Subsystem {
        let mut best = &self.engine;
        for profile in self.iter().skip(1) {
            if better(profile.overall, best.overall) {
                best = profile;
            }
        }
        best.subsystem
    }
}
