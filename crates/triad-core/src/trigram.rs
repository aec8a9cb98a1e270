//! Trigram codes and the activation → trigram encoder.
//!
//! A trigram is a 3-bit code. Activation values in `[0, 1]` are quantised
//! into eight buckets; the bucket index is the code. Upper (outer) trigrams
//! lean towards yang codes and lower (inner) trigrams towards yin codes.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config::{ContextShift, EncodingConfig};
use crate::numeric::{clamp_range, clamp_unit, quantize};
use crate::types::SubsystemProfile;

// ── Trigram Code ────────────────────────────────────────────────────────

/// A 3-bit trigram code, rendered as exactly three `0`/`1` characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrigramCode(u8);

impl TrigramCode {
    /// Canonical ordering of the eight codes, heaven first.
    pub const CANONICAL_ORDER: [TrigramCode; 8] = [
        TrigramCode(0b111),
        TrigramCode(0b110),
        TrigramCode(0b101),
        TrigramCode(0b100),
        TrigramCode(0b011),
        TrigramCode(0b010),
        TrigramCode(0b001),
        TrigramCode(0b000),
    ];

    /// Build a code from its bits; values above `0b111` are rejected.
    pub const fn from_bits(bits: u8) -> Option<Self> {
        if bits <= 0b111 {
            Some(Self(bits))
        } else {
            None
        }
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Position in [`Self::CANONICAL_ORDER`] (0..=7).
    pub const fn canonical_index(self) -> u8 {
        7 - self.0
    }

    /// Inverse of [`Self::canonical_index`]; `index` must be below 8.
    pub const fn from_canonical_index(index: u8) -> Option<Self> {
        if index < 8 {
            Some(Self(7 - index))
        } else {
            None
        }
    }

    /// Static attributes of this code.
    pub fn trigram(self) -> Trigram {
        match self.0 {
            0b111 => Trigram::Heaven,
            0b110 => Trigram::Lake,
            0b101 => Trigram::Fire,
            0b100 => Trigram::Thunder,
            0b011 => Trigram::Wind,
            0b010 => Trigram::Water,
            0b001 => Trigram::Mountain,
            _ => Trigram::Earth,
        }
    }
}

impl std::fmt::Display for TrigramCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:03b}", self.0)
    }
}

/// Error returned when a string is not a 3-character binary code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid trigram code {0:?}: expected exactly three '0'/'1' characters")]
pub struct ParseTrigramError(pub String);

impl FromStr for TrigramCode {
    type Err = ParseTrigramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 3 || !s.bytes().all(|b| b == b'0' || b == b'1') {
            return Err(ParseTrigramError(s.to_string()));
        }
        let bits = s
            .bytes()
            .fold(0u8, |acc, b| (acc << 1) | u8::from(b == b'1'));
        Ok(Self(bits))
    }
}

impl Serialize for TrigramCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TrigramCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ── Trigram Attributes ──────────────────────────────────────────────────

/// Yang (active) or yin (receptive) polarity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Yang,
    Yin,
}

/// The eight trigrams.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigram {
    Heaven,
    Lake,
    Fire,
    Thunder,
    Wind,
    Water,
    Mountain,
    Earth,
}

impl Trigram {
    pub fn code(self) -> TrigramCode {
        let bits = match self {
            Self::Heaven => 0b111,
            Self::Lake => 0b110,
            Self::Fire => 0b101,
            Self::Thunder => 0b100,
            Self::Wind => 0b011,
            Self::Water => 0b010,
            Self::Mountain => 0b001,
            Self::Earth => 0b000,
        };
        TrigramCode(bits)
    }

    /// Traditional name (pinyin).
    pub fn name(self) -> &'static str {
        match self {
            Self::Heaven => "Qian",
            Self::Lake => "Dui",
            Self::Fire => "Li",
            Self::Thunder => "Zhen",
            Self::Wind => "Xun",
            Self::Water => "Kan",
            Self::Mountain => "Gen",
            Self::Earth => "Kun",
        }
    }

    pub fn element(self) -> &'static str {
        match self {
            Self::Heaven => "heaven",
            Self::Lake => "lake",
            Self::Fire => "fire",
            Self::Thunder => "thunder",
            Self::Wind => "wind",
            Self::Water => "water",
            Self::Mountain => "mountain",
            Self::Earth => "earth",
        }
    }

    pub fn nature(self) -> &'static str {
        match self {
            Self::Heaven => "creative",
            Self::Lake => "joyful",
            Self::Fire => "clinging",
            Self::Thunder => "arousing",
            Self::Wind => "gentle",
            Self::Water => "abysmal",
            Self::Mountain => "keeping still",
            Self::Earth => "receptive",
        }
    }

    /// The four codes with a leading 1 bit are yang.
    pub fn polarity(self) -> Polarity {
        if self.code().bits() & 0b100 != 0 {
            Polarity::Yang
        } else {
            Polarity::Yin
        }
    }
}

// ── Encoder ─────────────────────────────────────────────────────────────

/// Which half of a hexagram a trigram occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    /// Outer trigram: expression, the social side.
    Upper,
    /// Inner trigram: foundation, the personal side.
    Lower,
}

/// Situational factors that nudge activations before encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextFactors {
    #[serde(default)]
    pub stress: bool,
    #[serde(default)]
    pub creativity: bool,
    #[serde(default)]
    pub social_pressure: bool,
}

/// Encodes activation values into trigram codes.
#[derive(Clone, Debug, Default)]
pub struct TrigramEncoder {
    config: EncodingConfig,
}

impl TrigramEncoder {
    pub fn new(config: EncodingConfig) -> Self {
        Self { config }
    }

    /// Encode a single activation value.
    ///
    /// The adjustment is bounded by `max_context_adjustment` (±0.3 by
    /// default), added to `value` and the sum clamped to `[0, 1]` before
    /// quantising into eight buckets. Upper trigrams step one bucket up above
    /// the upper bias threshold; lower trigrams step one bucket down below the
    /// lower bias threshold. Total for every input, including `NaN`.
    pub fn encode(&self, value: f64, position: Position, context_adjustment: f64) -> TrigramCode {
        let bound = self.config.max_context_adjustment;
        let adjustment = clamp_range(context_adjustment, -bound, bound);
        let v = clamp_unit(value + adjustment);
        let index = quantize(v, 8);

        let biased = match position {
            Position::Upper if v > self.config.upper_bias_threshold => (index + 1).min(7),
            Position::Lower if v < self.config.lower_bias_threshold => index.saturating_sub(1),
            _ => index,
        };
        TrigramCode(biased)
    }

    /// Activation of a profile for the given position.
    pub fn activation(&self, profile: &SubsystemProfile, position: Position) -> f64 {
        let weights = match position {
            Position::Upper => &self.config.upper_weights,
            Position::Lower => &self.config.lower_weights,
        };
        clamp_unit(weights.apply(profile))
    }

    /// Context adjustment for the given position, bounded like [`Self::encode`].
    pub fn context_adjustment(&self, context: &ContextFactors, position: Position) -> f64 {
        let effects = &self.config.context_effects;
        let pick = |shift: &ContextShift| match position {
            Position::Upper => shift.external,
            Position::Lower => shift.internal,
        };

        let mut adjustment = 0.0;
        if context.stress {
            adjustment += pick(&effects.stress);
        }
        if context.creativity {
            adjustment += pick(&effects.creativity);
        }
        if context.social_pressure {
            adjustment += pick(&effects.social_pressure);
        }
        let bound = self.config.max_context_adjustment;
        clamp_range(adjustment, -bound, bound)
    }

    /// Upper and lower trigram for one profile.
    pub fn encode_profile(
        &self,
        profile: &SubsystemProfile,
        context: &ContextFactors,
    ) -> (TrigramCode, TrigramCode) {
        let code = |position| {
            self.encode(
                self.activation(profile, position),
                position,
                self.context_adjustment(context, position),
            )
        };
        (code(Position::Upper), code(Position::Lower))
    }
}
