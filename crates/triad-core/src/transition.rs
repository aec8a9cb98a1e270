//! Transition projection: where the dominant hexagram is likely to move next.
//!
//! The projector compares the current dominant hexagram with the latest
//! history entry to classify the change, then proposes neighbouring ids and a
//! timeframe scaled by profile stability. It is total: every input yields a
//! projection.

use serde::{Deserialize, Serialize};

use crate::config::{TimeframeBounds, TransitionConfig};
use crate::history::MappingHistory;
use crate::numeric::{clamp_range, clamp_unit, mean};
use crate::resolver::{HexagramId, HexagramState, TripleHexagrams};
use crate::types::{Subsystem, TripleProfile};

// ── Change Pattern ──────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangePattern {
    Gradual,
    Sudden,
    Cyclical,
    Transformative,
}

impl ChangePattern {
    /// Relative speed of change.
    pub fn rate(self) -> f64 {
        match self {
            Self::Gradual => 0.1,
            Self::Sudden => 0.7,
            Self::Cyclical => 0.3,
            Self::Transformative => 0.9,
        }
    }

    /// How settled the state is after the change.
    pub fn stability(self) -> f64 {
        match self {
            Self::Gradual => 0.8,
            Self::Sudden => 0.2,
            Self::Cyclical => 0.6,
            Self::Transformative => 0.1,
        }
    }
}

// ── Projection ──────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProbableTransition {
    pub hexagram_id: HexagramId,
    pub probability: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Days,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeframe {
    pub min: u32,
    pub max: u32,
    pub unit: TimeUnit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TriggerFactor {
    CreativeSurge,
    SocialEngagement,
    DefensiveVigilance,
    NaturalRebalancing,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionProjection {
    pub change_pattern: ChangePattern,
    /// Mean consistency of the three profiles.
    pub stability: f64,
    pub probable_transitions: Vec<ProbableTransition>,
    pub estimated_timeframe: Timeframe,
    pub triggering_factors: Vec<TriggerFactor>,
}

/// Input to a projection: the current profiles and their hexagrams.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurrentState {
    pub profiles: TripleProfile,
    pub hexagrams: TripleHexagrams,
}

impl CurrentState {
    /// Subsystem with the largest `overall`; ties go to the earlier subsystem.
    pub fn dominant_subsystem(&self) -> Subsystem {
        self.profiles.strongest()
    }

    pub fn dominant(&self) -> &HexagramState {
        self.hexagrams.get(self.dominant_subsystem())
    }
}

// ── Projector ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct TransitionProjector {
    config: TransitionConfig,
}

impl TransitionProjector {
    pub fn new(config: TransitionConfig) -> Self {
        Self { config }
    }

    pub fn project(&self, current: &CurrentState, history: &MappingHistory) -> TransitionProjection {
        let stability = clamp_unit(mean(
            &current.profiles.iter().map(|p| p.consistency).collect::<Vec<_>>(),
        ));
        let dominant = current.dominant().id;
        let change_pattern = self.change_pattern(dominant, history);

        TransitionProjection {
            change_pattern,
            stability,
            probable_transitions: self.probable_transitions(dominant),
            estimated_timeframe: self.timeframe(change_pattern, stability),
            triggering_factors: self.triggering_factors(&current.profiles),
        }
    }

    pub fn change_pattern(&self, current: HexagramId, history: &MappingHistory) -> ChangePattern {
        let Some(latest) = history.latest() else {
            return ChangePattern::Gradual;
        };
        let delta = current.distance(latest.hexagram.id);
        if delta > self.config.transformative_delta {
            ChangePattern::Transformative
        } else if delta > self.config.sudden_delta {
            ChangePattern::Sudden
        } else if delta > self.config.cyclical_delta {
            ChangePattern::Cyclical
        } else {
            ChangePattern::Gradual
        }
    }

    /// Neighbours within the configured radius, nearest first.
    pub fn probable_transitions(&self, current: HexagramId) -> Vec<ProbableTransition> {
        let center = i16::from(current.get());
        let mut transitions = Vec::new();
        for distance in 1..=i16::from(self.config.neighbor_radius) {
            let probability = clamp_range(
                1.0 - f64::from(distance) / self.config.distance_normalizer,
                self.config.probability_floor,
                self.config.probability_ceiling,
            );
            for candidate in [center - distance, center + distance] {
                let id = u8::try_from(candidate).ok().and_then(HexagramId::new);
                if let Some(hexagram_id) = id {
                    transitions.push(ProbableTransition {
                        hexagram_id,
                        probability,
                    });
                }
            }
        }
        transitions
    }

    pub fn timeframe(&self, pattern: ChangePattern, stability: f64) -> Timeframe {
        let base: TimeframeBounds = if pattern.rate() > self.config.sudden_rate_threshold {
            self.config.sudden_timeframe
        } else {
            self.config.gradual_timeframe
        };
        let factor = 1.0 + clamp_unit(stability) * self.config.stability_scale;
        let scale = |days: u32| (f64::from(days) * factor).round() as u32;
        Timeframe {
            min: scale(base.min),
            max: scale(base.max),
            unit: TimeUnit::Days,
        }
    }

    pub fn triggering_factors(&self, profiles: &TripleProfile) -> Vec<TriggerFactor> {
        let threshold = self.config.trigger_threshold;
        let mut factors = Vec::new();
        if profiles.engine.overall > threshold {
            factors.push(TriggerFactor::CreativeSurge);
        }
        if profiles.interface.overall > threshold {
            factors.push(TriggerFactor::SocialEngagement);
        }
        if profiles.safe_mode.overall > threshold {
            factors.push(TriggerFactor::DefensiveVigilance);
        }
        if factors.is_empty() {
            factors.push(TriggerFactor::NaturalRebalancing);
        }
        factors
    }
}
