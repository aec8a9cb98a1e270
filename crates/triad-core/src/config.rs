//! Engine configuration.
//!
//! Every empirically chosen constant of the pipeline lives here: the
//! questionnaire partition, the choice scale, reference patterns, encoder
//! weights and biases, relationship bands, transition thresholds and the
//! history capacity. All sections deserialize with defaults so a partial
//! file only overrides what it names.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{PersonaError, PersonaResult};
use crate::types::{Choice, Subsystem, SubsystemProfile};

// ── Top Level ───────────────────────────────────────────────────────────

/// Complete configuration for a [`PersonaEngine`](crate::engine::PersonaEngine).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub questionnaire: QuestionnaireConfig,
    #[serde(default)]
    pub encoding: EncodingConfig,
    #[serde(default)]
    pub relationship: RelationshipConfig,
    #[serde(default)]
    pub transition: TransitionConfig,
    #[serde(default)]
    pub harmony: HarmonyConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

impl EngineConfig {
    /// Check the configuration for internal consistency.
    pub fn validate(&self) -> PersonaResult<()> {
        self.questionnaire.validate()?;
        self.encoding.validate()?;
        self.relationship.validate()?;
        self.transition.validate()?;
        self.harmony.validate()?;
        if self.history.capacity == 0 {
            return Err(config_error("history capacity must be at least 1"));
        }
        Ok(())
    }
}

fn config_error(message: impl Into<String>) -> PersonaError {
    PersonaError::Configuration(message.into())
}

fn ensure_unit(name: &str, value: f64) -> PersonaResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(config_error(format!("{name} must lie in [0, 1], got {value}")))
    }
}

// ── Questionnaire ───────────────────────────────────────────────────────

/// Questionnaire shape and scoring constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionnaireConfig {
    /// Exact number of answers an analysis requires.
    pub expected_answers: usize,
    /// Which question belongs to which subsystem.
    pub partition: PartitionTable,
    /// Scalar value of each choice.
    pub choice_scale: ChoiceScale,
    /// Reference patterns for the integration score.
    pub expected_patterns: ReferencePatterns,
    /// Denominator used for the flexibility score.
    pub flexibility_basis: FlexibilityBasis,
}

impl Default for QuestionnaireConfig {
    fn default() -> Self {
        Self {
            expected_answers: 30,
            partition: PartitionTable::default(),
            choice_scale: ChoiceScale::default(),
            expected_patterns: ReferencePatterns::default(),
            flexibility_basis: FlexibilityBasis::default(),
        }
    }
}

impl QuestionnaireConfig {
    fn validate(&self) -> PersonaResult<()> {
        let mut seen = HashSet::new();
        for subsystem in Subsystem::ALL {
            for &question in self.partition.questions(subsystem) {
                if !seen.insert(question) {
                    return Err(config_error(format!(
                        "question {question} is assigned to more than one subsystem"
                    )));
                }
            }
        }
        if seen.len() != self.expected_answers {
            return Err(config_error(format!(
                "partition covers {} questions but {} answers are expected",
                seen.len(),
                self.expected_answers
            )));
        }
        for choice in Choice::ALL {
            ensure_unit(&format!("choice {choice}"), self.choice_scale.value(choice))?;
        }
        for subsystem in Subsystem::ALL {
            for &value in self.expected_patterns.get(subsystem) {
                ensure_unit(&format!("{subsystem} reference pattern"), value)?;
            }
        }
        Ok(())
    }
}

/// Fixed 3-way partition of question ids.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionTable {
    pub engine: Vec<u32>,
    pub interface: Vec<u32>,
    pub safe_mode: Vec<u32>,
}

impl Default for PartitionTable {
    /// Questions interleave: 1, 4, 7 … engine; 2, 5, 8 … interface;
    /// 3, 6, 9 … safe mode.
    fn default() -> Self {
        Self {
            engine: (1..=30).step_by(3).collect(),
            interface: (2..=30).step_by(3).collect(),
            safe_mode: (3..=30).step_by(3).collect(),
        }
    }
}

impl PartitionTable {
    pub fn questions(&self, subsystem: Subsystem) -> &[u32] {
        match subsystem {
            Subsystem::Engine => &self.engine,
            Subsystem::Interface => &self.interface,
            Subsystem::SafeMode => &self.safe_mode,
        }
    }

    /// The subsystem a question belongs to, if any.
    pub fn subsystem_of(&self, question_id: u32) -> Option<Subsystem> {
        Subsystem::ALL
            .into_iter()
            .find(|s| self.questions(*s).contains(&question_id))
    }
}

/// Ordinal → scalar map for answer choices.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChoiceScale {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Default for ChoiceScale {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.75,
            c: 0.5,
            d: 0.25,
        }
    }
}

impl ChoiceScale {
    pub fn value(&self, choice: Choice) -> f64 {
        match choice {
            Choice::A => self.a,
            Choice::B => self.b,
            Choice::C => self.c,
            Choice::D => self.d,
        }
    }
}

/// Per-subsystem reference patterns used for the integration score.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReferencePatterns {
    pub engine: Vec<f64>,
    pub interface: Vec<f64>,
    pub safe_mode: Vec<f64>,
}

impl Default for ReferencePatterns {
    fn default() -> Self {
        Self {
            engine: vec![0.8, 0.9, 0.7, 0.8, 0.75, 0.85, 0.8, 0.9, 0.7, 0.8],
            interface: vec![0.6, 0.7, 0.8, 0.6, 0.75, 0.7, 0.6, 0.8, 0.7, 0.6],
            safe_mode: vec![0.5, 0.4, 0.6, 0.5, 0.45, 0.5, 0.4, 0.6, 0.5, 0.4],
        }
    }
}

impl ReferencePatterns {
    pub fn get(&self, subsystem: Subsystem) -> &[f64] {
        match subsystem {
            Subsystem::Engine => &self.engine,
            Subsystem::Interface => &self.interface,
            Subsystem::SafeMode => &self.safe_mode,
        }
    }
}

/// Denominator of the flexibility score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlexibilityBasis {
    /// Distinct choices divided by the total number of answers.
    #[default]
    Questionnaire,
    /// Distinct choices divided by the subsystem's own answer count.
    Subsystem,
}

// ── Encoding ────────────────────────────────────────────────────────────

/// Weights combining a profile's scores into one activation value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricWeights {
    pub strength: f64,
    pub consistency: f64,
    pub flexibility: f64,
    pub integration: f64,
}

impl MetricWeights {
    /// Weighted mean of the profile's scores. Zero total weight yields `0.0`.
    pub fn apply(&self, profile: &SubsystemProfile) -> f64 {
        let total = self.strength + self.consistency + self.flexibility + self.integration;
        if total <= 0.0 {
            return 0.0;
        }
        (profile.strength * self.strength
            + profile.consistency * self.consistency
            + profile.flexibility * self.flexibility
            + profile.integration * self.integration)
            / total
    }

    fn is_valid(&self) -> bool {
        let all = [self.strength, self.consistency, self.flexibility, self.integration];
        all.iter().all(|w| *w >= 0.0) && all.iter().sum::<f64>() > 0.0
    }
}

/// How one context factor shifts the outward (upper) and inward (lower)
/// activation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContextShift {
    pub external: f64,
    pub internal: f64,
}

/// Shifts applied for each active context factor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContextEffects {
    pub stress: ContextShift,
    pub creativity: ContextShift,
    pub social_pressure: ContextShift,
}

impl Default for ContextEffects {
    fn default() -> Self {
        Self {
            stress: ContextShift {
                external: 0.1,
                internal: -0.1,
            },
            creativity: ContextShift {
                external: 0.05,
                internal: 0.15,
            },
            social_pressure: ContextShift {
                external: 0.2,
                internal: -0.05,
            },
        }
    }
}

/// Largest context adjustment an encoder may apply in either direction.
pub const CONTEXT_ADJUSTMENT_LIMIT: f64 = 0.3;

/// Trigram encoder constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingConfig {
    /// Activation weights for the upper (outer) trigram.
    pub upper_weights: MetricWeights,
    /// Activation weights for the lower (inner) trigram.
    pub lower_weights: MetricWeights,
    /// Symmetric bound on the context adjustment, at most
    /// [`CONTEXT_ADJUSTMENT_LIMIT`].
    pub max_context_adjustment: f64,
    /// Upper trigrams step one bucket up above this value.
    pub upper_bias_threshold: f64,
    /// Lower trigrams step one bucket down below this value.
    pub lower_bias_threshold: f64,
    pub context_effects: ContextEffects,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            upper_weights: MetricWeights {
                strength: 0.6,
                consistency: 0.0,
                flexibility: 0.3,
                integration: 0.1,
            },
            lower_weights: MetricWeights {
                strength: 0.2,
                consistency: 0.5,
                flexibility: 0.0,
                integration: 0.3,
            },
            max_context_adjustment: CONTEXT_ADJUSTMENT_LIMIT,
            upper_bias_threshold: 0.6,
            lower_bias_threshold: 0.4,
            context_effects: ContextEffects::default(),
        }
    }
}

impl EncodingConfig {
    fn validate(&self) -> PersonaResult<()> {
        if !self.upper_weights.is_valid() || !self.lower_weights.is_valid() {
            return Err(config_error(
                "metric weights must be non-negative with a positive total",
            ));
        }
        if !(0.0..=CONTEXT_ADJUSTMENT_LIMIT).contains(&self.max_context_adjustment) {
            return Err(config_error(format!(
                "max_context_adjustment must lie in [0, {CONTEXT_ADJUSTMENT_LIMIT}], got {}",
                self.max_context_adjustment
            )));
        }
        ensure_unit("upper_bias_threshold", self.upper_bias_threshold)?;
        ensure_unit("lower_bias_threshold", self.lower_bias_threshold)?;
        Ok(())
    }
}

// ── Relationships ───────────────────────────────────────────────────────

/// Integration-level thresholds for the four balance tiers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BalanceThresholds {
    pub highly_balanced: f64,
    pub balanced: f64,
    pub adjusting: f64,
}

impl Default for BalanceThresholds {
    fn default() -> Self {
        Self {
            highly_balanced: 0.8,
            balanced: 0.6,
            adjusting: 0.4,
        }
    }
}

/// Distance bands and normalisers for relationship metrics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationshipConfig {
    /// `|Δid|` at or below this is adjacent.
    pub adjacent_max: u8,
    /// `|Δid|` at or above this is opposite.
    pub opposite_min: u8,
    /// `|Δid|` at or below this (and not adjacent) is complementary.
    pub complement_max: u8,
    /// Largest possible id distance; tension is `|Δid| / tension_normalizer`.
    pub tension_normalizer: f64,
    /// `K` in `integration = 1 - variance(ids) / K`.
    pub integration_normalizer: f64,
    pub balance: BalanceThresholds,
}

impl Default for RelationshipConfig {
    fn default() -> Self {
        Self {
            adjacent_max: 1,
            opposite_min: 32,
            complement_max: 8,
            tension_normalizer: 63.0,
            integration_normalizer: 1000.0 / 3.0,
            balance: BalanceThresholds::default(),
        }
    }
}

impl RelationshipConfig {
    fn validate(&self) -> PersonaResult<()> {
        if self.tension_normalizer <= 0.0 || self.integration_normalizer <= 0.0 {
            return Err(config_error("relationship normalizers must be positive"));
        }
        if !(self.adjacent_max <= self.complement_max && self.complement_max < self.opposite_min) {
            return Err(config_error(
                "relationship bands must satisfy adjacent_max <= complement_max < opposite_min",
            ));
        }
        let b = &self.balance;
        if !(b.highly_balanced >= b.balanced && b.balanced >= b.adjusting) {
            return Err(config_error("balance thresholds must be non-increasing"));
        }
        Ok(())
    }
}

// ── Transitions ─────────────────────────────────────────────────────────

/// A timeframe range in days.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeframeBounds {
    pub min: u32,
    pub max: u32,
}

/// Transition projector constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    /// `|Δid|` above this is cyclical.
    pub cyclical_delta: u8,
    /// `|Δid|` above this is sudden.
    pub sudden_delta: u8,
    /// `|Δid|` above this is transformative.
    pub transformative_delta: u8,
    /// Neighbouring ids considered on each side of the current id.
    pub neighbor_radius: u8,
    /// Probability is `1 - distance / distance_normalizer` before clamping.
    pub distance_normalizer: f64,
    pub probability_floor: f64,
    pub probability_ceiling: f64,
    /// Change patterns whose rate exceeds this use the sudden timeframe.
    pub sudden_rate_threshold: f64,
    pub sudden_timeframe: TimeframeBounds,
    pub gradual_timeframe: TimeframeBounds,
    /// Timeframes are scaled by `1 + stability * stability_scale`.
    pub stability_scale: f64,
    /// Subsystem `overall` above this counts as a triggering factor.
    pub trigger_threshold: f64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            cyclical_delta: 5,
            sudden_delta: 15,
            transformative_delta: 30,
            neighbor_radius: 2,
            distance_normalizer: 32.0,
            probability_floor: 0.1,
            probability_ceiling: 0.9,
            sudden_rate_threshold: 0.5,
            sudden_timeframe: TimeframeBounds { min: 1, max: 7 },
            gradual_timeframe: TimeframeBounds { min: 30, max: 90 },
            stability_scale: 0.5,
            trigger_threshold: 0.8,
        }
    }
}

impl TransitionConfig {
    fn validate(&self) -> PersonaResult<()> {
        if !(self.cyclical_delta <= self.sudden_delta
            && self.sudden_delta <= self.transformative_delta)
        {
            return Err(config_error(
                "change thresholds must satisfy cyclical <= sudden <= transformative",
            ));
        }
        if self.distance_normalizer <= 0.0 {
            return Err(config_error("distance_normalizer must be positive"));
        }
        ensure_unit("probability_floor", self.probability_floor)?;
        ensure_unit("probability_ceiling", self.probability_ceiling)?;
        if self.probability_floor > self.probability_ceiling {
            return Err(config_error("probability_floor exceeds probability_ceiling"));
        }
        for bounds in [self.sudden_timeframe, self.gradual_timeframe] {
            if bounds.min > bounds.max {
                return Err(config_error("timeframe min exceeds max"));
            }
        }
        if self.stability_scale < 0.0 {
            return Err(config_error("stability_scale must be non-negative"));
        }
        Ok(())
    }
}

// ── Harmony ─────────────────────────────────────────────────────────────

/// Constants for the harmony summary and activation balance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarmonyConfig {
    pub engine_weight: f64,
    pub interface_weight: f64,
    pub safe_mode_weight: f64,
    /// Harmony above this is flourishing.
    pub flourishing_threshold: f64,
    /// Harmony above this (and not flourishing) is steady.
    pub steady_threshold: f64,
}

impl Default for HarmonyConfig {
    fn default() -> Self {
        Self {
            engine_weight: 0.4,
            interface_weight: 0.35,
            safe_mode_weight: 0.25,
            flourishing_threshold: 0.8,
            steady_threshold: 0.6,
        }
    }
}

impl HarmonyConfig {
    fn validate(&self) -> PersonaResult<()> {
        let weights = [self.engine_weight, self.interface_weight, self.safe_mode_weight];
        if weights.iter().any(|w| *w < 0.0) {
            return Err(config_error("harmony weights must be non-negative"));
        }
        ensure_unit("flourishing_threshold", self.flourishing_threshold)?;
        ensure_unit("steady_threshold", self.steady_threshold)?;
        if self.steady_threshold > self.flourishing_threshold {
            return Err(config_error("steady_threshold exceeds flourishing_threshold"));
        }
        Ok(())
    }
}

// ── History ─────────────────────────────────────────────────────────────

/// Mapping history bounds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Ring-buffer capacity per session.
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { capacity: 50 }
    }
}
