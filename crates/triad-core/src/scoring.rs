//! Answer scoring: questionnaire answers → three subsystem profiles.
//!
//! Scoring is a pure function of the answers and the questionnaire
//! configuration. Validation runs to completion before any score is
//! computed, so a rejected answer set never produces a partial profile.

use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use crate::config::{FlexibilityBasis, QuestionnaireConfig};
use crate::error::ValidationError;
use crate::numeric::{clamp_unit, mean, variance};
use crate::types::{AnswerRecord, RawAnswer, Subsystem, SubsystemProfile, TripleProfile};

/// Converts a validated answer set into a [`TripleProfile`].
#[derive(Clone, Debug, Default)]
pub struct AnswerScorer {
    config: QuestionnaireConfig,
}

impl AnswerScorer {
    pub fn new(config: QuestionnaireConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &QuestionnaireConfig {
        &self.config
    }

    /// Validate the answers, then score each subsystem.
    pub fn score(&self, answers: &[AnswerRecord]) -> Result<TripleProfile, ValidationError> {
        self.validate(answers)?;

        let profile = |subsystem| self.score_subsystem(subsystem, answers);
        Ok(TripleProfile {
            engine: profile(Subsystem::Engine),
            interface: profile(Subsystem::Interface),
            safe_mode: profile(Subsystem::SafeMode),
        })
    }

    /// Convert untyped answers, then score them.
    pub fn score_raw(&self, answers: &[RawAnswer]) -> Result<TripleProfile, ValidationError> {
        let records = answers
            .iter()
            .map(AnswerRecord::from_raw)
            .collect::<Result<Vec<_>, _>>()?;
        self.score(&records)
    }

    /// Check count, partition membership, tag agreement and uniqueness.
    pub fn validate(&self, answers: &[AnswerRecord]) -> Result<(), ValidationError> {
        if answers.len() != self.config.expected_answers {
            return Err(ValidationError::WrongAnswerCount {
                expected: self.config.expected_answers,
                actual: answers.len(),
            });
        }

        let mut seen = HashSet::with_capacity(answers.len());
        for answer in answers {
            let expected = self
                .config
                .partition
                .subsystem_of(answer.question_id)
                .ok_or(ValidationError::UnknownQuestion {
                    question_id: answer.question_id,
                })?;
            if expected != answer.subsystem {
                return Err(ValidationError::SubsystemMismatch {
                    question_id: answer.question_id,
                    expected,
                    actual: answer.subsystem,
                });
            }
            if !seen.insert(answer.question_id) {
                return Err(ValidationError::DuplicateQuestion {
                    question_id: answer.question_id,
                });
            }
        }
        Ok(())
    }

    fn score_subsystem(&self, subsystem: Subsystem, answers: &[AnswerRecord]) -> SubsystemProfile {
        let mut records: Vec<&AnswerRecord> =
            answers.iter().filter(|a| a.subsystem == subsystem).collect();
        if records.is_empty() {
            debug!(%subsystem, "No answers for subsystem, scoring as empty");
            return SubsystemProfile::empty(subsystem);
        }
        records.sort_by_key(|a| a.question_id);

        let scale = &self.config.choice_scale;
        let values: Vec<f64> = records
            .iter()
            .map(|a| clamp_unit(scale.value(a.selected_value)))
            .collect();

        let strength = clamp_unit(mean(&values));
        let consistency = clamp_unit(1.0 - variance(&values));

        let distinct = records
            .iter()
            .map(|a| a.selected_value)
            .collect::<BTreeSet<_>>()
            .len();
        let denominator = match self.config.flexibility_basis {
            FlexibilityBasis::Questionnaire => answers.len(),
            FlexibilityBasis::Subsystem => records.len(),
        };
        let flexibility = clamp_unit(distinct as f64 / denominator as f64);

        let integration = integration_score(self.config.expected_patterns.get(subsystem), &values);
        let overall = clamp_unit(mean(&[strength, consistency, flexibility, integration]));

        debug!(
            %subsystem,
            answers = records.len(),
            strength,
            consistency,
            flexibility,
            integration,
            overall,
            "Scored subsystem"
        );

        SubsystemProfile {
            subsystem,
            strength,
            consistency,
            flexibility,
            integration,
            overall,
        }
    }
}

/// Positional agreement between a reference pattern and the actual values.
///
/// Pairs are compared up to the shorter length; the sum is divided by the
/// longer length so a length mismatch counts against the score.
fn integration_score(expected: &[f64], actual: &[f64]) -> f64 {
    let longest = expected.len().max(actual.len());
    if longest == 0 {
        return 0.0;
    }
    let matched: f64 = expected
        .iter()
        .zip(actual)
        .map(|(e, a)| clamp_unit(1.0 - (e - a).abs()))
        .sum();
    clamp_unit(matched / longest as f64)
}
