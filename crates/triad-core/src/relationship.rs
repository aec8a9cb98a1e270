//! Pairwise and three-way relationships between subsystem hexagrams.

use serde::{Deserialize, Serialize};

use crate::config::RelationshipConfig;
use crate::numeric::{clamp_unit, variance};
use crate::resolver::{HexagramState, TripleHexagrams};
use crate::types::Subsystem;

/// Classification of the id distance between two hexagrams.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairPattern {
    Adjacent,
    Opposite,
    Complement,
    Transform,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PairRelationship {
    /// `|Δid| / 63`, in `[0, 1]`.
    pub tension: f64,
    pub harmony: f64,
    pub pattern: PairPattern,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BalanceLabel {
    HighlyBalanced,
    Balanced,
    Adjusting,
    Imbalanced,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TripleRelationship {
    pub integration_level: f64,
    /// Subsystem whose hexagram has the largest id.
    pub dominant_subsystem: Subsystem,
    pub balance: BalanceLabel,
}

/// All pairwise relationships plus the three-way summary.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelationshipSet {
    pub engine_interface: PairRelationship,
    pub engine_safe_mode: PairRelationship,
    pub interface_safe_mode: PairRelationship,
    pub triple: TripleRelationship,
}

#[derive(Clone, Debug, Default)]
pub struct RelationshipAnalyzer {
    config: RelationshipConfig,
}

impl RelationshipAnalyzer {
    pub fn new(config: RelationshipConfig) -> Self {
        Self { config }
    }

    pub fn analyze_pair(&self, a: &HexagramState, b: &HexagramState) -> PairRelationship {
        let delta = a.id.distance(b.id);
        let tension = clamp_unit(f64::from(delta) / self.config.tension_normalizer);

        // checked in this order: adjacent, opposite, complement
        let pattern = if delta <= self.config.adjacent_max {
            PairPattern::Adjacent
        } else if delta >= self.config.opposite_min {
            PairPattern::Opposite
        } else if delta <= self.config.complement_max {
            PairPattern::Complement
        } else {
            PairPattern::Transform
        };

        PairRelationship {
            tension,
            harmony: 1.0 - tension,
            pattern,
        }
    }

    pub fn analyze_triple(
        &self,
        engine: &HexagramState,
        interface: &HexagramState,
        safe_mode: &HexagramState,
    ) -> TripleRelationship {
        let ids = [engine.id, interface.id, safe_mode.id];
        let values = ids.map(|id| f64::from(id.get()));
        let integration_level =
            clamp_unit(1.0 - variance(&values) / self.config.integration_normalizer);

        // first maximum wins, so ties go to the earlier subsystem
        let mut dominant_subsystem = Subsystem::Engine;
        let mut best = ids[0];
        for (subsystem, id) in Subsystem::ALL.into_iter().zip(ids).skip(1) {
            if id > best {
                best = id;
                dominant_subsystem = subsystem;
            }
        }

        TripleRelationship {
            integration_level,
            dominant_subsystem,
            balance: self.balance_label(integration_level),
        }
    }

    pub fn analyze(&self, hexagrams: &TripleHexagrams) -> RelationshipSet {
        RelationshipSet {
            engine_interface: self.analyze_pair(&hexagrams.engine, &hexagrams.interface),
            engine_safe_mode: self.analyze_pair(&hexagrams.engine, &hexagrams.safe_mode),
            interface_safe_mode: self.analyze_pair(&hexagrams.interface, &hexagrams.safe_mode),
            triple: self.analyze_triple(&hexagrams.engine, &hexagrams.interface, &hexagrams.safe_mode),
        }
    }

    fn balance_label(&self, integration_level: f64) -> BalanceLabel {
        let thresholds = &self.config.balance;
        if integration_level > thresholds.highly_balanced {
            BalanceLabel::HighlyBalanced
        } else if integration_level > thresholds.balanced {
            BalanceLabel::Balanced
        } else if integration_level > thresholds.adjusting {
            BalanceLabel::Adjusting
        } else {
            BalanceLabel::Imbalanced
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{HexagramId, HexagramResolver};

    fn state(id: u8) -> HexagramState {
        let resolver: HexagramResolver = HexagramResolver::default();
        resolver.state(HexagramId::new(id).unwrap())
    }

    #[test]
    fn adjacent_ids() {
        let analyzer = RelationshipAnalyzer::default();
        let rel = analyzer.analyze_pair(&state(5), &state(6));
        assert_eq!(rel.pattern, PairPattern::Adjacent);
        assert!((rel.tension - 1.0 / 63.0).abs() < 1e-12);
        assert!((rel.harmony - 62.0 / 63.0).abs() < 1e-12);
    }

    #[test]
    fn pattern_thresholds() {
        let analyzer = RelationshipAnalyzer::default();
        let pattern = |a, b| analyzer.analyze_pair(&state(a), &state(b)).pattern;

        assert_eq!(pattern(10, 10), PairPattern::Adjacent);
        assert_eq!(pattern(1, 33), PairPattern::Opposite);
        assert_eq!(pattern(64, 1), PairPattern::Opposite);
        assert_eq!(pattern(1, 9), PairPattern::Complement);
        assert_eq!(pattern(1, 3), PairPattern::Complement);
        assert_eq!(pattern(1, 10), PairPattern::Transform);
        assert_eq!(pattern(1, 32), PairPattern::Transform);
    }

    #[test]
    fn extreme_tension_is_one() {
        let analyzer = RelationshipAnalyzer::default();
        let rel = analyzer.analyze_pair(&state(1), &state(64));
        assert_eq!(rel.tension, 1.0);
        assert_eq!(rel.harmony, 0.0);
    }

    #[test]
    fn identical_triple_is_highly_balanced() {
        let analyzer = RelationshipAnalyzer::default();
        let rel = analyzer.analyze_triple(&state(20), &state(20), &state(20));
        assert_eq!(rel.integration_level, 1.0);
        assert_eq!(rel.balance, BalanceLabel::HighlyBalanced);
        // all tied: first subsystem wins
        assert_eq!(rel.dominant_subsystem, Subsystem::Engine);
    }

    #[test]
    fn spread_triple() {
        let analyzer = RelationshipAnalyzer::default();
        // mean 21, squared deviations 400 + 0 + 400, population variance 800/3
        let rel = analyzer.analyze_triple(&state(1), &state(21), &state(41));
        assert!((rel.integration_level - 0.2).abs() < 1e-9);
        assert_eq!(rel.balance, BalanceLabel::Imbalanced);
        assert_eq!(rel.dominant_subsystem, Subsystem::SafeMode);

        let rel = analyzer.analyze_triple(&state(10), &state(30), &state(30));
        assert_eq!(rel.dominant_subsystem, Subsystem::Interface);

        let rel = analyzer.analyze_triple(&state(1), &state(64), &state(1));
        assert_eq!(rel.integration_level, 0.0);
    }

    #[test]
    fn balance_tiers() {
        let analyzer = RelationshipAnalyzer::default();
        assert_eq!(analyzer.balance_label(0.81), BalanceLabel::HighlyBalanced);
        assert_eq!(analyzer.balance_label(0.8), BalanceLabel::Balanced);
        assert_eq!(analyzer.balance_label(0.5), BalanceLabel::Adjusting);
        assert_eq!(analyzer.balance_label(0.4), BalanceLabel::Imbalanced);
    }

    #[test]
    fn analyze_covers_every_pair() {
        let analyzer = RelationshipAnalyzer::default();
        let hexagrams = TripleHexagrams {
            engine: state(5),
            interface: state(6),
            safe_mode: state(50),
        };
        let set = analyzer.analyze(&hexagrams);
        assert_eq!(set.engine_interface.pattern, PairPattern::Adjacent);
        assert_eq!(set.engine_safe_mode.pattern, PairPattern::Opposite);
        assert_eq!(set.interface_safe_mode.pattern, PairPattern::Opposite);
        assert_eq!(set.triple.dominant_subsystem, Subsystem::SafeMode);
        assert_eq!(
            serde_json::to_value(set.triple.balance).unwrap(),
            serde_json::json!("imbalanced")
        );
    }

    #[test]
    fn balance_label_kebab_case() {
        assert_eq!(
            serde_json::to_value(BalanceLabel::HighlyBalanced).unwrap(),
            serde_json::json!("highly-balanced")
        );
    }
}
