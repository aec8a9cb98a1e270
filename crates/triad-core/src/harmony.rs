//! Profile-level harmony summary and weighted activation balance.

use serde::{Deserialize, Serialize};

use crate::config::HarmonyConfig;
use crate::numeric::{clamp_unit, mean, variance};
use crate::types::{Subsystem, SubsystemProfile, TripleProfile};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outlook {
    Flourishing,
    Steady,
    Strained,
}

/// How evenly the three subsystems are developed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SystemHarmony {
    /// Spread between the strongest and weakest `overall`.
    pub tension: f64,
    pub harmony: f64,
    pub integration: f64,
    pub flexibility: f64,
    /// Mean consistency.
    pub authenticity: f64,
    pub strongest: Subsystem,
    pub weakest: Subsystem,
    pub outlook: Outlook,
}

/// Weighted activation of the subsystems and their yang/yin split.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActivationBalance {
    pub dominant: Subsystem,
    pub balance_index: f64,
    pub yang: f64,
    pub yin: f64,
    /// `min(yang, yin) / max(yang, yin)`.
    pub polarity_balance: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HarmonyAnalyzer {
    config: HarmonyConfig,
}

impl HarmonyAnalyzer {
    pub fn new(config: HarmonyConfig) -> Self {
        Self { config }
    }

    pub fn harmony(&self, profiles: &TripleProfile) -> SystemHarmony {
        let tension = clamp_unit(
            profiles.get(profiles.strongest()).overall - profiles.get(profiles.weakest()).overall,
        );
        let harmony = 1.0 - tension;

        let average = |f: fn(&SubsystemProfile) -> f64| {
            clamp_unit(mean(&profiles.iter().map(f).collect::<Vec<_>>()))
        };

        let outlook = if harmony > self.config.flourishing_threshold {
            Outlook::Flourishing
        } else if harmony > self.config.steady_threshold {
            Outlook::Steady
        } else {
            Outlook::Strained
        };

        SystemHarmony {
            tension,
            harmony,
            integration: average(|p| p.integration),
            flexibility: average(|p| p.flexibility),
            authenticity: average(|p| p.consistency),
            strongest: profiles.strongest(),
            weakest: profiles.weakest(),
            outlook,
        }
    }

    pub fn balance(&self, profiles: &TripleProfile) -> ActivationBalance {
        let e = profiles.engine.overall;
        let i = profiles.interface.overall;
        let s = profiles.safe_mode.overall;

        let weighted = [
            e * self.config.engine_weight,
            i * self.config.interface_weight,
            s * self.config.safe_mode_weight,
        ];
        let balance_index = clamp_unit(1.0 - variance(&weighted).sqrt());

        let mut dominant = Subsystem::Engine;
        let mut best = weighted[0];
        for (subsystem, value) in Subsystem::ALL.into_iter().zip(weighted).skip(1) {
            if value > best {
                best = value;
                dominant = subsystem;
            }
        }

        let [we, wi, ws] = weighted;
        let raw_yang = we * 0.8 + wi * 0.6;
        let raw_yin = ws * 0.8 + wi * 0.4;
        let total = raw_yang + raw_yin;
        let (yang, yin, polarity_balance) = if total > 0.0 {
            let (yang, yin) = (raw_yang / total, raw_yin / total);
            (yang, yin, yang.min(yin) / yang.max(yin))
        } else {
            (0.5, 0.5, 1.0)
        };

        ActivationBalance {
            dominant,
            balance_index,
            yang,
            yin,
            polarity_balance,
        }
    }
}
