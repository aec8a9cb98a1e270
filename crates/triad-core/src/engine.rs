//! The persona engine: answers in, analysis and projections out.
//!
//! [`PersonaEngine`] owns one instance of every pipeline stage, built from a
//! validated [`EngineConfig`]. It holds no mutable state; histories are owned
//! by the caller or by a [`HistoryStore`], so one engine can be shared across
//! threads.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::EngineConfig;
use crate::error::PersonaResult;
use crate::harmony::{ActivationBalance, HarmonyAnalyzer, SystemHarmony};
use crate::history::{HistoryEntry, HistoryStore, MappingHistory};
use crate::knowledge::{StaticKnowledgeBase, SymbolicKnowledgeBase};
use crate::relationship::{RelationshipAnalyzer, RelationshipSet};
use crate::resolver::{HexagramResolver, TripleHexagrams};
use crate::scoring::AnswerScorer;
use crate::transition::{CurrentState, TransitionProjection, TransitionProjector};
use crate::trigram::{ContextFactors, TrigramEncoder};
use crate::types::{AnswerRecord, RawAnswer, SessionId, SubsystemProfile, TripleProfile};

/// Full result of one analysis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub profiles: TripleProfile,
    pub hexagrams: TripleHexagrams,
    pub relationships: RelationshipSet,
    pub harmony: SystemHarmony,
    pub balance: ActivationBalance,
}

impl Analysis {
    /// The part of the analysis a transition projection needs.
    pub fn current_state(&self) -> CurrentState {
        CurrentState {
            profiles: self.profiles.clone(),
            hexagrams: self.hexagrams.clone(),
        }
    }
}

pub struct PersonaEngine<K: SymbolicKnowledgeBase = StaticKnowledgeBase> {
    config: EngineConfig,
    scorer: AnswerScorer,
    encoder: TrigramEncoder,
    resolver: HexagramResolver<K>,
    relationships: RelationshipAnalyzer,
    harmony: HarmonyAnalyzer,
    projector: TransitionProjector,
}

impl PersonaEngine {
    /// Engine backed by the canonical 64-entry knowledge base.
    pub fn new(config: EngineConfig) -> PersonaResult<Self> {
        Self::with_knowledge_base(config, Arc::new(StaticKnowledgeBase::canonical()))
    }
}

impl<K: SymbolicKnowledgeBase> PersonaEngine<K> {
    pub fn with_knowledge_base(config: EngineConfig, knowledge: Arc<K>) -> PersonaResult<Self> {
        config.validate()?;
        Ok(Self {
            scorer: AnswerScorer::new(config.questionnaire.clone()),
            encoder: TrigramEncoder::new(config.encoding.clone()),
            resolver: HexagramResolver::new(knowledge),
            relationships: RelationshipAnalyzer::new(config.relationship.clone()),
            harmony: HarmonyAnalyzer::new(config.harmony.clone()),
            projector: TransitionProjector::new(config.transition.clone()),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn resolver(&self) -> &HexagramResolver<K> {
        &self.resolver
    }

    /// An empty history sized from the configuration.
    pub fn new_history(&self) -> MappingHistory {
        MappingHistory::with_capacity(self.config.history.capacity)
    }

    /// A session store sized from the configuration.
    pub fn new_history_store(&self) -> HistoryStore {
        HistoryStore::new(self.config.history.capacity)
    }

    pub fn analyze(&self, answers: &[AnswerRecord]) -> PersonaResult<Analysis> {
        self.analyze_with_context(answers, &ContextFactors::default())
    }

    pub fn analyze_with_context(
        &self,
        answers: &[AnswerRecord],
        context: &ContextFactors,
    ) -> PersonaResult<Analysis> {
        let profiles = self.scorer.score(answers)?;
        Ok(self.analyze_profiles(profiles, context))
    }

    /// Like [`Self::analyze_with_context`], converting untyped answers first.
    pub fn analyze_raw(
        &self,
        answers: &[RawAnswer],
        context: &ContextFactors,
    ) -> PersonaResult<Analysis> {
        let profiles = self.scorer.score_raw(answers)?;
        Ok(self.analyze_profiles(profiles, context))
    }

    fn analyze_profiles(&self, profiles: TripleProfile, context: &ContextFactors) -> Analysis {
        let hexagram = |profile: &SubsystemProfile| {
            let (upper, lower) = self.encoder.encode_profile(profile, context);
            self.resolver.resolve(upper, lower)
        };
        let hexagrams = TripleHexagrams {
            engine: hexagram(&profiles.engine),
            interface: hexagram(&profiles.interface),
            safe_mode: hexagram(&profiles.safe_mode),
        };
        let relationships = self.relationships.analyze(&hexagrams);
        let harmony = self.harmony.harmony(&profiles);
        let balance = self.harmony.balance(&profiles);

        info!(
            engine = %hexagrams.engine.id,
            interface = %hexagrams.interface.id,
            safe_mode = %hexagrams.safe_mode.id,
            integration = relationships.triple.integration_level,
            "Analysis complete"
        );

        Analysis {
            profiles,
            hexagrams,
            relationships,
            harmony,
            balance,
        }
    }

    /// Project from `current`, then record its dominant hexagram.
    pub fn project_transition(
        &self,
        current: &CurrentState,
        history: &mut MappingHistory,
    ) -> TransitionProjection {
        let projection = self.projector.project(current, history);
        history.append(HistoryEntry::now(current.dominant().clone()));

        info!(
            dominant = %current.dominant().id,
            pattern = ?projection.change_pattern,
            history_len = history.len(),
            "Transition projected"
        );
        projection
    }

    /// [`Self::project_transition`] against a session held in `store`.
    pub fn project_for_session(
        &self,
        store: &HistoryStore,
        session: &SessionId,
        current: &CurrentState,
    ) -> TransitionProjection {
        store.with_session(session, |history| self.project_transition(current, history))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PersonaError;
    use crate::resolver::KnowledgeStatus;
    use crate::scoring::tests::answers_with;
    use crate::transition::ChangePattern;
    use crate::types::Choice;

    #[test]
    fn rejects_invalid_config() {
        let mut config = EngineConfig::default();
        config.history.capacity = 0;
        assert!(matches!(
            PersonaEngine::new(config),
            Err(PersonaError::Configuration(_))
        ));
    }

    #[test]
    fn analyze_all_best() {
        let engine = PersonaEngine::new(EngineConfig::default()).unwrap();
        let analysis = engine.analyze(&answers_with(|_| Choice::A)).unwrap();
        assert_eq!(analysis.profiles.engine.strength, 1.0);
        assert!(analysis.hexagrams.engine.is_known());
        let profiles = &analysis.profiles;
        let spread = profiles.get(profiles.strongest()).overall
            - profiles.get(profiles.weakest()).overall;
        assert!((analysis.harmony.tension - spread).abs() < 1e-12);
        assert!(analysis.harmony.tension > 0.0);
    }

    #[test]
    fn analyze_propagates_validation() {
        let engine = PersonaEngine::new(EngineConfig::default()).unwrap();
        let mut answers = answers_with(|_| Choice::B);
        answers.truncate(10);
        assert!(matches!(
            engine.analyze(&answers),
            Err(PersonaError::Validation(_))
        ));
    }

    #[test]
    fn context_changes_upper_trigram() {
        let engine = PersonaEngine::new(EngineConfig::default()).unwrap();
        let answers = answers_with(|_| Choice::C);
        let plain = engine.analyze(&answers).unwrap();
        let pressured = engine
            .analyze_with_context(
                &answers,
                &ContextFactors {
                    social_pressure: true,
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(
            pressured.hexagrams.engine.upper_trigram.bits()
                >= plain.hexagrams.engine.upper_trigram.bits()
        );
        assert_eq!(pressured.profiles, plain.profiles);
    }

    #[test]
    fn projection_appends_history() {
        let engine = PersonaEngine::new(EngineConfig::default()).unwrap();
        let analysis = engine.analyze(&answers_with(|q| Choice::ALL[(q % 4) as usize])).unwrap();
        let current = analysis.current_state();
        let mut history = engine.new_history();

        let first = engine.project_transition(&current, &mut history);
        assert_eq!(first.change_pattern, ChangePattern::Gradual);
        assert_eq!(history.len(), 1);
        assert_eq!(history.latest().unwrap().hexagram, *current.dominant());

        // same state again: zero distance
        let second = engine.project_transition(&current, &mut history);
        assert_eq!(second.change_pattern, ChangePattern::Gradual);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn session_projection_uses_store() {
        let engine = PersonaEngine::new(EngineConfig::default()).unwrap();
        let analysis = engine.analyze(&answers_with(|_| Choice::D)).unwrap();
        let store = engine.new_history_store();
        let session = SessionId::new();

        engine.project_for_session(&store, &session, &analysis.current_state());
        engine.project_for_session(&store, &session, &analysis.current_state());
        assert_eq!(store.snapshot(&session).unwrap().len(), 2);
    }

    #[test]
    fn partial_knowledge_base_degrades() {
        let engine =
            PersonaEngine::with_knowledge_base(EngineConfig::default(), Arc::new(StaticKnowledgeBase::default()))
                .unwrap();
        let analysis = engine.analyze(&answers_with(|_| Choice::A)).unwrap();
        assert_eq!(analysis.hexagrams.engine.knowledge, KnowledgeStatus::Unknown);
        assert_eq!(analysis.hexagrams.engine.name, "unknown");
    }

    #[test]
    fn analysis_serializes() {
        let engine = PersonaEngine::new(EngineConfig::default()).unwrap();
        let analysis = engine.analyze(&answers_with(|_| Choice::B)).unwrap();
        let json = serde_json::to_value(&analysis).unwrap();
        assert!(json["hexagrams"]["engine"]["upper_trigram"].is_string());
        assert!(json["relationships"]["triple"]["balance"].is_string());
    }
}
