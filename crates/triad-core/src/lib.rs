//! Triad core: questionnaire answers → three subsystem hexagrams.
//!
//! A personality is modelled as three subsystems (engine, interface and
//! safe mode). Each is scored from its share of a fixed questionnaire, encoded
//! as a pair of trigrams, and resolved to one of 64 hexagrams. The three
//! hexagrams are then compared with each other, and against a caller-owned
//! history, to describe balance and likely transitions.
//!
//! # Pipeline
//!
//! ```text
//!  answers ──► AnswerScorer ──► TripleProfile
//!                                    │
//!                  ContextFactors ──►│ TrigramEncoder (upper, lower) × 3
//!                                    ▼
//!                             HexagramResolver ◄── SymbolicKnowledgeBase
//!                                    │
//!              ┌─────────────────────┼──────────────────────┐
//!              ▼                     ▼                      ▼
//!     RelationshipAnalyzer    HarmonyAnalyzer      TransitionProjector ◄── MappingHistory
//! ```
//!
//! [`PersonaEngine`] wires the stages together from one [`EngineConfig`].
//!
//! # Example
//!
//! ```
//! use triad_core::{AnswerRecord, Choice, EngineConfig, PartitionTable, PersonaEngine};
//!
//! let engine = PersonaEngine::new(EngineConfig::default()).unwrap();
//! let table = PartitionTable::default();
//! let answers: Vec<AnswerRecord> = (1..=30)
//!     .map(|q| AnswerRecord::new(q, Choice::B, table.subsystem_of(q).unwrap()))
//!     .collect();
//!
//! let analysis = engine.analyze(&answers).unwrap();
//! let mut history = engine.new_history();
//! let projection = engine.project_transition(&analysis.current_state(), &mut history);
//! assert_eq!(history.len(), 1);
//! assert!(!projection.probable_transitions.is_empty());
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod engine;
pub mod error;
pub mod harmony;
pub mod history;
pub mod knowledge;
pub mod numeric;
pub mod relationship;
pub mod resolver;
pub mod scoring;
pub mod transition;
pub mod trigram;
pub mod types;

pub use config::{
    ChoiceScale, ContextEffects, ContextShift, EncodingConfig, EngineConfig, FlexibilityBasis,
    HarmonyConfig, HistoryConfig, MetricWeights, PartitionTable, QuestionnaireConfig,
    ReferencePatterns, RelationshipConfig, TimeframeBounds, TransitionConfig,
};
pub use engine::{Analysis, PersonaEngine};
pub use error::{PersonaError, PersonaResult, ValidationError};
pub use harmony::{ActivationBalance, HarmonyAnalyzer, Outlook, SystemHarmony};
pub use history::{HistoryEntry, HistoryStore, MappingHistory};
pub use knowledge::{HexagramRecord, KnowledgeLookup, StaticKnowledgeBase, SymbolicKnowledgeBase};
pub use relationship::{
    BalanceLabel, PairPattern, PairRelationship, RelationshipAnalyzer, RelationshipSet,
    TripleRelationship,
};
pub use resolver::{HexagramId, HexagramResolver, HexagramState, KnowledgeStatus, TripleHexagrams};
pub use scoring::AnswerScorer;
pub use transition::{
    ChangePattern, CurrentState, ProbableTransition, Timeframe, TimeUnit, TransitionProjection,
    TransitionProjector, TriggerFactor,
};
pub use trigram::{
    ContextFactors, ParseTrigramError, Polarity, Position, Trigram, TrigramCode, TrigramEncoder,
};
pub use types::{
    AnswerRecord, Choice, RawAnswer, SessionId, Subsystem, SubsystemProfile, TripleProfile,
};
