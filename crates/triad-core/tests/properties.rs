//! Property tests: scoring, encoding, resolution and projection invariants.

use proptest::prelude::*;
use triad_core::resolver::{decode, hexagram_id};
use triad_core::*;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

fn arb_choice() -> impl Strategy<Value = Choice> {
    prop_oneof![
        Just(Choice::A),
        Just(Choice::B),
        Just(Choice::C),
        Just(Choice::D),
    ]
}

/// A complete, valid answer set for the default questionnaire.
fn arb_answers() -> impl Strategy<Value = Vec<AnswerRecord>> {
    prop::collection::vec(arb_choice(), 30).prop_map(|choices| {
        let table = PartitionTable::default();
        choices
            .into_iter()
            .zip(1u32..)
            .map(|(choice, q)| {
                let subsystem = table.subsystem_of(q).expect("default partition covers 1..=30");
                AnswerRecord::new(q, choice, subsystem)
            })
            .collect()
    })
}

fn arb_code() -> impl Strategy<Value = TrigramCode> {
    (0u8..8).prop_map(|bits| TrigramCode::from_bits(bits).expect("bits below 8"))
}

fn arb_id() -> impl Strategy<Value = HexagramId> {
    (1u8..=64).prop_map(|n| HexagramId::new(n).expect("id in range"))
}

fn arb_position() -> impl Strategy<Value = Position> {
    prop_oneof![Just(Position::Upper), Just(Position::Lower)]
}

fn arb_context() -> impl Strategy<Value = ContextFactors> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(stress, creativity, social_pressure)| {
        ContextFactors {
            stress,
            creativity,
            social_pressure,
        }
    })
}

fn in_unit(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Every profile score stays inside the unit interval.
    #[test]
    fn profile_scores_in_unit_range(answers in arb_answers()) {
        let profiles = AnswerScorer::default().score(&answers).unwrap();
        for p in profiles.iter() {
            prop_assert!(in_unit(p.strength));
            prop_assert!(in_unit(p.consistency));
            prop_assert!(in_unit(p.flexibility));
            prop_assert!(in_unit(p.integration));
            prop_assert!(in_unit(p.overall));
        }
    }

    /// The same answers and context always produce the same analysis.
    #[test]
    fn analysis_is_deterministic(answers in arb_answers(), context in arb_context()) {
        let engine = PersonaEngine::new(EngineConfig::default()).unwrap();
        let first = engine.analyze_with_context(&answers, &context).unwrap();
        let second = engine.analyze_with_context(&answers, &context).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Analysis outputs stay in range for any valid input.
    #[test]
    fn analysis_outputs_in_range(answers in arb_answers(), context in arb_context()) {
        let engine = PersonaEngine::new(EngineConfig::default()).unwrap();
        let analysis = engine.analyze_with_context(&answers, &context).unwrap();

        for pair in [
            analysis.relationships.engine_interface,
            analysis.relationships.engine_safe_mode,
            analysis.relationships.interface_safe_mode,
        ] {
            prop_assert!(in_unit(pair.tension));
            prop_assert!((pair.tension + pair.harmony - 1.0).abs() < 1e-12);
        }
        prop_assert!(in_unit(analysis.relationships.triple.integration_level));
        prop_assert!(in_unit(analysis.harmony.harmony));
        prop_assert!(in_unit(analysis.balance.balance_index));
        prop_assert!(in_unit(analysis.balance.polarity_balance));
        prop_assert!((analysis.balance.yang + analysis.balance.yin - 1.0).abs() < 1e-9);
    }

    /// Raising one answer to the best choice never lowers its subsystem's strength.
    #[test]
    fn strength_is_monotonic(answers in arb_answers(), index in 0usize..30) {
        let scorer = AnswerScorer::default();
        let before = scorer.score(&answers).unwrap();

        let mut improved = answers.clone();
        improved[index].selected_value = Choice::A;
        let after = scorer.score(&improved).unwrap();

        let subsystem = answers[index].subsystem;
        prop_assert!(after.get(subsystem).strength >= before.get(subsystem).strength);
    }

    /// The encoder returns a valid code for any float, NaN and infinities included.
    #[test]
    fn encoder_is_total(value in any::<f64>(), adjustment in any::<f64>(), position in arb_position()) {
        let code = TrigramEncoder::default().encode(value, position, adjustment);
        prop_assert!(code.bits() < 8);
        prop_assert_eq!(code.to_string().len(), 3);
    }

    /// A larger activation never yields a smaller code.
    #[test]
    fn encoder_is_monotonic(
        a in 0.0f64..=1.0,
        b in 0.0f64..=1.0,
        adjustment in -0.3f64..=0.3,
        position in arb_position(),
    ) {
        let encoder = TrigramEncoder::default();
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let low_code = encoder.encode(low, position, adjustment);
        let high_code = encoder.encode(high, position, adjustment);
        prop_assert!(low_code.bits() <= high_code.bits());
    }

    /// Trigram pairs and hexagram ids convert in both directions without loss.
    #[test]
    fn resolution_is_invertible(upper in arb_code(), lower in arb_code()) {
        let id = hexagram_id(upper, lower);
        prop_assert!((1..=64).contains(&id.get()));
        prop_assert_eq!(decode(id), (upper, lower));
    }

    /// Decoding then re-encoding an id is the identity.
    #[test]
    fn ids_round_trip(id in arb_id()) {
        let (upper, lower) = decode(id);
        prop_assert_eq!(hexagram_id(upper, lower), id);
    }

    /// Probable transitions are valid ids, bounded, and ordered by probability.
    #[test]
    fn transitions_are_ordered(id in arb_id(), radius in 0u8..12) {
        let config = TransitionConfig { neighbor_radius: radius, ..Default::default() };
        let projector = TransitionProjector::new(config);
        let transitions = projector.probable_transitions(id);

        prop_assert!(transitions.len() <= usize::from(radius) * 2);
        for t in &transitions {
            prop_assert!((0.1..=0.9).contains(&t.probability));
            prop_assert_ne!(t.hexagram_id, id);
        }
        for pair in transitions.windows(2) {
            prop_assert!(pair[0].probability >= pair[1].probability);
            prop_assert!(pair[0].hexagram_id.distance(id) <= pair[1].hexagram_id.distance(id));
        }
    }

    /// Projections stay in range whether or not a prior analysis is in history.
    #[test]
    fn projection_is_bounded(
        first in arb_answers(),
        second in arb_answers(),
        context in arb_context(),
        seeded in any::<bool>(),
    ) {
        let engine = PersonaEngine::new(EngineConfig::default()).unwrap();
        let mut history = engine.new_history();
        if seeded {
            let prior = engine.analyze_with_context(&first, &context).unwrap();
            engine.project_transition(&prior.current_state(), &mut history);
        }

        let analysis = engine.analyze_with_context(&second, &context).unwrap();
        let projection = engine.project_transition(&analysis.current_state(), &mut history);

        prop_assert!(in_unit(projection.stability));
        prop_assert!(projection.estimated_timeframe.min <= projection.estimated_timeframe.max);
        prop_assert!(projection.estimated_timeframe.min >= 1);
        prop_assert!(!projection.triggering_factors.is_empty());
        prop_assert_eq!(history.len(), if seeded { 2 } else { 1 });
    }

    /// History never grows beyond its capacity and keeps the newest entry.
    #[test]
    fn history_respects_capacity(ids in prop::collection::vec(arb_id(), 1..40), capacity in 1usize..10) {
        let resolver: HexagramResolver = HexagramResolver::default();
        let mut history = MappingHistory::with_capacity(capacity);
        for id in &ids {
            history.append(HistoryEntry::now(resolver.state(*id)));
        }
        prop_assert_eq!(history.len(), ids.len().min(capacity));
        prop_assert_eq!(history.latest().map(|e| e.hexagram.id), ids.last().copied());
    }
}
