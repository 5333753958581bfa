//! Property-based tests for the session state machine.
//!
//! Random trigger sequences, including out-of-phase and stale ones, must never
//! break the session's structural guarantees.

use std::collections::HashSet;

use chrono::{TimeZone, Utc};
use cw_core::spread::shipped_spreads;
use cw_core::{Catalog, DrawnCard};
use proptest::prelude::*;

use super::*;
use crate::draw::Deck;

fn arb_event() -> impl Strategy<Value = Event> {
    let spreads = shipped_spreads();
    prop_oneof![
        "[ a-z]{0,12}".prop_map(|question| Event::SubmitQuestion { question }),
        (0u64..3, "[a-z, ]{0,10}").prop_map(|(generation, keywords)| Event::KeywordsReady {
            generation,
            keywords
        }),
        proptest::sample::select(spreads).prop_map(|spread| Event::ChooseSpread { spread }),
        Just(Event::StopShuffling),
        Just(Event::CutDeck),
        (0usize..25).prop_map(|slot| Event::SelectSlot { slot }),
        (0usize..11).prop_map(|index| Event::RevealCard { index }),
        (0u64..3, "[a-z]{0,6}").prop_map(|(generation, text)| Event::NarrativeChunk {
            generation,
            text
        }),
        (0u64..3).prop_map(|generation| Event::NarrativeFinished { generation }),
        (0u64..3).prop_map(|generation| Event::NarrativeFailed {
            generation,
            message: "offline".into()
        }),
        "[a-z ]{0,8}".prop_map(|text| Event::EditNote { text }),
        (1i64..1_000_000).prop_map(|ms| Event::Save {
            at: Utc.timestamp_millis_opt(ms).unwrap()
        }),
        Just(Event::Reset),
    ]
}

fn check_invariants(state: &SessionState) -> Result<(), TestCaseError> {
    let selection: HashSet<usize> = state.selection().iter().copied().collect();
    prop_assert_eq!(selection.len(), state.selection().len(), "duplicate slot");
    prop_assert!(state.selection().iter().all(|s| *s < state.deck_slots()));
    prop_assert!(state.selection().len() <= state.card_count());

    let ids: HashSet<u32> = state.drawn().iter().map(DrawnCard::id).collect();
    prop_assert_eq!(ids.len(), state.drawn().len(), "duplicate card");
    prop_assert!(state.revealed() <= state.drawn().len());

    match state.phase() {
        Phase::Revealing | Phase::Reading => {
            prop_assert_eq!(state.drawn().len(), state.card_count());
        }
        _ => prop_assert!(state.drawn().is_empty()),
    }
    if state.phase() == Phase::Reading {
        prop_assert_eq!(state.revealed(), state.card_count());
    }
    if state.has_saved() {
        prop_assert_eq!(state.phase(), Phase::Reading);
        prop_assert!(!state.narrative().is_loading());
    }
    if state.phase() == Phase::Welcome {
        prop_assert!(state.question().is_empty());
    }
    Ok(())
}

proptest! {
    #[test]
    fn invariants_hold_for_any_sequence(
        events in proptest::collection::vec(arb_event(), 0..80),
        seed in any::<u64>(),
    ) {
        let mut deck = Deck::new(Catalog::major_arcana(), 0.3, Some(seed));
        let mut state = SessionState::default();
        let mut saves = 0usize;
        for event in events {
            let before = state.clone();
            let draws_before = deck.draws_performed();
            let is_reveal = matches!(event, Event::RevealCard { .. });
            match transition(&state, event, &mut deck) {
                Ok(t) => {
                    prop_assert!(t.state.generation() >= before.generation());
                    let entered_revealing = before.phase() == Phase::Selecting
                        && t.state.phase() == Phase::Revealing;
                    prop_assert_eq!(
                        deck.draws_performed() - draws_before,
                        u64::from(entered_revealing)
                    );
                    if is_reveal {
                        prop_assert_eq!(t.state.revealed(), before.revealed() + 1);
                        let narrative_requested = t
                            .effects
                            .iter()
                            .any(|e| matches!(e, Effect::StreamNarrative { .. }));
                        prop_assert_eq!(narrative_requested, t.state.phase() == Phase::Reading);
                    }
                    saves += t
                        .effects
                        .iter()
                        .filter(|e| matches!(e, Effect::PersistJournal { .. }))
                        .count();
                    if t.state.generation() == before.generation() && before.has_saved() {
                        prop_assert!(t.state.has_saved());
                    }
                    state = t.state;
                }
                Err(_) => {
                    prop_assert_eq!(&state, &before);
                    prop_assert_eq!(deck.draws_performed(), draws_before);
                }
            }
            check_invariants(&state)?;
        }
        prop_assert!(saves as u64 <= state.generation() + 1);
    }

    #[test]
    fn reset_always_returns_to_welcome(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut deck = Deck::new(Catalog::major_arcana(), 0.3, Some(1));
        let mut state = SessionState::default();
        for event in events {
            if let Ok(t) = transition(&state, event, &mut deck) {
                state = t.state;
            }
        }
        let generation = state.generation();
        match transition(&state, Event::Reset, &mut deck) {
            Ok(t) => {
                prop_assert_eq!(t.state.phase(), Phase::Welcome);
                prop_assert_eq!(t.state.generation(), generation + 1);
                prop_assert!(t.effects.is_empty());
                prop_assert!(!t.state.has_saved());
            }
            Err(ignored) => {
                prop_assert_eq!(state.phase(), Phase::Welcome);
                prop_assert_eq!(
                    ignored,
                    Ignored::WrongPhase {
                        phase: Phase::Welcome,
                        event: "reset"
                    }
                );
            }
        }
    }
}
