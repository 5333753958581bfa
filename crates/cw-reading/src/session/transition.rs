//! The session transition function.

use thiserror::Error;

use cw_core::CoreError;

use super::{Effect, Event, NarrativeStatus, Phase, SessionState};
use crate::draw::Deck;
use crate::journal::JournalEntry;
use crate::oracle::NarrativeRequest;

/// Result of an accepted trigger.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// The state after the trigger.
    pub state: SessionState,
    /// Work the runtime must perform.
    pub effects: Vec<Effect>,
}

impl Transition {
    /// A transition with no effects.
    pub fn new(state: SessionState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    /// Add an effect.
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Why a trigger was dropped. The state is untouched in every case.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Ignored {
    /// The trigger has no meaning in the current phase.
    #[error("{event} is not accepted during {phase}")]
    WrongPhase {
        /// Current phase.
        phase: Phase,
        /// Name of the rejected event.
        event: &'static str,
    },
    /// The question was empty after trimming.
    #[error("question is empty")]
    EmptyQuestion,
    /// The spread cannot be dealt from this deck.
    #[error("spread rejected: {0}")]
    InvalidSpread(CoreError),
    /// The slot was already picked.
    #[error("slot {0} is already selected")]
    SlotTaken(usize),
    /// The slot does not exist.
    #[error("slot {slot} is out of range (deck has {slots} slots)")]
    SlotOutOfRange {
        /// Requested slot.
        slot: usize,
        /// Number of slots offered.
        slots: usize,
    },
    /// Every position already has a card.
    #[error("all {0} cards are already selected")]
    SelectionFull(usize),
    /// Cards must be revealed in position order.
    #[error("card {requested} cannot be revealed before card {next}")]
    OutOfOrder {
        /// Requested index.
        requested: usize,
        /// Index that must be revealed next.
        next: usize,
    },
    /// A collaborator result from an abandoned session.
    #[error("{event} belongs to an earlier session (current generation {current})")]
    StaleGeneration {
        /// Name of the stale event.
        event: &'static str,
        /// Current generation.
        current: u64,
    },
    /// The narrative stream already ended.
    #[error("the narrative is no longer streaming")]
    NarrativeClosed,
    /// This session was already saved.
    #[error("this reading was already saved")]
    AlreadySaved,
    /// The interpretation is still arriving.
    #[error("the interpretation is still arriving")]
    NarrativeInProgress,
    /// The finished interpretation is empty.
    #[error("nothing to save yet")]
    NothingToSave,
}

/// Apply one trigger to a session.
///
/// Only the final slot pick touches the deck; every other trigger is a pure
/// function of `state` and `event`.
pub fn transition(
    state: &SessionState,
    event: Event,
    deck: &mut Deck,
) -> Result<Transition, Ignored> {
    if event.generation().is_some_and(|g| g != state.generation) {
        return Err(Ignored::StaleGeneration {
            event: event.name(),
            current: state.generation,
        });
    }

    match (state.phase, event) {
        (Phase::Welcome, Event::SubmitQuestion { question }) => {
            let question = question.trim();
            if question.is_empty() {
                return Err(Ignored::EmptyQuestion);
            }
            let mut next = state.clone();
            next.phase = Phase::Analyzing;
            next.question = question.to_string();
            Ok(Transition::new(next).with_effect(Effect::AnalyzeQuestion {
                generation: state.generation,
                question: question.to_string(),
            }))
        }

        (Phase::Analyzing, Event::KeywordsReady { keywords, .. }) => {
            let mut next = state.clone();
            next.phase = Phase::SpreadSelection;
            next.keywords = keywords;
            Ok(Transition::new(next))
        }

        (Phase::SpreadSelection, Event::ChooseSpread { spread }) => {
            spread
                .validate_against(deck.len().min(state.deck_slots))
                .map_err(Ignored::InvalidSpread)?;
            let mut next = state.clone();
            next.phase = Phase::Shuffling;
            next.spread = Some(spread);
            Ok(Transition::new(next))
        }

        (Phase::Shuffling, Event::StopShuffling) => {
            let mut next = state.clone();
            next.phase = Phase::Cutting;
            Ok(Transition::new(next))
        }

        (Phase::Cutting, Event::CutDeck) => {
            let mut next = state.clone();
            next.phase = Phase::Selecting;
            next.selection.clear();
            Ok(Transition::new(next))
        }

        (Phase::Selecting, Event::SelectSlot { slot }) => select_slot(state, slot, deck),

        (Phase::Revealing, Event::RevealCard { index }) => reveal_card(state, index),

        (Phase::Reading, Event::NarrativeChunk { text, .. }) => {
            if !state.narrative.is_loading() {
                return Err(Ignored::NarrativeClosed);
            }
            let mut next = state.clone();
            next.interpretation.push_str(&text);
            next.narrative = NarrativeStatus::Streaming;
            Ok(Transition::new(next))
        }

        (Phase::Reading, Event::NarrativeFinished { .. }) => {
            if !state.narrative.is_loading() {
                return Err(Ignored::NarrativeClosed);
            }
            let mut next = state.clone();
            next.narrative = NarrativeStatus::Complete;
            Ok(Transition::new(next))
        }

        (Phase::Reading, Event::NarrativeFailed { message, .. }) => {
            if !state.narrative.is_loading() {
                return Err(Ignored::NarrativeClosed);
            }
            let mut next = state.clone();
            next.interpretation = message;
            next.narrative = NarrativeStatus::Failed;
            Ok(Transition::new(next))
        }

        (Phase::Reading, Event::EditNote { text }) => {
            if state.has_saved {
                return Err(Ignored::AlreadySaved);
            }
            let mut next = state.clone();
            next.note = text;
            Ok(Transition::new(next))
        }

        (Phase::Reading, Event::Save { at }) => {
            if state.has_saved {
                return Err(Ignored::AlreadySaved);
            }
            if state.narrative.is_loading() {
                return Err(Ignored::NarrativeInProgress);
            }
            if state.interpretation.trim().is_empty() {
                return Err(Ignored::NothingToSave);
            }
            let entry = JournalEntry::assemble(state, at);
            let mut next = state.clone();
            next.has_saved = true;
            Ok(Transition::new(next).with_effect(Effect::PersistJournal { entry }))
        }

        (phase, Event::Reset) if phase != Phase::Welcome => Ok(Transition::new(state.reset())),

        (phase, event) => Err(Ignored::WrongPhase {
            phase,
            event: event.name(),
        }),
    }
}

fn select_slot(state: &SessionState, slot: usize, deck: &mut Deck) -> Result<Transition, Ignored> {
    if slot >= state.deck_slots {
        return Err(Ignored::SlotOutOfRange {
            slot,
            slots: state.deck_slots,
        });
    }
    if state.selection.contains(&slot) {
        return Err(Ignored::SlotTaken(slot));
    }
    let needed = state.card_count();
    if state.selection.len() >= needed {
        return Err(Ignored::SelectionFull(needed));
    }

    let mut next = state.clone();
    next.selection.push(slot);
    if next.selection.len() == needed {
        next.drawn = deck.draw(needed).map_err(Ignored::InvalidSpread)?;
        next.revealed = 0;
        next.phase = Phase::Revealing;
    }
    Ok(Transition::new(next))
}

fn reveal_card(state: &SessionState, index: usize) -> Result<Transition, Ignored> {
    if index != state.revealed {
        return Err(Ignored::OutOfOrder {
            requested: index,
            next: state.revealed,
        });
    }

    let mut next = state.clone();
    next.revealed += 1;
    if next.revealed < next.drawn.len() {
        return Ok(Transition::new(next));
    }

    next.phase = Phase::Reading;
    next.narrative = NarrativeStatus::Pending;
    next.interpretation.clear();
    let spread_name = next.spread.as_ref().map(|s| s.name.clone());
    let request = NarrativeRequest {
        question: next.question.clone(),
        spread_name: spread_name.unwrap_or_default(),
        cards: next.narrative_cards(),
    };
    Ok(Transition::new(next).with_effect(Effect::StreamNarrative {
        generation: state.generation,
        request,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use cw_core::Catalog;
    use cw_core::spread::find_spread;

    fn deck() -> Deck {
        Deck::new(Catalog::major_arcana(), 0.3, Some(17))
    }

    fn apply(state: &SessionState, event: Event, deck: &mut Deck) -> Transition {
        transition(state, event, deck).unwrap()
    }

    fn rejected(state: &SessionState, event: Event, deck: &mut Deck) -> Ignored {
        transition(state, event, deck).unwrap_err()
    }

    fn ask(question: &str) -> Event {
        Event::SubmitQuestion {
            question: question.into(),
        }
    }

    fn keywords(generation: u64, keywords: &str) -> Event {
        Event::KeywordsReady {
            generation,
            keywords: keywords.into(),
        }
    }

    fn chunk(text: &str) -> Event {
        Event::NarrativeChunk {
            generation: 0,
            text: text.into(),
        }
    }

    fn note(text: &str) -> Event {
        Event::EditNote { text: text.into() }
    }

    /// Drive a fresh session up to the start of card selection.
    fn at_selecting(spread_id: &str, deck: &mut Deck) -> SessionState {
        let s = SessionState::default();
        let s = apply(&s, ask("  career outlook "), deck).state;
        let s = apply(&s, keywords(0, "career, outlook"), deck).state;
        let spread = find_spread(spread_id).unwrap();
        let s = apply(&s, Event::ChooseSpread { spread }, deck).state;
        let s = apply(&s, Event::StopShuffling, deck).state;
        apply(&s, Event::CutDeck, deck).state
    }

    fn at_reading(spread_id: &str, deck: &mut Deck) -> (SessionState, Vec<Effect>) {
        let mut s = at_selecting(spread_id, deck);
        for slot in 0..s.card_count() {
            s = apply(&s, Event::SelectSlot { slot }, deck).state;
        }
        let mut effects = Vec::new();
        for index in 0..s.card_count() {
            let t = apply(&s, Event::RevealCard { index }, deck);
            s = t.state;
            effects = t.effects;
        }
        (s, effects)
    }

    fn at(ms: i64) -> chrono::DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    #[test]
    fn question_is_trimmed_and_analyzed() {
        let mut d = deck();
        let t = apply(&SessionState::default(), ask("  career outlook "), &mut d);
        assert_eq!(t.state.phase(), Phase::Analyzing);
        assert_eq!(t.state.question(), "career outlook");
        let expected = Effect::AnalyzeQuestion {
            generation: 0,
            question: "career outlook".into(),
        };
        assert_eq!(t.effects, vec![expected]);
    }

    #[test]
    fn blank_question_ignored() {
        let mut d = deck();
        let err = rejected(&SessionState::default(), ask(" \n\t"), &mut d);
        assert_eq!(err, Ignored::EmptyQuestion);
    }

    #[test]
    fn oversized_spread_rejected() {
        let mut d = deck();
        let mut s = SessionState::default();
        s.phase = Phase::SpreadSelection;
        let mut spread = find_spread("celtic_cross").unwrap();
        spread.card_count = 30;
        spread.positions = (0..30)
            .map(|i| cw_core::Position::new(format!("p{i}"), "x", "x", 0.0, 0.0))
            .collect();
        let err = rejected(&s, Event::ChooseSpread { spread }, &mut d);
        assert!(matches!(
            err,
            Ignored::InvalidSpread(CoreError::SpreadExceedsCatalog { .. })
        ));
    }

    #[test]
    fn selection_guards() {
        let mut d = deck();
        let s = at_selecting("three_card", &mut d);
        let s = apply(&s, Event::SelectSlot { slot: 4 }, &mut d).state;
        let err = rejected(&s, Event::SelectSlot { slot: 4 }, &mut d);
        assert_eq!(err, Ignored::SlotTaken(4));
        let err = rejected(&s, Event::SelectSlot { slot: 22 }, &mut d);
        assert_eq!(
            err,
            Ignored::SlotOutOfRange {
                slot: 22,
                slots: 22
            }
        );
        assert_eq!(s.phase(), Phase::Selecting);
        assert_eq!(d.draws_performed(), 0);
    }

    #[test]
    fn completing_selection_draws_once() {
        let mut d = deck();
        let mut s = at_selecting("three_card", &mut d);
        for slot in [9, 2, 15] {
            s = apply(&s, Event::SelectSlot { slot }, &mut d).state;
        }
        assert_eq!(s.phase(), Phase::Revealing);
        assert_eq!(s.selection(), &[9, 2, 15]);
        assert_eq!(s.drawn().len(), 3);
        assert_eq!(d.draws_performed(), 1);
    }

    #[test]
    fn reveal_must_be_in_order() {
        let mut d = deck();
        let mut s = at_selecting("three_card", &mut d);
        for slot in 0..3 {
            s = apply(&s, Event::SelectSlot { slot }, &mut d).state;
        }
        let err = rejected(&s, Event::RevealCard { index: 1 }, &mut d);
        assert_eq!(
            err,
            Ignored::OutOfOrder {
                requested: 1,
                next: 0
            }
        );
        let s = apply(&s, Event::RevealCard { index: 0 }, &mut d).state;
        assert_eq!(s.revealed(), 1);
        let err = rejected(&s, Event::RevealCard { index: 0 }, &mut d);
        assert_eq!(
            err,
            Ignored::OutOfOrder {
                requested: 0,
                next: 1
            }
        );
    }

    #[test]
    fn last_reveal_requests_narrative() {
        let mut d = deck();
        let (s, effects) = at_reading("three_card", &mut d);
        assert_eq!(s.phase(), Phase::Reading);
        assert_eq!(s.narrative(), NarrativeStatus::Pending);
        let [Effect::StreamNarrative { request, .. }] = effects.as_slice() else {
            panic!("expected one narrative effect, got {effects:?}");
        };
        assert!(matches!(effects[0], Effect::StreamNarrative { generation: 0, .. }));
        assert_eq!(request.question, "career outlook");
        assert_eq!(request.spread_name, "圣三角 (时间流)");
        let positions: Vec<&str> = request
            .cards
            .iter()
            .map(|c| c.position_name.as_str())
            .collect();
        assert_eq!(positions, vec!["过去", "现在", "未来"]);
        assert_eq!(request.cards[0].card, s.drawn()[0]);
    }

    #[test]
    fn chunks_append_then_finish() {
        let mut d = deck();
        let (s, _) = at_reading("single", &mut d);
        let s = apply(&s, chunk("**单张"), &mut d).state;
        assert_eq!(s.narrative(), NarrativeStatus::Streaming);
        let s = apply(&s, chunk("分析**"), &mut d).state;
        assert_eq!(s.interpretation(), "**单张分析**");
        let s = apply(&s, Event::NarrativeFinished { generation: 0 }, &mut d).state;
        assert_eq!(s.narrative(), NarrativeStatus::Complete);
        let err = rejected(&s, chunk("late"), &mut d);
        assert_eq!(err, Ignored::NarrativeClosed);
    }

    #[test]
    fn failure_replaces_text() {
        let mut d = deck();
        let (s, _) = at_reading("single", &mut d);
        let s = apply(&s, chunk("partial"), &mut d).state;
        let failed = Event::NarrativeFailed {
            generation: 0,
            message: "宇宙连接中断，请稍后重试...".into(),
        };
        let s = apply(&s, failed, &mut d).state;
        assert_eq!(s.interpretation(), "宇宙连接中断，请稍后重试...");
        assert_eq!(s.narrative(), NarrativeStatus::Failed);
        assert!(!s.is_awaiting_collaborator());
    }

    #[test]
    fn save_waits_for_the_narrative_to_end() {
        let mut d = deck();
        let (s, _) = at_reading("single", &mut d);
        let err = rejected(&s, Event::Save { at: at(1) }, &mut d);
        assert_eq!(err, Ignored::NarrativeInProgress);

        let s = apply(&s, chunk("partial"), &mut d).state;
        let err = rejected(&s, Event::Save { at: at(1) }, &mut d);
        assert_eq!(err, Ignored::NarrativeInProgress);
        assert!(!s.has_saved());

        let done = apply(&s, Event::NarrativeFinished { generation: 0 }, &mut d).state;
        let t = apply(&done, Event::Save { at: at(1) }, &mut d);
        assert!(t.state.has_saved());

        let failed = Event::NarrativeFailed {
            generation: 0,
            message: "offline".into(),
        };
        let failed = apply(&s, failed, &mut d).state;
        let t = apply(&failed, Event::Save { at: at(2) }, &mut d);
        assert_eq!(t.effects.len(), 1);
    }

    #[test]
    fn empty_narrative_has_nothing_to_save() {
        let mut d = deck();
        let (s, _) = at_reading("single", &mut d);
        let s = apply(&s, Event::NarrativeFinished { generation: 0 }, &mut d).state;
        let err = rejected(&s, Event::Save { at: at(1) }, &mut d);
        assert_eq!(err, Ignored::NothingToSave);
    }

    #[test]
    fn save_only_once() {
        let mut d = deck();
        let (s, _) = at_reading("single", &mut d);
        let s = apply(&s, chunk("reading"), &mut d).state;
        let s = apply(&s, Event::NarrativeFinished { generation: 0 }, &mut d).state;
        let s = apply(&s, note("felt right"), &mut d).state;
        let saved_at = at(1_700_000_000_000);
        let t = apply(&s, Event::Save { at: saved_at }, &mut d);
        assert!(t.state.has_saved());
        let [Effect::PersistJournal { entry }] = t.effects.as_slice() else {
            panic!("expected persist effect");
        };
        assert_eq!(entry.id, "1700000000000");
        assert_eq!(entry.question, "career outlook");
        assert_eq!(entry.spread_name, "每日指引 (单张)");
        assert_eq!(entry.cards.len(), 1);
        assert_eq!(entry.cards[0].position_name, "核心指引");
        assert_eq!(entry.interpretation, "reading");
        assert_eq!(entry.user_notes.as_deref(), Some("felt right"));

        let s = t.state;
        let err = rejected(&s, Event::Save { at: at(2) }, &mut d);
        assert_eq!(err, Ignored::AlreadySaved);
        assert_eq!(rejected(&s, note("more"), &mut d), Ignored::AlreadySaved);
    }

    #[test]
    fn reset_bumps_generation_and_drops_stale_events() {
        let mut d = deck();
        let s = apply(&SessionState::default(), ask("q"), &mut d).state;
        let s = apply(&s, Event::Reset, &mut d).state;
        assert_eq!(s.phase(), Phase::Welcome);
        assert_eq!(s.generation(), 1);
        assert!(s.question().is_empty());
        let err = rejected(&s, keywords(0, "late"), &mut d);
        assert_eq!(
            err,
            Ignored::StaleGeneration {
                event: "keywords_ready",
                current: 1
            }
        );
    }

    #[test]
    fn reset_in_welcome_ignored() {
        let mut d = deck();
        let err = rejected(&SessionState::default(), Event::Reset, &mut d);
        assert_eq!(
            err,
            Ignored::WrongPhase {
                phase: Phase::Welcome,
                event: "reset"
            }
        );
    }

    #[test]
    fn wrong_phase_triggers_ignored() {
        let mut d = deck();
        let s = SessionState::default();
        let events = [
            Event::StopShuffling,
            Event::CutDeck,
            Event::SelectSlot { slot: 0 },
            Event::RevealCard { index: 0 },
        ];
        for event in events {
            assert!(matches!(
                transition(&s, event, &mut d),
                Err(Ignored::WrongPhase { .. })
            ));
        }
    }
}
