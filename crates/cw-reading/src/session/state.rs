//! Session state.

use std::fmt;

use cw_core::{DrawnCard, PositionedCard, SpreadDefinition};

use crate::draw::pair_with_positions;
use crate::oracle::NarrativeCard;

/// The step of the reading flow the querent is at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Waiting for a question.
    Welcome,
    /// Waiting for the keyword analyzer.
    Analyzing,
    /// Choosing a spread.
    SpreadSelection,
    /// The deck is being shuffled.
    Shuffling,
    /// Waiting for the cut.
    Cutting,
    /// Picking face-down slots.
    Selecting,
    /// Turning cards over one by one.
    Revealing,
    /// Interpretation, reflection, and saving.
    Reading,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::Welcome => "welcome",
            Phase::Analyzing => "analyzing",
            Phase::SpreadSelection => "spread selection",
            Phase::Shuffling => "shuffling",
            Phase::Cutting => "cutting",
            Phase::Selecting => "selecting",
            Phase::Revealing => "revealing",
            Phase::Reading => "reading",
        };
        write!(f, "{label}")
    }
}

/// Progress of the narrative stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NarrativeStatus {
    /// Not requested yet.
    #[default]
    Idle,
    /// Requested, nothing received.
    Pending,
    /// At least one fragment received.
    Streaming,
    /// Stream ended normally.
    Complete,
    /// Stream failed; the interpretation holds the failure message.
    Failed,
}

impl NarrativeStatus {
    /// Whether the narrator is still expected to send something.
    pub fn is_loading(self) -> bool {
        matches!(self, NarrativeStatus::Pending | NarrativeStatus::Streaming)
    }
}

/// Everything one reading session knows.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub(crate) phase: Phase,
    pub(crate) generation: u64,
    pub(crate) question: String,
    pub(crate) keywords: String,
    pub(crate) spread: Option<SpreadDefinition>,
    pub(crate) selection: Vec<usize>,
    pub(crate) drawn: Vec<DrawnCard>,
    pub(crate) revealed: usize,
    pub(crate) interpretation: String,
    pub(crate) narrative: NarrativeStatus,
    pub(crate) note: String,
    pub(crate) has_saved: bool,
    pub(crate) deck_slots: usize,
}

impl SessionState {
    /// A fresh session offering `deck_slots` face-down slots.
    pub fn new(deck_slots: usize) -> Self {
        Self::with_generation(deck_slots, 0)
    }

    fn with_generation(deck_slots: usize, generation: u64) -> Self {
        Self {
            phase: Phase::Welcome,
            generation,
            question: String::new(),
            keywords: String::new(),
            spread: None,
            selection: Vec::new(),
            drawn: Vec::new(),
            revealed: 0,
            interpretation: String::new(),
            narrative: NarrativeStatus::Idle,
            note: String::new(),
            has_saved: false,
            deck_slots,
        }
    }

    /// A fresh session in the next generation.
    pub fn reset(&self) -> Self {
        Self::with_generation(self.deck_slots, self.generation + 1)
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Incremented on every reset.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The trimmed question.
    pub fn question(&self) -> &str {
        &self.question
    }

    /// Summarized keywords, empty until analysis completes.
    pub fn keywords(&self) -> &str {
        &self.keywords
    }

    /// The chosen spread.
    pub fn spread(&self) -> Option<&SpreadDefinition> {
        self.spread.as_ref()
    }

    /// Selected slots in pick order.
    pub fn selection(&self) -> &[usize] {
        &self.selection
    }

    /// Drawn cards in position order.
    pub fn drawn(&self) -> &[DrawnCard] {
        &self.drawn
    }

    /// How many cards have been turned over.
    pub fn revealed(&self) -> usize {
        self.revealed
    }

    /// The accumulated interpretation.
    pub fn interpretation(&self) -> &str {
        &self.interpretation
    }

    /// Narrative stream progress.
    pub fn narrative(&self) -> NarrativeStatus {
        self.narrative
    }

    /// The querent's reflection note.
    pub fn note(&self) -> &str {
        &self.note
    }

    /// Whether this session was already saved.
    pub fn has_saved(&self) -> bool {
        self.has_saved
    }

    /// Number of face-down slots offered.
    pub fn deck_slots(&self) -> usize {
        self.deck_slots
    }

    /// Cards the chosen spread needs, zero before a spread is chosen.
    pub fn card_count(&self) -> usize {
        self.spread.as_ref().map_or(0, |s| s.card_count)
    }

    /// Drawn cards paired with position names.
    pub fn positioned_cards(&self) -> Vec<PositionedCard> {
        match &self.spread {
            Some(spread) => pair_with_positions(spread, &self.drawn),
            None => Vec::new(),
        }
    }

    /// Drawn cards with full position context for the narrator.
    pub fn narrative_cards(&self) -> Vec<NarrativeCard> {
        let Some(spread) = &self.spread else {
            return Vec::new();
        };
        spread
            .positions
            .iter()
            .zip(&self.drawn)
            .map(|(position, card)| NarrativeCard {
                position_name: position.name.clone(),
                position_description: position.description.clone(),
                card: card.clone(),
            })
            .collect()
    }

    /// Whether a collaborator result is still expected for this generation.
    pub fn is_awaiting_collaborator(&self) -> bool {
        self.phase == Phase::Analyzing || self.narrative.is_loading()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(cw_core::Catalog::major_arcana().len())
    }
}
