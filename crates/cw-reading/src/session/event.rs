//! Triggers that drive a reading session.

use chrono::{DateTime, Utc};
use cw_core::SpreadDefinition;

/// Something the user did, or a collaborator reported back.
///
/// Collaborator events carry the generation of the session that requested
/// them so results arriving after a reset can be discarded.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The querent submitted their question.
    SubmitQuestion {
        /// Raw question text; surrounding whitespace is trimmed.
        question: String,
    },
    /// Keyword analysis finished (with fallback already substituted).
    KeywordsReady {
        /// Generation that requested the analysis.
        generation: u64,
        /// Summarized keywords.
        keywords: String,
    },
    /// A spread was chosen.
    ChooseSpread {
        /// The chosen spread definition.
        spread: SpreadDefinition,
    },
    /// The querent stopped the shuffle.
    StopShuffling,
    /// The querent cut the deck.
    CutDeck,
    /// A face-down slot was picked.
    SelectSlot {
        /// Zero-based slot index.
        slot: usize,
    },
    /// The next card was turned over.
    RevealCard {
        /// Zero-based index into the drawn cards.
        index: usize,
    },
    /// A narrative fragment arrived.
    NarrativeChunk {
        /// Generation that requested the narrative.
        generation: u64,
        /// Fragment text, appended verbatim.
        text: String,
    },
    /// The narrative stream ended normally.
    NarrativeFinished {
        /// Generation that requested the narrative.
        generation: u64,
    },
    /// The narrative stream failed.
    NarrativeFailed {
        /// Generation that requested the narrative.
        generation: u64,
        /// Text that replaces the accumulated interpretation.
        message: String,
    },
    /// The querent edited their reflection note.
    EditNote {
        /// Full replacement note text.
        text: String,
    },
    /// The querent asked to save the reading to the journal.
    Save {
        /// Creation time of the journal entry.
        at: DateTime<Utc>,
    },
    /// Start over with a fresh session.
    Reset,
}

impl Event {
    /// Short name used in logs and ignore reasons.
    pub fn name(&self) -> &'static str {
        match self {
            Event::SubmitQuestion { .. } => "submit_question",
            Event::KeywordsReady { .. } => "keywords_ready",
            Event::ChooseSpread { .. } => "choose_spread",
            Event::StopShuffling => "stop_shuffling",
            Event::CutDeck => "cut_deck",
            Event::SelectSlot { .. } => "select_slot",
            Event::RevealCard { .. } => "reveal_card",
            Event::NarrativeChunk { .. } => "narrative_chunk",
            Event::NarrativeFinished { .. } => "narrative_finished",
            Event::NarrativeFailed { .. } => "narrative_failed",
            Event::EditNote { .. } => "edit_note",
            Event::Save { .. } => "save",
            Event::Reset => "reset",
        }
    }

    /// The generation a collaborator event belongs to, if any.
    pub fn generation(&self) -> Option<u64> {
        match self {
            Event::KeywordsReady { generation, .. }
            | Event::NarrativeChunk { generation, .. }
            | Event::NarrativeFinished { generation }
            | Event::NarrativeFailed { generation, .. } => Some(*generation),
            _ => None,
        }
    }
}
