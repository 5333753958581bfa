//! Side effects requested by session transitions.

use crate::journal::JournalEntry;
use crate::oracle::NarrativeRequest;

/// Work the runtime must perform after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Ask the keyword analyzer to summarize the question.
    AnalyzeQuestion {
        /// Generation to stamp on the result.
        generation: u64,
        /// The trimmed question.
        question: String,
    },
    /// Ask the narrator to stream an interpretation.
    StreamNarrative {
        /// Generation to stamp on every fragment.
        generation: u64,
        /// Question, spread, and cards to interpret.
        request: NarrativeRequest,
    },
    /// Prepend the entry to the journal and persist it.
    PersistJournal {
        /// The assembled entry.
        entry: JournalEntry,
    },
}
