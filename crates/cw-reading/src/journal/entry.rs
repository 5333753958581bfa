//! Journal entries.

use chrono::{DateTime, Utc};
use cw_core::PositionedCard;
use serde::{Deserialize, Serialize};

use crate::session::SessionState;

/// A saved reading.
///
/// Serialized with the field names of the journal blob (`spreadName`,
/// `userNotes`, millisecond `timestamp`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    /// Creation time in milliseconds, as a decimal string.
    pub id: String,
    /// Creation time.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    /// The question asked.
    pub question: String,
    /// Display name of the spread used.
    pub spread_name: String,
    /// Cards with their position names, in position order.
    pub cards: Vec<PositionedCard>,
    /// The interpretation text as it stood when saved.
    pub interpretation: String,
    /// The querent's reflection, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_notes: Option<String>,
}

impl JournalEntry {
    /// Snapshot a session into an entry created at `at`.
    pub fn assemble(state: &SessionState, at: DateTime<Utc>) -> Self {
        let note = state.note().trim();
        Self {
            id: at.timestamp_millis().to_string(),
            timestamp: at,
            question: state.question().to_string(),
            spread_name: state.spread().map(|s| s.name.clone()).unwrap_or_default(),
            cards: state.positioned_cards(),
            interpretation: state.interpretation().to_string(),
            user_notes: (!note.is_empty()).then(|| state.note().to_string()),
        }
    }

    /// Whether any card in the entry came up reversed.
    pub fn has_reversals(&self) -> bool {
        self.cards.iter().any(|c| c.card.is_reversed)
    }
}
