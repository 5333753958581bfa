//! The journal log and its exports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entry::JournalEntry;

/// Saved readings, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Journal {
    entries: Vec<JournalEntry>,
}

impl Journal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap entries that are already ordered most recent first.
    pub fn from_entries(entries: Vec<JournalEntry>) -> Self {
        Self { entries }
    }

    /// Put a new entry at the front.
    pub fn prepend(&mut self, entry: JournalEntry) {
        self.entries.insert(0, entry);
    }

    /// All entries, most recent first.
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Find an entry by id.
    pub fn get(&self, id: &str) -> Option<&JournalEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the journal is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A creation time no earlier than `now` and strictly after every stored
    /// entry, at millisecond precision. Keeps ids unique when saves land in
    /// the same millisecond.
    pub fn fresh_timestamp(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let newest = self
            .entries
            .iter()
            .map(|e| e.timestamp.timestamp_millis())
            .max();
        let now_ms = now.timestamp_millis();
        match newest {
            Some(ms) if ms >= now_ms => DateTime::from_timestamp_millis(ms + 1).unwrap_or(now),
            _ => DateTime::from_timestamp_millis(now_ms).unwrap_or(now),
        }
    }

    /// Export the journal as markdown.
    pub fn export_markdown(&self) -> String {
        let mut out = String::from("# Tarot Journal\n\n");
        for entry in &self.entries {
            out.push_str(&format!(
                "## {} ({})\n\n",
                entry.question,
                entry.timestamp.format("%Y-%m-%d %H:%M")
            ));
            out.push_str(&format!("**Spread**: {}\n\n", entry.spread_name));
            for pc in &entry.cards {
                out.push_str(&format!("- **{}**: {}\n", pc.position_name, pc.card));
            }
            out.push('\n');
            if !entry.interpretation.is_empty() {
                out.push_str(&entry.interpretation);
                out.push_str("\n\n");
            }
            if let Some(notes) = &entry.user_notes {
                for line in notes.lines() {
                    out.push_str(&format!("> {line}\n"));
                }
                out.push('\n');
            }
        }
        out
    }

    /// Export the journal as plain text.
    pub fn export_text(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&format!(
                "[{}] {}\n",
                entry.timestamp.format("%Y-%m-%d %H:%M"),
                entry.question
            ));
            out.push_str(&format!("  Spread: {}\n", entry.spread_name));
            for pc in &entry.cards {
                out.push_str(&format!("  {}: {}\n", pc.position_name, pc.card));
            }
            if let Some(notes) = &entry.user_notes {
                out.push_str(&format!("  Notes: {notes}\n"));
            }
            out.push('\n');
        }
        out
    }
}
