//! Archetypes and the cards a draw produces.
//!
//! Field names on the wire follow the journal blob format (`name_cn`,
//! `meaningUpright`, `isReversed`, ...), so journals written by earlier
//! front-ends load unchanged.

use serde::{Deserialize, Serialize};

/// One canonical card concept, independent of orientation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Archetype {
    /// Catalog index, unique within the catalog.
    pub id: u32,
    /// Canonical (English) name.
    pub name: String,
    /// Localized (Chinese) name.
    #[serde(rename = "name_cn")]
    pub name_localized: String,
    /// Short thematic label.
    #[serde(rename = "archetype")]
    pub theme: String,
    /// Meaning when drawn upright.
    #[serde(rename = "meaningUpright")]
    pub meaning_upright: String,
    /// Meaning when drawn reversed.
    #[serde(rename = "meaningReversed")]
    pub meaning_reversed: String,
}

/// An archetype bound to an orientation by the draw engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawnCard {
    /// The drawn archetype.
    #[serde(flatten)]
    pub archetype: Archetype,
    /// Whether the card came up reversed.
    #[serde(rename = "isReversed")]
    pub is_reversed: bool,
}

impl DrawnCard {
    /// Bind an archetype to an orientation.
    pub fn new(archetype: Archetype, is_reversed: bool) -> Self {
        Self {
            archetype,
            is_reversed,
        }
    }

    /// The archetype id.
    pub fn id(&self) -> u32 {
        self.archetype.id
    }

    /// The meaning that applies to this orientation.
    pub fn meaning(&self) -> &str {
        if self.is_reversed {
            &self.archetype.meaning_reversed
        } else {
            &self.archetype.meaning_upright
        }
    }

    /// Bilingual orientation label.
    pub fn orientation_label(&self) -> &'static str {
        if self.is_reversed {
            "逆位 (Reversed)"
        } else {
            "正位 (Upright)"
        }
    }
}

impl std::fmt::Display for DrawnCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}) - {}",
            self.archetype.name_localized,
            self.archetype.name,
            self.orientation_label()
        )
    }
}

/// A drawn card paired with the name of the position it occupies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedCard {
    /// Name of the spread position.
    pub position_name: String,
    /// The card in that position.
    pub card: DrawnCard,
}
