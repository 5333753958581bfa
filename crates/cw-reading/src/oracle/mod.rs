//! Collaborators that give a reading its words.
//!
//! The session never talks to these directly; the runtime calls them when a
//! transition asks for analysis or narrative, and feeds their results back in
//! as events.

mod local;
#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;
use futures::stream::BoxStream;
use thiserror::Error;

use cw_core::DrawnCard;

pub use local::{LocalKeywordAnalyzer, TemplateNarrator};

/// A collaborator call failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    /// Keyword analysis failed.
    #[error("keyword analysis failed: {0}")]
    Analysis(String),
    /// Narrative generation failed, either opening or mid-stream.
    #[error("narrative generation failed: {0}")]
    Narrative(String),
}

/// A drawn card with the position it landed in.
#[derive(Debug, Clone, PartialEq)]
pub struct NarrativeCard {
    /// Position name.
    pub position_name: String,
    /// What the position stands for.
    pub position_description: String,
    /// The card in that position.
    pub card: DrawnCard,
}

/// Everything the narrator needs to interpret a reading.
#[derive(Debug, Clone, PartialEq)]
pub struct NarrativeRequest {
    /// The querent's question.
    pub question: String,
    /// Display name of the spread.
    pub spread_name: String,
    /// Cards in position order.
    pub cards: Vec<NarrativeCard>,
}

impl NarrativeRequest {
    /// One line per card: index, position, names, orientation, and theme.
    pub fn card_lines(&self) -> Vec<String> {
        self.cards
            .iter()
            .enumerate()
            .map(|(i, c)| {
                format!(
                    "{}. [{} - {}]: {} - 原型: {}",
                    i + 1,
                    c.position_name,
                    c.position_description,
                    c.card,
                    c.card.archetype.theme
                )
            })
            .collect()
    }
}

/// Fragments of a streamed interpretation, in order.
pub type NarrativeStream = BoxStream<'static, Result<String, CollaboratorError>>;

/// Condenses a question into a few keywords.
#[async_trait]
pub trait KeywordAnalyzer: Send + Sync {
    /// Summarize `question` as a short comma-separated keyword string.
    async fn summarize_keywords(&self, question: &str) -> Result<String, CollaboratorError>;
}

/// Produces the interpretation of a reading as a stream of text fragments.
#[async_trait]
pub trait Narrator: Send + Sync {
    /// Open a stream of markdown fragments interpreting `request`.
    async fn stream_interpretation(
        &self,
        request: NarrativeRequest,
    ) -> Result<NarrativeStream, CollaboratorError>;
}
